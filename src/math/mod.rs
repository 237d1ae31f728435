//! Standard normal density and distribution functions used by the delta kernel.

/// Standard normal probability density.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution `Φ(x)`.
///
/// Abramowitz & Stegun 7.1.26 rational approximation; absolute error below `7.5e-8`.
/// The tail is mirrored so `Φ(x) + Φ(-x) == 1` up to rounding for every `x != 0`,
/// which keeps call/put delta parity tight.
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let upper = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { upper } else { 1.0 - upper }
}
