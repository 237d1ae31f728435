//! Module `pricing::european`.
//!
//! Closed-form Black-Scholes-Merton delta for European options on an underlying paying
//! a continuous dividend yield, with routine `bs_delta`.
//!
//! References: Hull (11th ed.) Ch. 15 and 19, delta of European calls and puts on a
//! dividend-paying stock.
//!
//! Numerical considerations: at or past expiry the continuous formula is undefined
//! (`σ√T = 0`), so delta switches to a step function of moneyness. With time left,
//! non-positive volatility, spot, or strike leave `d1` undefined and are rejected
//! rather than propagated as NaN.
use crate::core::{HedgeError, OptionType};
use crate::math::normal_cdf;

/// Black-Scholes `d1` term. Callers must ensure `vol > 0`, `expiry > 0`, and positive
/// `spot`/`strike`.
#[inline]
pub fn d1(spot: f64, strike: f64, rate: f64, dividend_yield: f64, vol: f64, expiry: f64) -> f64 {
    ((spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * expiry)
        / (vol * expiry.sqrt())
}

/// Per-unit Black-Scholes-Merton delta of a European option.
///
/// Parameters:
/// - `spot`: underlying price.
/// - `strike`: option strike.
/// - `rate`: continuously compounded risk-free rate.
/// - `dividend_yield`: continuous dividend yield.
/// - `vol`: annualized implied volatility.
/// - `expiry`: time to expiry in years.
///
/// Edge cases:
/// - `expiry <= 0`: call delta is `1.0` if `spot > strike` else `0.0`; put delta is
///   `-1.0` if `spot < strike` else `0.0`. At the money both resolve to `0.0`, which is
///   intentional for this ill-defined point.
/// - `expiry > 0` with `vol <= 0`, `spot <= 0`, or `strike <= 0`: `InvalidInput`.
/// - Any non-finite input: `InvalidInput`.
///
/// # Examples
/// ```rust
/// use deltahedge::core::OptionType;
/// use deltahedge::pricing::european::bs_delta;
///
/// let call = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
/// let put = bs_delta(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0).unwrap();
/// assert!((call - 0.6368).abs() < 1e-4);
/// assert!((call - put - 1.0).abs() < 1e-12);
/// ```
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> Result<f64, HedgeError> {
    let inputs = [
        ("spot", spot),
        ("strike", strike),
        ("rate", rate),
        ("dividend_yield", dividend_yield),
        ("vol", vol),
        ("expiry", expiry),
    ];
    if let Some((name, value)) = inputs.iter().find(|(_, v)| !v.is_finite()) {
        return Err(HedgeError::InvalidInput(format!(
            "{name} must be finite, got {value}"
        )));
    }

    if expiry <= 0.0 {
        return Ok(expired_delta(option_type, spot, strike));
    }

    if vol <= 0.0 {
        return Err(HedgeError::InvalidInput(format!(
            "vol must be > 0 when expiry > 0, got {vol}"
        )));
    }
    if spot <= 0.0 || strike <= 0.0 {
        return Err(HedgeError::InvalidInput(format!(
            "spot and strike must be > 0, got spot={spot} strike={strike}"
        )));
    }

    let d1 = d1(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    Ok(match option_type {
        OptionType::Call => df_q * normal_cdf(d1),
        OptionType::Put => -df_q * normal_cdf(-d1),
    })
}

#[inline]
fn expired_delta(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call if spot > strike => 1.0,
        OptionType::Put if spot < strike => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn atm_one_year_reference_values() {
        let call = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0).unwrap();
        let put = bs_delta(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0).unwrap();
        assert_relative_eq!(call, 0.6368, epsilon = 1e-4);
        assert_relative_eq!(put, -0.3632, epsilon = 1e-4);
        assert_relative_eq!(call - put, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn expired_delta_is_a_step_in_moneyness() {
        for expiry in [0.0, -0.01, -2.0] {
            let itm_call = bs_delta(OptionType::Call, 105.0, 100.0, 0.05, 0.0, 0.2, expiry);
            let otm_call = bs_delta(OptionType::Call, 95.0, 100.0, 0.05, 0.0, 0.2, expiry);
            let itm_put = bs_delta(OptionType::Put, 95.0, 100.0, 0.05, 0.0, 0.2, expiry);
            let otm_put = bs_delta(OptionType::Put, 105.0, 100.0, 0.05, 0.0, 0.2, expiry);
            assert_eq!(itm_call.unwrap(), 1.0);
            assert_eq!(otm_call.unwrap(), 0.0);
            assert_eq!(itm_put.unwrap(), -1.0);
            assert_eq!(otm_put.unwrap(), 0.0);
        }
    }

    #[test]
    fn expired_at_the_money_is_zero_for_both_sides() {
        let call = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 0.0).unwrap();
        let put = bs_delta(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.2, 0.0).unwrap();
        assert_eq!(call, 0.0);
        assert_eq!(put, 0.0);
    }

    #[test]
    fn expired_branch_ignores_vol() {
        let delta = bs_delta(OptionType::Call, 120.0, 100.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(delta, 1.0);
    }

    #[test]
    fn put_call_delta_parity_with_dividend_yield() {
        let cases: [(f64, f64, f64, f64, f64, f64); 3] = [
            (100.0, 90.0, 0.03, 0.02, 0.25, 0.5),
            (80.0, 100.0, 0.01, 0.04, 0.40, 2.0),
            (150.0, 100.0, 0.05, 0.0, 0.15, 0.1),
        ];
        for (s, k, r, q, sigma, t) in cases {
            let call = bs_delta(OptionType::Call, s, k, r, q, sigma, t).unwrap();
            let put = bs_delta(OptionType::Put, s, k, r, q, sigma, t).unwrap();
            assert_relative_eq!(call - put, (-q * t).exp(), epsilon = 1e-12);
        }
    }

    #[test]
    fn delta_is_monotone_in_spot() {
        let mut prev_call = f64::NEG_INFINITY;
        let mut prev_put = f64::NEG_INFINITY;
        for i in 1..=60 {
            let s = 40.0 + 2.0 * i as f64;
            let call = bs_delta(OptionType::Call, s, 100.0, 0.02, 0.01, 0.3, 0.75).unwrap();
            let put = bs_delta(OptionType::Put, s, 100.0, 0.02, 0.01, 0.3, 0.75).unwrap();
            assert!(call >= prev_call, "call delta decreased at spot {s}");
            assert!(put >= prev_put, "put delta decreased at spot {s}");
            assert!(put.abs() <= prev_put.abs(), "put exposure grew at spot {s}");
            prev_call = call;
            prev_put = put;
        }
    }

    #[test]
    fn dividend_yield_scales_delta() {
        let no_div = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0).unwrap();
        let with_div = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.03, 0.2, 1.0).unwrap();
        assert!(with_div < no_div);
        let d1 = d1(100.0, 100.0, 0.05, 0.03, 0.2, 1.0);
        assert_relative_eq!(with_div, (-0.03_f64).exp() * normal_cdf(d1), epsilon = 1e-15);
    }

    #[test]
    fn rejects_non_positive_vol_before_expiry() {
        for vol in [0.0, -0.1] {
            let err = bs_delta(OptionType::Call, 100.0, 100.0, 0.05, 0.0, vol, 0.5).unwrap_err();
            match err {
                HedgeError::InvalidInput(msg) => assert!(msg.contains("vol"), "{msg}"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let err = bs_delta(OptionType::Put, f64::NAN, 100.0, 0.05, 0.0, 0.2, 1.0).unwrap_err();
        assert!(matches!(err, HedgeError::InvalidInput(ref msg) if msg.contains("spot")));

        let err =
            bs_delta(OptionType::Put, 100.0, 100.0, 0.05, 0.0, 0.2, f64::INFINITY).unwrap_err();
        assert!(matches!(err, HedgeError::InvalidInput(ref msg) if msg.contains("expiry")));
    }

    #[test]
    fn rejects_non_positive_spot_with_time_left() {
        assert!(bs_delta(OptionType::Call, 0.0, 100.0, 0.05, 0.0, 0.2, 1.0).is_err());
        assert!(bs_delta(OptionType::Call, 100.0, -5.0, 0.05, 0.0, 0.2, 1.0).is_err());
    }
}
