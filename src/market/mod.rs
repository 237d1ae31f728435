//! End-of-day market snapshots keyed by date and underlying.

pub mod snapshot;

pub use snapshot::{MarketSnapshot, MarketSnapshotBuilder, SnapshotIndex, index_by_date};
