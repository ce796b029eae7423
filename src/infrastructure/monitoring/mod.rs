//! Client-side observability for interaction sync.

pub mod metrics;

pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
