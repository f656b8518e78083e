//! Integrity metrics.
//!
//! Counters describing what the engine did: plans built, mutations staged
//! and removals refused.
//!
//! # Usage
//!
//! ```ignore
//! use refguard_core::metrics::new_shared_metrics;
//!
//! let metrics = new_shared_metrics();
//! metrics.record_plan(3, 2);
//! metrics.record_restriction("Article");
//!
//! let text = metrics.to_prometheus();
//! ```

mod registry;

pub use registry::{new_shared_metrics, IntegrityMetrics, MetricsSnapshot, SharedIntegrityMetrics};
