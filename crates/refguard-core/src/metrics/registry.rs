//! Central integrity metrics registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Counters for the integrity engine.
///
/// All updates use relaxed atomics; the registry can be shared freely across
/// threads running unrelated removals.
#[derive(Debug, Default)]
pub struct IntegrityMetrics {
    plans_built: AtomicU64,
    operations_staged: AtomicU64,
    entities_staged: AtomicU64,
    restrictions: AtomicU64,
    stale_pulls: AtomicU64,
    dangling_skipped: AtomicU64,
    failures: AtomicU64,
    restrictions_by_type: RwLock<HashMap<String, AtomicU64>>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Plans returned to hosts.
    pub plans_built: u64,
    /// Field writes staged across all plans.
    pub operations_staged: u64,
    /// Entities staged for persistence across all plans.
    pub entities_staged: u64,
    /// Removals refused by RESTRICT.
    pub restrictions: u64,
    /// PULL targets that no longer held the removed entity.
    pub stale_pulls: u64,
    /// Dangling references skipped while fetching.
    pub dangling_skipped: u64,
    /// Plan constructions aborted by any other error.
    pub failures: u64,
}

impl IntegrityMetrics {
    /// Create a new registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plan handed to the host.
    pub fn record_plan(&self, operations: u64, entities: u64) {
        self.plans_built.fetch_add(1, Ordering::Relaxed);
        self.operations_staged.fetch_add(operations, Ordering::Relaxed);
        self.entities_staged.fetch_add(entities, Ordering::Relaxed);
    }

    /// Record a removal refused by RESTRICT on an entity of `type_name`.
    pub fn record_restriction(&self, type_name: &str) {
        self.restrictions.fetch_add(1, Ordering::Relaxed);

        if let Some(counter) = self.restrictions_by_type.read().get(type_name) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.restrictions_by_type
            .write()
            .entry(type_name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a PULL that found nothing to remove.
    pub fn record_stale_pull(&self) {
        self.stale_pulls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dangling reference that was skipped.
    pub fn record_dangling(&self) {
        self.dangling_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a plan construction that failed for a reason other than RESTRICT.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Refusals grouped by the type of the entity being removed.
    pub fn restrictions_by_type(&self) -> HashMap<String, u64> {
        self.restrictions_by_type
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect()
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plans_built: self.plans_built.load(Ordering::Relaxed),
            operations_staged: self.operations_staged.load(Ordering::Relaxed),
            entities_staged: self.entities_staged.load(Ordering::Relaxed),
            restrictions: self.restrictions.load(Ordering::Relaxed),
            stale_pulls: self.stale_pulls.load(Ordering::Relaxed),
            dangling_skipped: self.dangling_skipped.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Export to Prometheus text format.
    pub fn to_prometheus(&self) -> String {
        let s = self.snapshot();
        let mut out = String::new();

        let counters = [
            ("refguard_plans_total", "Execution plans built", s.plans_built),
            ("refguard_operations_staged_total", "Field writes staged", s.operations_staged),
            ("refguard_entities_staged_total", "Entities staged for persistence", s.entities_staged),
            ("refguard_restrictions_total", "Removals refused by restrict", s.restrictions),
            ("refguard_stale_pulls_total", "Pulls with nothing to remove", s.stale_pulls),
            ("refguard_dangling_skipped_total", "Dangling references skipped", s.dangling_skipped),
            ("refguard_failures_total", "Plan constructions aborted", s.failures),
        ];
        for (name, help, value) in counters {
            out.push_str(&format!("# HELP {name} {help}\n"));
            out.push_str(&format!("# TYPE {name} counter\n"));
            out.push_str(&format!("{name} {value}\n\n"));
        }

        let mut by_type: Vec<_> = self.restrictions_by_type().into_iter().collect();
        by_type.sort();
        if !by_type.is_empty() {
            out.push_str("# HELP refguard_restrictions_by_type Removals refused per entity type\n");
            out.push_str("# TYPE refguard_restrictions_by_type counter\n");
            for (type_name, value) in by_type {
                out.push_str(&format!(
                    "refguard_restrictions_by_type{{type=\"{type_name}\"}} {value}\n"
                ));
            }
        }

        out
    }

    /// Reset all metrics (for testing).
    pub fn reset(&self) {
        self.plans_built.store(0, Ordering::Relaxed);
        self.operations_staged.store(0, Ordering::Relaxed);
        self.entities_staged.store(0, Ordering::Relaxed);
        self.restrictions.store(0, Ordering::Relaxed);
        self.stale_pulls.store(0, Ordering::Relaxed);
        self.dangling_skipped.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.restrictions_by_type.write().clear();
    }
}

/// Shared handle to the metrics registry.
pub type SharedIntegrityMetrics = Arc<IntegrityMetrics>;

/// Create a new shared metrics registry.
pub fn new_shared_metrics() -> SharedIntegrityMetrics {
    Arc::new(IntegrityMetrics::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = IntegrityMetrics::new();
        metrics.record_plan(3, 2);
        metrics.record_plan(1, 1);
        metrics.record_stale_pull();
        metrics.record_failure();

        let s = metrics.snapshot();
        assert_eq!(s.plans_built, 2);
        assert_eq!(s.operations_staged, 4);
        assert_eq!(s.entities_staged, 3);
        assert_eq!(s.stale_pulls, 1);
        assert_eq!(s.failures, 1);
        assert_eq!(s.restrictions, 0);
    }

    #[test]
    fn test_restrictions_by_type() {
        let metrics = IntegrityMetrics::new();
        metrics.record_restriction("Article");
        metrics.record_restriction("Article");
        metrics.record_restriction("User");

        let by_type = metrics.restrictions_by_type();
        assert_eq!(by_type.get("Article"), Some(&2));
        assert_eq!(by_type.get("User"), Some(&1));
        assert_eq!(metrics.snapshot().restrictions, 3);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = IntegrityMetrics::new();
        metrics.record_plan(2, 1);
        metrics.record_restriction("Article");

        let text = metrics.to_prometheus();
        assert!(text.contains("refguard_plans_total 1"));
        assert!(text.contains("refguard_operations_staged_total 2"));
        assert!(text.contains("refguard_restrictions_by_type{type=\"Article\"} 1"));
    }

    #[test]
    fn test_reset() {
        let metrics = IntegrityMetrics::new();
        metrics.record_plan(2, 1);
        metrics.record_restriction("Article");
        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert!(metrics.restrictions_by_type().is_empty());
    }
}
