use std::cell::Cell;

use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Running counters across every pass an engine performs.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    passes: u64,
    sections: u64,
    items: u64,
    degenerate_items: u64,
    clamped_inputs: u64,
    invalidations: u64,
    bounds_checks: u64,
    // Bumped from `&self` paths such as queries logging `query_before_prepare`.
    log_failures: Cell<u64>,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, sections: usize, items: usize) {
        self.passes = self.passes.saturating_add(1);
        self.sections = self.sections.saturating_add(sections as u64);
        self.items = self.items.saturating_add(items as u64);
    }

    pub fn record_degenerate(&mut self, count: usize) {
        self.degenerate_items = self.degenerate_items.saturating_add(count as u64);
    }

    pub fn record_clamped(&mut self, count: usize) {
        self.clamped_inputs = self.clamped_inputs.saturating_add(count as u64);
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations = self.invalidations.saturating_add(1);
    }

    pub fn record_bounds_check(&mut self) {
        self.bounds_checks = self.bounds_checks.saturating_add(1);
    }

    /// Count an event the attached sink refused to write.
    pub fn record_log_failure(&self) {
        self.log_failures.set(self.log_failures.get().saturating_add(1));
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            passes: self.passes,
            sections: self.sections,
            items: self.items,
            degenerate_items: self.degenerate_items,
            clamped_inputs: self.clamped_inputs,
            invalidations: self.invalidations,
            bounds_checks: self.bounds_checks,
            log_failures: self.log_failures.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub passes: u64,
    pub sections: u64,
    pub items: u64,
    pub degenerate_items: u64,
    pub clamped_inputs: u64,
    pub invalidations: u64,
    pub bounds_checks: u64,
    pub log_failures: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("sections".to_string(), json!(self.sections));
        map.insert("items".to_string(), json!(self.items));
        map.insert("degenerate_items".to_string(), json!(self.degenerate_items));
        map.insert("clamped_inputs".to_string(), json!(self.clamped_inputs));
        map.insert("invalidations".to_string(), json!(self.invalidations));
        map.insert("bounds_checks".to_string(), json!(self.bounds_checks));
        map.insert("log_failures".to_string(), json!(self.log_failures));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_accumulates_passes() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_pass(2, 10);
        metrics.record_pass(1, 4);
        metrics.record_degenerate(1);
        metrics.record_invalidation();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.sections, 3);
        assert_eq!(snapshot.items, 14);
        assert_eq!(snapshot.degenerate_items, 1);
        assert_eq!(snapshot.invalidations, 1);

        let event = snapshot.to_log_event("cascade::metrics");
        assert_eq!(event.message, "layout_metrics");
        assert_eq!(event.field("items"), Some(&json!(14)));
    }

    #[test]
    fn log_failures_count_through_shared_ref() {
        let metrics = LayoutMetrics::new();
        metrics.record_log_failure();
        metrics.record_log_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.log_failures, 2);
        assert_eq!(snapshot.as_fields().get("log_failures"), Some(&json!(2)));
    }
}
