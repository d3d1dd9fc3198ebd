//! 调度指标采集
//!
//! 基于 `metrics` 门面定义的计数器和仪表，未安装导出器时所有记录都是空操作。

use metrics::{counter, gauge, Counter, Gauge};

/// Metrics collector for gate decisions and host assignment
pub struct MetricsCollector {
    tasks_dispatched_total: Counter,
    consumer_groups_assigned_total: Counter,
    probe_cycles_total: Counter,
    backoff_waits_total: Counter,
    gate_blocked_total: Counter,
    gate_passed_total: Counter,
    pending_tasks: Gauge,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            tasks_dispatched_total: counter!("hostgate_tasks_dispatched_total"),
            consumer_groups_assigned_total: counter!("hostgate_consumer_groups_assigned_total"),
            probe_cycles_total: counter!("hostgate_probe_cycles_total"),
            backoff_waits_total: counter!("hostgate_backoff_waits_total"),
            gate_blocked_total: counter!("hostgate_gate_blocked_total"),
            gate_passed_total: counter!("hostgate_gate_passed_total"),
            pending_tasks: gauge!("hostgate_pending_tasks"),
        }
    }

    pub fn record_dispatch(&self, consumer_group_assigned: bool) {
        self.tasks_dispatched_total.increment(1);
        if consumer_group_assigned {
            self.consumer_groups_assigned_total.increment(1);
        }
    }

    pub fn record_probe(&self) {
        self.probe_cycles_total.increment(1);
    }

    pub fn record_backoff(&self) {
        self.backoff_waits_total.increment(1);
    }

    pub fn record_gate_decision(&self, proceed: bool) {
        if proceed {
            self.gate_passed_total.increment(1);
        } else {
            self.gate_blocked_total.increment(1);
        }
    }

    pub fn set_pending_tasks(&self, count: usize) {
        self.pending_tasks.set(count as f64);
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
