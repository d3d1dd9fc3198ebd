use std::sync::Arc;

use hostgate_core::{EventRecord, PendingQueue, Task};
use hostgate_infrastructure::MetricsCollector;
use tracing::{info, warn};

use crate::config_gate::{ConfigGate, GateDecision};

/// 被门控拦下的任务
#[derive(Debug, Clone)]
pub struct HeldBackTask {
    pub task: Task,
    pub decision: GateDecision,
}

/// 准入结果
#[derive(Debug, Clone, Default)]
pub struct AdmissionResult {
    pub queue: PendingQueue,
    pub held_back: Vec<HeldBackTask>,
}

/// 任务准入
///
/// 按到达顺序对每个任务执行配置门控，通过的任务进入待分配队列，
/// 未通过的任务连同阻塞原因一起保留，等待下一次准入。
pub struct TaskAdmission {
    gate: ConfigGate,
    metrics: Arc<MetricsCollector>,
}

impl TaskAdmission {
    pub fn new(gate: ConfigGate, metrics: Arc<MetricsCollector>) -> Self {
        Self { gate, metrics }
    }

    pub fn admit<I>(&self, catalog: &[EventRecord], tasks: I) -> AdmissionResult
    where
        I: IntoIterator<Item = Task>,
    {
        let mut result = AdmissionResult::default();

        for task in tasks {
            let decision = self
                .gate
                .evaluate(catalog, &task.ait_no, &task.db_type, &task.config_id);
            self.metrics.record_gate_decision(decision.is_proceed());

            match decision {
                GateDecision::Proceed => result.queue.push(task),
                blocked => {
                    warn!(
                        task_id = %task.id,
                        ait_no = %task.ait_no,
                        db_type = %task.db_type,
                        config_id = %task.config_id,
                        "任务被配置门控拦下"
                    );
                    result.held_back.push(HeldBackTask {
                        task,
                        decision: blocked,
                    });
                }
            }
        }

        self.metrics.set_pending_tasks(result.queue.len());
        info!(
            admitted = result.queue.len(),
            held_back = result.held_back.len(),
            "任务准入完成"
        );
        result
    }
}
