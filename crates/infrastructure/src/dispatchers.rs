use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hostgate_core::{Host, Task, TaskDispatcher};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// 分发通道中传递的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchEnvelope {
    pub task: Task,
    pub host: Host,
    pub dispatched_at: DateTime<Utc>,
}

/// 只记录日志的分发器
#[derive(Debug, Clone, Default)]
pub struct LoggingDispatcher;

impl LoggingDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TaskDispatcher for LoggingDispatcher {
    async fn send(&self, task: &Task, host: &Host) {
        info!(
            task_id = %task.id,
            ait_no = %task.ait_no,
            db_type = %task.db_type,
            process = %task.process,
            funnel_group_id = task.funnel_group_id().unwrap_or("-"),
            host = %host.id,
            address = %host.address,
            "任务已分发"
        );
    }
}

/// 基于 tokio mpsc 通道的分发器
///
/// 接收端关闭后的分发只记录错误，不影响调度流程。
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    sender: mpsc::UnboundedSender<DispatchEnvelope>,
}

impl ChannelDispatcher {
    pub fn new(sender: mpsc::UnboundedSender<DispatchEnvelope>) -> Self {
        Self { sender }
    }

    /// 创建分发器及对应的接收端
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DispatchEnvelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl TaskDispatcher for ChannelDispatcher {
    async fn send(&self, task: &Task, host: &Host) {
        let envelope = DispatchEnvelope {
            task: task.clone(),
            host: host.clone(),
            dispatched_at: Utc::now(),
        };

        if let Err(e) = self.sender.send(envelope) {
            error!(
                task_id = %e.0.task.id,
                host = %e.0.host.id,
                "分发通道已关闭，任务未送达"
            );
        }
    }
}
