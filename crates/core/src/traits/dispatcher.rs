use async_trait::async_trait;

use crate::models::{Host, Task};

/// 任务分发接口
///
/// 发出即忘：调度器不检查结果，也不会重试。
/// 投递失败由实现方记录或通过其他渠道上报。
#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    /// 将任务交给指定主机
    async fn send(&self, task: &Task, host: &Host);
}
