use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 主机分配调度配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// 没有可用主机时的等待间隔（毫秒）
    pub backoff_interval_millis: u64,
    /// 每次分发后等待主机负载状态刷新的间隔（毫秒），0 表示不等待
    pub settle_delay_millis: u64,
    /// 每轮探测最多分配的任务数，未设置表示用尽本轮主机为止
    pub max_pairs_per_cycle: Option<usize>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            backoff_interval_millis: 30_000,
            settle_delay_millis: 2_000,
            max_pairs_per_cycle: None,
        }
    }
}

impl AssignmentConfig {
    pub fn backoff_interval(&self) -> Duration {
        Duration::from_millis(self.backoff_interval_millis)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_millis)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backoff_interval_millis == 0 {
            return Err(anyhow::anyhow!("主机等待间隔必须大于0"));
        }

        if self.max_pairs_per_cycle == Some(0) {
            return Err(anyhow::anyhow!("每轮最大分配数必须大于0"));
        }

        Ok(())
    }
}
