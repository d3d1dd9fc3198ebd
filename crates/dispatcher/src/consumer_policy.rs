use std::collections::HashSet;

use hostgate_core::{ConsumerConfig, ConsumerPolicy, Task};

/// 基于固定消费者集合的策略
///
/// 分组ID由 AIT编号、数据库类型和配置版本号组成，
/// 同一应用、同一数据库、同一版本的消费者任务落在同一个漏斗分组。
#[derive(Debug, Clone)]
pub struct ConsumerSetPolicy {
    consumer_processes: HashSet<String>,
}

impl ConsumerSetPolicy {
    pub fn new<I, S>(consumer_processes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            consumer_processes: consumer_processes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ConsumerConfig) -> Self {
        Self::new(config.consumer_processes.iter().cloned())
    }
}

impl Default for ConsumerSetPolicy {
    fn default() -> Self {
        Self::from_config(&ConsumerConfig::default())
    }
}

impl ConsumerPolicy for ConsumerSetPolicy {
    fn is_consumer_class(&self, process: &str) -> bool {
        self.consumer_processes.contains(process)
    }

    fn derive_group_id(&self, task: &Task) -> String {
        format!("{}-{}-{}", task.ait_no, task.db_type, task.revision())
    }
}
