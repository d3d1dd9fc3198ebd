use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 可用主机
///
/// 只在返回它的那一次主机目录查询中有效，调度循环不会跨轮次缓存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    pub address: String,
    pub observed_at: DateTime<Utc>,
}

impl Host {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            observed_at: Utc::now(),
        }
    }

    /// 以新的观测时间复制一份
    pub fn observed_now(&self) -> Self {
        Self {
            observed_at: Utc::now(),
            ..self.clone()
        }
    }
}
