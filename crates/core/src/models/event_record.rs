use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Revision;

/// 配置事件记录
///
/// 某个 (AIT编号, 数据库类型, 配置ID) 组合下各事件名到状态的映射，
/// 由调用方整体提供给配置门控。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub ait_no: String,
    pub db_type: String,
    pub config_id: String,
    #[serde(default)]
    pub events: BTreeMap<String, String>,
}

impl EventRecord {
    pub fn new(
        ait_no: impl Into<String>,
        db_type: impl Into<String>,
        config_id: impl Into<String>,
    ) -> Self {
        Self {
            ait_no: ait_no.into(),
            db_type: db_type.into(),
            config_id: config_id.into(),
            events: BTreeMap::new(),
        }
    }

    /// 追加一个事件状态
    pub fn with_event(mut self, event: impl Into<String>, status: impl Into<String>) -> Self {
        self.events.insert(event.into(), status.into());
        self
    }

    pub fn revision(&self) -> Revision {
        Revision::parse(&self.config_id)
    }

    /// AIT编号与数据库类型是否完全一致（区分大小写）
    pub fn matches(&self, ait_no: &str, db_type: &str) -> bool {
        self.ait_no == ait_no && self.db_type == db_type
    }
}
