use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Revision, SchedulerError, SchedulerResult};

/// 待分配任务
///
/// # 字段说明
///
/// - `id`: 任务唯一标识
/// - `ait_no`: 应用标识（AIT编号）
/// - `db_type`: 数据库类型
/// - `config_id`: 任务绑定的配置ID，门控按它判断是否可以处理
/// - `process`: 处理类型，决定可用主机范围以及是否属于消费者类
/// - `funnel_group_id`: 漏斗分组ID，仅消费者类任务在分发时设置，且只设置一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub ait_no: String,
    pub db_type: String,
    pub config_id: String,
    pub process: String,
    #[serde(default)]
    funnel_group_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// 创建新任务
    pub fn new(
        ait_no: impl Into<String>,
        db_type: impl Into<String>,
        config_id: impl Into<String>,
        process: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ait_no: ait_no.into(),
            db_type: db_type.into(),
            config_id: config_id.into(),
            process: process.into(),
            funnel_group_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn revision(&self) -> Revision {
        Revision::parse(&self.config_id)
    }

    pub fn funnel_group_id(&self) -> Option<&str> {
        self.funnel_group_id.as_deref()
    }

    /// 设置漏斗分组ID
    ///
    /// 已经设置过时保持原值并返回 `false`。
    pub fn assign_funnel_group(&mut self, group_id: impl Into<String>) -> bool {
        if self.funnel_group_id.is_some() {
            return false;
        }
        self.funnel_group_id = Some(group_id.into());
        true
    }

    /// 检查必填字段
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.ait_no.trim().is_empty() {
            return Err(SchedulerError::InvalidTask(format!(
                "任务 {} 的AIT编号不能为空",
                self.id
            )));
        }
        if self.db_type.trim().is_empty() {
            return Err(SchedulerError::InvalidTask(format!(
                "任务 {} 的数据库类型不能为空",
                self.id
            )));
        }
        if self.process.trim().is_empty() {
            return Err(SchedulerError::InvalidTask(format!(
                "任务 {} 的处理类型不能为空",
                self.id
            )));
        }
        Ok(())
    }
}
