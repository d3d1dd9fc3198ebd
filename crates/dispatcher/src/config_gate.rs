use hostgate_core::{EventRecord, EventScope, GateConfig, Revision};
use tracing::{debug, info, warn};

/// 参与阻塞判断的事件（忽略大小写）
pub const RELEVANT_EVENTS: [&str; 2] = ["producer", "metadata"];

/// 阻塞状态（忽略大小写）
pub const BLOCKING_STATUSES: [&str; 2] = ["in progress", "partially processed"];

/// 门控判断结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Blocked {
        config_id: String,
        event: String,
        status: String,
    },
}

impl GateDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateDecision::Proceed)
    }
}

/// 配置版本门控
///
/// 当同一 AIT编号 和数据库类型下存在更新的配置版本，且其 producer 或 metadata
/// 事件仍处于 `in progress` / `partially processed` 状态时，旧版本不能继续处理。
///
/// 纯函数：不持有状态，不做 I/O，也不会失败。
#[derive(Debug, Clone, Default)]
pub struct ConfigGate {
    event_scope: EventScope,
}

impl ConfigGate {
    pub fn new(config: &GateConfig) -> Self {
        if config.event_scope == EventScope::AllEvents {
            warn!("配置门控使用 all_events 范围，所有事件都会参与阻塞判断");
        }
        Self {
            event_scope: config.event_scope,
        }
    }

    pub fn event_scope(&self) -> EventScope {
        self.event_scope
    }

    /// 检查当前配置版本是否可以继续处理
    pub fn can_proceed(
        &self,
        catalog: &[EventRecord],
        ait_no: &str,
        db_type: &str,
        current_config_id: &str,
    ) -> bool {
        self.evaluate(catalog, ait_no, db_type, current_config_id)
            .is_proceed()
    }

    /// 检查当前配置版本并返回阻塞原因
    ///
    /// 遇到第一个阻塞事件立即返回。
    pub fn evaluate(
        &self,
        catalog: &[EventRecord],
        ait_no: &str,
        db_type: &str,
        current_config_id: &str,
    ) -> GateDecision {
        let current = Revision::parse(current_config_id);
        info!(
            ait_no,
            db_type,
            config_id = current_config_id,
            revision = %current,
            "开始检查配置版本"
        );

        for record in catalog {
            if !record.matches(ait_no, db_type) {
                debug!(
                    ait_no = %record.ait_no,
                    db_type = %record.db_type,
                    "跳过不匹配的记录"
                );
                continue;
            }

            let revision = record.revision();
            if revision <= current {
                debug!(
                    config_id = %record.config_id,
                    revision = %revision,
                    "跳过非未来版本"
                );
                continue;
            }

            for (event, status) in &record.events {
                if !self.is_relevant_event(event) {
                    debug!(config_id = %record.config_id, event = %event, "跳过无关事件");
                    continue;
                }

                debug!(config_id = %record.config_id, event = %event, status = %status, "检查事件状态");
                if is_blocking_status(status) {
                    warn!(
                        config_id = %record.config_id,
                        event = %event,
                        status = %status,
                        "发现未来版本的阻塞事件"
                    );
                    return GateDecision::Blocked {
                        config_id: record.config_id.clone(),
                        event: event.clone(),
                        status: status.clone(),
                    };
                }
            }

            debug!(config_id = %record.config_id, "未来版本没有阻塞事件");
        }

        info!(config_id = current_config_id, "没有阻塞的配置版本，可以继续处理");
        GateDecision::Proceed
    }

    fn is_relevant_event(&self, event: &str) -> bool {
        match self.event_scope {
            EventScope::RelevantOnly => RELEVANT_EVENTS
                .iter()
                .any(|relevant| relevant.eq_ignore_ascii_case(event)),
            EventScope::AllEvents => true,
        }
    }
}

/// 使用默认事件范围检查当前配置版本是否可以继续处理
pub fn can_proceed(
    catalog: &[EventRecord],
    ait_no: &str,
    db_type: &str,
    current_config_id: &str,
) -> bool {
    ConfigGate::default().can_proceed(catalog, ait_no, db_type, current_config_id)
}

fn is_blocking_status(status: &str) -> bool {
    BLOCKING_STATUSES
        .iter()
        .any(|blocking| blocking.eq_ignore_ascii_case(status))
}
