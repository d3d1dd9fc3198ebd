use serde::{Deserialize, Serialize};

/// 门控检查的事件范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventScope {
    /// 只检查 producer 和 metadata 事件
    #[default]
    RelevantOnly,
    /// 检查所有事件（旧版行为）
    AllEvents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub event_scope: EventScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// 属于消费者类的处理类型
    pub consumer_processes: Vec<String>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            consumer_processes: vec!["consumer".to_string()],
        }
    }
}

impl ConsumerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(blank) = self
            .consumer_processes
            .iter()
            .find(|p| p.trim().is_empty())
        {
            return Err(anyhow::anyhow!("消费者处理类型不能为空: {:?}", blank));
        }

        Ok(())
    }
}
