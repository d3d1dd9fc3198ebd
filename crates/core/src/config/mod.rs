//! 配置管理
//!
//! 配置来源按优先级从低到高依次为：结构体默认值、TOML配置文件、`HOSTGATE_` 前缀的环境变量。
//! 加载完成后统一执行 [`AppConfig::validate`]，无效配置在调度循环启动前就会被拒绝。
//!
//! ```toml
//! [assignment]
//! backoff_interval_millis = 30000
//! settle_delay_millis = 2000
//!
//! [gate]
//! event_scope = "relevant_only"
//!
//! [consumer]
//! consumer_processes = ["consumer"]
//!
//! [observability]
//! log_level = "info"
//! log_format = "pretty"
//! ```

pub mod models;

pub use models::{
    AppConfig, AssignmentConfig, ConsumerConfig, EventScope, GateConfig, ObservabilityConfig,
};
