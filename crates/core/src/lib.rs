pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::{AppConfig, AssignmentConfig, ConsumerConfig, EventScope, GateConfig, ObservabilityConfig};
pub use errors::*;
pub use models::{EventRecord, Host, PendingQueue, Revision, Task};
pub use traits::{ConsumerPolicy, HostDirectory, TaskDispatcher};

/// 统一的Result类型
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;
