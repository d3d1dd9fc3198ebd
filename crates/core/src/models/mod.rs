//! # 数据模型
//!
//! 门控与主机分配共享的核心数据结构。
//!
//! - [`EventRecord`] - 某个 (AIT, 数据库类型, 配置版本) 下各事件的状态
//! - [`Revision`] - 从配置版本字符串中提取出的可比较版本号
//! - [`Task`] - 待分配的工作单元
//! - [`Host`] - 主机目录在某一时刻返回的可用主机
//! - [`PendingQueue`] - 按到达顺序排列的待分配任务队列
//!
//! 所有模型都实现了 `serde` 序列化，便于从计划文件加载和经由分发通道传输。

pub mod event_record;
pub mod host;
pub mod queue;
pub mod revision;
pub mod task;

pub use event_record::*;
pub use host::*;
pub use queue::*;
pub use revision::*;
pub use task::*;
