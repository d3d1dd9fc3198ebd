//! 配置门控与主机分配
//!
//! - [`config_gate`] 判断某个配置版本是否可以安全处理
//! - [`admission`] 用门控筛选任务并构建待分配队列
//! - [`assignment`] 把队列中的任务分配到主机目录返回的可用主机
//! - [`consumer_policy`] 消费者类任务的判定和漏斗分组

pub mod admission;
pub mod assignment;
pub mod config_gate;
pub mod consumer_policy;

pub use admission::*;
pub use assignment::*;
pub use config_gate::*;
pub use consumer_policy::*;
