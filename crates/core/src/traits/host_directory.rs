use async_trait::async_trait;

use crate::models::Host;

/// 主机目录接口
///
/// 每次调用都返回该处理类型当前可用的主机，顺序即分配顺序。
/// 没有可用主机时返回空列表；查询本身的故障由实现方吸收为空列表。
#[async_trait]
pub trait HostDirectory: Send + Sync {
    /// 查询可用主机
    async fn eligible_hosts(&self, process_class: &str) -> Vec<Host>;
}
