use async_trait::async_trait;
use hostgate_core::{Host, HostDirectory};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// 内存主机目录实现
///
/// 按处理类型保存主机列表，可在运行期间整体替换或移除单个主机。
/// 每次查询返回一份新的快照并刷新 `observed_at`。
#[derive(Debug, Clone, Default)]
pub struct InMemoryHostDirectory {
    hosts: Arc<RwLock<HashMap<String, Vec<Host>>>>,
}

impl InMemoryHostDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hosts(hosts: HashMap<String, Vec<Host>>) -> Self {
        Self {
            hosts: Arc::new(RwLock::new(hosts)),
        }
    }

    /// 替换某个处理类型的主机列表
    pub async fn set_hosts(&self, process_class: &str, hosts: Vec<Host>) {
        let mut guard = self.hosts.write().await;
        guard.insert(process_class.to_string(), hosts);
    }

    /// 从所有处理类型中移除主机，返回被移除的数量
    pub async fn remove_host(&self, host_id: &str) -> usize {
        let mut guard = self.hosts.write().await;
        let mut removed = 0;
        for hosts in guard.values_mut() {
            let before = hosts.len();
            hosts.retain(|h| h.id != host_id);
            removed += before - hosts.len();
        }
        removed
    }

    pub async fn host_count(&self, process_class: &str) -> usize {
        self.hosts
            .read()
            .await
            .get(process_class)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl HostDirectory for InMemoryHostDirectory {
    async fn eligible_hosts(&self, process_class: &str) -> Vec<Host> {
        let guard = self.hosts.read().await;
        let hosts: Vec<Host> = guard
            .get(process_class)
            .map(|hosts| hosts.iter().map(Host::observed_now).collect())
            .unwrap_or_default();

        debug!(process_class, count = hosts.len(), "查询可用主机");
        hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_class_returns_empty() {
        let directory = InMemoryHostDirectory::new();
        assert!(directory.eligible_hosts("loader").await.is_empty());
    }

    #[tokio::test]
    async fn test_set_and_remove_hosts() {
        let directory = InMemoryHostDirectory::new();
        directory
            .set_hosts(
                "loader",
                vec![Host::new("h1", "10.0.0.1:7000"), Host::new("h2", "10.0.0.2:7000")],
            )
            .await;
        directory
            .set_hosts("consumer", vec![Host::new("h1", "10.0.0.1:7000")])
            .await;

        let hosts = directory.eligible_hosts("loader").await;
        assert_eq!(
            hosts.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(),
            vec!["h1", "h2"]
        );

        assert_eq!(directory.remove_host("h1").await, 2);
        assert_eq!(directory.host_count("loader").await, 1);
        assert!(directory.eligible_hosts("consumer").await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_refreshed_per_query() {
        let original = Host::new("h1", "10.0.0.1:7000");
        let directory = InMemoryHostDirectory::with_hosts(HashMap::from([(
            "loader".to_string(),
            vec![original.clone()],
        )]));

        let observed = directory.eligible_hosts("loader").await;
        assert_eq!(observed[0].id, original.id);
        assert!(observed[0].observed_at >= original.observed_at);
    }
}
