use hostgate_core::{EventRecord, Host, SchedulerResult, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::InMemoryHostDirectory;

/// 一次性调度运行的输入文件
///
/// ```json
/// {
///   "catalog": [{"ait_no": "A1", "db_type": "D1", "config_id": "CFG2",
///                "events": {"producer": "in progress"}}],
///   "tasks": [{"ait_no": "A1", "db_type": "D1", "config_id": "CFG1", "process": "loader"}],
///   "hosts": {"loader": [{"id": "h1", "address": "10.0.0.1:7000"}]}
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub catalog: Vec<EventRecord>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub hosts: HashMap<String, Vec<PlanHost>>,
}

/// 计划文件中的主机条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanHost {
    pub id: String,
    pub address: String,
}

impl PlanFile {
    /// 从JSON文件加载并检查任务字段
    pub fn load(path: impl AsRef<Path>) -> SchedulerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let plan = Self::from_json(&content)?;

        info!(
            path = %path.display(),
            catalog = plan.catalog.len(),
            tasks = plan.tasks.len(),
            host_classes = plan.hosts.len(),
            "计划文件已加载"
        );
        Ok(plan)
    }

    pub fn from_json(content: &str) -> SchedulerResult<Self> {
        let plan: PlanFile = serde_json::from_str(content)?;
        for task in &plan.tasks {
            task.validate()?;
        }
        Ok(plan)
    }

    /// 用计划中的主机构建内存主机目录
    pub fn host_directory(&self) -> InMemoryHostDirectory {
        let hosts = self
            .hosts
            .iter()
            .map(|(class, hosts)| {
                let hosts = hosts
                    .iter()
                    .map(|h| Host::new(h.id.clone(), h.address.clone()))
                    .collect();
                (class.clone(), hosts)
            })
            .collect();
        InMemoryHostDirectory::with_hosts(hosts)
    }
}
