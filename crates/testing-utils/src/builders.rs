//! Test data builders for creating test entities
//!
//! Builders start from sensible defaults so tests only spell out the
//! attributes they care about.

use hostgate_core::{EventRecord, Host, Task};

/// Builder for creating test Task entities
pub struct TaskBuilder {
    ait_no: String,
    db_type: String,
    config_id: String,
    process: String,
    funnel_group_id: Option<String>,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            ait_no: "A1".to_string(),
            db_type: "D1".to_string(),
            config_id: "CFG1".to_string(),
            process: "loader".to_string(),
            funnel_group_id: None,
        }
    }

    pub fn with_ait_no(mut self, ait_no: &str) -> Self {
        self.ait_no = ait_no.to_string();
        self
    }

    pub fn with_db_type(mut self, db_type: &str) -> Self {
        self.db_type = db_type.to_string();
        self
    }

    pub fn with_config_id(mut self, config_id: &str) -> Self {
        self.config_id = config_id.to_string();
        self
    }

    pub fn with_process(mut self, process: &str) -> Self {
        self.process = process.to_string();
        self
    }

    pub fn consumer(self) -> Self {
        self.with_process("consumer")
    }

    pub fn with_funnel_group(mut self, group_id: &str) -> Self {
        self.funnel_group_id = Some(group_id.to_string());
        self
    }

    pub fn build(self) -> Task {
        let mut task = Task::new(self.ait_no, self.db_type, self.config_id, self.process);
        if let Some(group_id) = self.funnel_group_id {
            task.assign_funnel_group(group_id);
        }
        task
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` loader tasks for `A1`/`D1`, distinguished by AIT suffix
pub fn loader_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| TaskBuilder::new().with_ait_no(&format!("A{i}")).build())
        .collect()
}

/// Host with id `h{index}` and a matching address
pub fn host(index: usize) -> Host {
    Host::new(format!("h{index}"), format!("10.0.0.{index}:7000"))
}

/// Hosts `h1..=h{count}`
pub fn hosts(count: usize) -> Vec<Host> {
    (1..=count).map(host).collect()
}

/// Catalog entry with a single event
pub fn event_record(
    ait_no: &str,
    db_type: &str,
    config_id: &str,
    event: &str,
    status: &str,
) -> EventRecord {
    EventRecord::new(ait_no, db_type, config_id).with_event(event, status)
}
