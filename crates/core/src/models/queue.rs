use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::Task;

/// 待分配任务队列
///
/// 插入顺序即到达顺序。一次调度运行独占队列，
/// 只有调度器在分发后从队首移除任务；调度中止时剩余任务保留在队列中。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingQueue {
    tasks: VecDeque<Task>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub fn front(&self) -> Option<&Task> {
        self.tasks.front()
    }

    /// 移除并返回队首任务
    pub fn pop_front(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks.into()
    }
}

impl FromIterator<Task> for PendingQueue {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Task>> for PendingQueue {
    fn from(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
        }
    }
}
