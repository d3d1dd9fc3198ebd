//! In-memory doubles for the collaborator traits
//!
//! Both doubles record every call so tests can assert on the exact sequence
//! of directory probes and dispatcher hand-offs.

use async_trait::async_trait;
use hostgate_core::{Host, HostDirectory, Task, TaskDispatcher};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Host directory that replays a fixed script of responses
///
/// Each probe pops the next scripted response; once the script is exhausted
/// every further probe returns the fallback list.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHostDirectory {
    responses: Arc<Mutex<VecDeque<Vec<Host>>>>,
    fallback: Vec<Host>,
    probes: Arc<Mutex<Vec<String>>>,
    cancel_on_probe: Option<(usize, CancellationToken)>,
}

impl ScriptedHostDirectory {
    pub fn new(responses: Vec<Vec<Host>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Self::default()
        }
    }

    /// Directory that returns the same hosts on every probe
    pub fn always(hosts: Vec<Host>) -> Self {
        Self::default().with_fallback(hosts)
    }

    /// Directory that never has any hosts
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_fallback(mut self, hosts: Vec<Host>) -> Self {
        self.fallback = hosts;
        self
    }

    /// Cancel `token` when the `probe`-th query (1-based) is made
    pub fn cancel_on_probe(mut self, probe: usize, token: CancellationToken) -> Self {
        self.cancel_on_probe = Some((probe, token));
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    pub fn probed_classes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostDirectory for ScriptedHostDirectory {
    async fn eligible_hosts(&self, process_class: &str) -> Vec<Host> {
        let probe = {
            let mut probes = self.probes.lock().unwrap();
            probes.push(process_class.to_string());
            probes.len()
        };

        if let Some((at, token)) = &self.cancel_on_probe {
            if *at == probe {
                token.cancel();
            }
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Dispatcher that records every hand-off
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<(Task, Host)>>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` right after the `count`-th hand-off
    pub fn cancel_after(mut self, count: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((count, token));
        self
    }

    pub fn sent(&self) -> Vec<(Task, Host)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_task_ids(&self) -> Vec<Uuid> {
        self.sent.lock().unwrap().iter().map(|(t, _)| t.id).collect()
    }

    pub fn sent_host_ids(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, h)| h.id.clone())
            .collect()
    }
}

#[async_trait]
impl TaskDispatcher for RecordingDispatcher {
    async fn send(&self, task: &Task, host: &Host) {
        let count = {
            let mut sent = self.sent.lock().unwrap();
            sent.push((task.clone(), host.clone()));
            sent.len()
        };

        if let Some((at, token)) = &self.cancel_after {
            if *at == count {
                token.cancel();
            }
        }
    }
}
