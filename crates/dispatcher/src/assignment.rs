use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use hostgate_core::{
    AssignmentConfig, ConsumerPolicy, Host, HostDirectory, PendingQueue, SchedulerError,
    SchedulerResult, Task, TaskDispatcher,
};
use hostgate_infrastructure::MetricsCollector;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 一次分配运行的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// 队列已清空
    Drained,
    /// 收到取消信号提前停止，剩余任务保留在队列中
    Cancelled,
}

/// 分配运行报告
#[derive(Debug, Clone)]
pub struct AssignmentReport {
    /// 按分发顺序排列的已处理任务
    pub processed: Vec<Task>,
    pub outcome: AssignmentOutcome,
    pub probe_cycles: u32,
    pub backoff_waits: u32,
}

impl AssignmentReport {
    fn new() -> Self {
        Self {
            processed: Vec::new(),
            outcome: AssignmentOutcome::Drained,
            probe_cycles: 0,
            backoff_waits: 0,
        }
    }
}

enum SchedulerState {
    Probing,
    Backoff,
    Pairing(VecDeque<Host>),
    Terminated(AssignmentOutcome),
}

/// 主机分配调度器
///
/// 反复查询主机目录，把队首任务依次分配给本轮返回的主机。
/// 每个主机在一轮探测中最多使用一次，用尽后重新查询目录；
/// 目录为空时按配置的间隔等待后重试。
///
/// 取消信号只在安全点检查：探测前、每次分发完成后、等待期间及等待结束后。
/// 正在进行的分发不会被打断。
///
/// 分发是发出即忘的：交给分发器的任务即视为已处理，不重试也不回滚。
pub struct HostAssignmentScheduler {
    directory: Arc<dyn HostDirectory>,
    dispatcher: Arc<dyn TaskDispatcher>,
    policy: Arc<dyn ConsumerPolicy>,
    config: AssignmentConfig,
    metrics: Arc<MetricsCollector>,
}

impl HostAssignmentScheduler {
    pub fn new(
        directory: Arc<dyn HostDirectory>,
        dispatcher: Arc<dyn TaskDispatcher>,
        policy: Arc<dyn ConsumerPolicy>,
        config: AssignmentConfig,
        metrics: Arc<MetricsCollector>,
    ) -> SchedulerResult<Self> {
        config
            .validate()
            .map_err(|e| SchedulerError::Configuration(e.to_string()))?;

        Ok(Self {
            directory,
            dispatcher,
            policy,
            config,
            metrics,
        })
    }

    /// 分配队列中的所有任务，直到队列清空或收到取消信号
    pub async fn assign_all(
        &self,
        queue: &mut PendingQueue,
        process_class: &str,
        cancel: &CancellationToken,
    ) -> SchedulerResult<AssignmentReport> {
        if process_class.trim().is_empty() {
            return Err(SchedulerError::InvalidTask("处理类型不能为空".to_string()));
        }

        info!(process_class, pending = queue.len(), "开始分配任务");

        let mut report = AssignmentReport::new();
        let mut state = SchedulerState::Probing;

        loop {
            state = match state {
                SchedulerState::Probing => {
                    self.probe(queue, process_class, cancel, &mut report).await
                }
                SchedulerState::Backoff => {
                    report.backoff_waits += 1;
                    self.metrics.record_backoff();
                    if self.pause(self.config.backoff_interval(), cancel).await {
                        SchedulerState::Probing
                    } else {
                        info!("等待主机期间收到取消信号");
                        SchedulerState::Terminated(AssignmentOutcome::Cancelled)
                    }
                }
                SchedulerState::Pairing(hosts) => self.pair(queue, hosts, cancel, &mut report).await,
                SchedulerState::Terminated(outcome) => {
                    report.outcome = outcome;
                    break;
                }
            };
        }

        self.metrics.set_pending_tasks(queue.len());
        info!(
            process_class,
            processed = report.processed.len(),
            remaining = queue.len(),
            probe_cycles = report.probe_cycles,
            outcome = ?report.outcome,
            "任务分配结束"
        );

        Ok(report)
    }

    /// 在后台任务中运行分配循环，结束后交还队列
    pub fn spawn(
        self: Arc<Self>,
        mut queue: PendingQueue,
        process_class: String,
        cancel: CancellationToken,
    ) -> JoinHandle<(PendingQueue, SchedulerResult<AssignmentReport>)> {
        tokio::spawn(async move {
            let result = self.assign_all(&mut queue, &process_class, &cancel).await;
            (queue, result)
        })
    }

    async fn probe(
        &self,
        queue: &PendingQueue,
        process_class: &str,
        cancel: &CancellationToken,
        report: &mut AssignmentReport,
    ) -> SchedulerState {
        if queue.is_empty() {
            return SchedulerState::Terminated(AssignmentOutcome::Drained);
        }
        if cancel.is_cancelled() {
            return SchedulerState::Terminated(AssignmentOutcome::Cancelled);
        }

        let hosts = self.directory.eligible_hosts(process_class).await;
        report.probe_cycles += 1;
        self.metrics.record_probe();

        if hosts.is_empty() {
            warn!(
                process_class,
                wait_ms = self.config.backoff_interval_millis,
                "没有可用主机，等待后重试"
            );
            SchedulerState::Backoff
        } else {
            debug!(process_class, hosts = hosts.len(), pending = queue.len(), "获取到可用主机");
            SchedulerState::Pairing(hosts.into())
        }
    }

    async fn pair(
        &self,
        queue: &mut PendingQueue,
        mut hosts: VecDeque<Host>,
        cancel: &CancellationToken,
        report: &mut AssignmentReport,
    ) -> SchedulerState {
        let mut paired = 0usize;

        while let Some(host) = hosts.pop_front() {
            let Some(mut task) = queue.pop_front() else {
                break;
            };

            let grouped = self.tag_consumer(&mut task);
            info!(
                task_id = %task.id,
                process = %task.process,
                host = %host.id,
                funnel_group_id = task.funnel_group_id().unwrap_or("-"),
                "分配任务到主机"
            );

            self.dispatcher.send(&task, &host).await;
            self.metrics.record_dispatch(grouped);
            report.processed.push(task);
            paired += 1;

            if cancel.is_cancelled() {
                warn!(remaining = queue.len(), "收到取消信号，停止分配");
                return SchedulerState::Terminated(AssignmentOutcome::Cancelled);
            }
            if queue.is_empty() {
                break;
            }
            if !self.pause(self.config.settle_delay(), cancel).await {
                warn!(remaining = queue.len(), "等待主机负载刷新期间收到取消信号");
                return SchedulerState::Terminated(AssignmentOutcome::Cancelled);
            }
            if self
                .config
                .max_pairs_per_cycle
                .is_some_and(|max| paired >= max)
            {
                debug!(paired, "达到本轮分配上限");
                break;
            }
        }

        if !queue.is_empty() {
            debug!(remaining = queue.len(), "本轮主机已用尽，重新探测");
        }
        SchedulerState::Probing
    }

    /// 为消费者类任务设置漏斗分组ID，返回本次是否设置
    fn tag_consumer(&self, task: &mut Task) -> bool {
        if !self.policy.is_consumer_class(&task.process) || task.funnel_group_id().is_some() {
            return false;
        }
        let group_id = self.policy.derive_group_id(task);
        task.assign_funnel_group(group_id)
    }

    /// 可取消的等待，返回 `false` 表示已收到取消信号
    async fn pause(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        if duration.is_zero() {
            return !cancel.is_cancelled();
        }

        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => !cancel.is_cancelled(),
        }
    }
}
