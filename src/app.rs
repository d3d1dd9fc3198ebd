use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use hostgate_core::{AppConfig, PendingQueue, TaskDispatcher};
use hostgate_dispatcher::{
    AssignmentOutcome, ConfigGate, ConsumerSetPolicy, HeldBackTask, HostAssignmentScheduler,
    TaskAdmission,
};
use hostgate_infrastructure::{
    ChannelDispatcher, DispatchEnvelope, LoggingDispatcher, MetricsCollector, PlanFile,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 一次运行的汇总
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: AssignmentOutcome,
    pub dispatched: usize,
    pub held_back: Vec<HeldBackTask>,
    /// 取消后仍未分配的任务
    pub pending: PendingQueue,
    pub probe_cycles: u32,
    pub backoff_waits: u32,
}

/// 主应用程序
///
/// 对计划文件中的任务执行一次准入和分配，分发信封逐行写出为JSON。
/// 演练模式下改用日志分发器，不写出任何分发记录。
pub struct Application {
    config: AppConfig,
    metrics: Arc<MetricsCollector>,
    dry_run: bool,
}

/// 分发记录的去向
enum OutputSink<W> {
    Unused(W),
    Writer(JoinHandle<Result<W>>),
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsCollector::new()),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 运行一次计划，返回汇总和输出端
    pub async fn run<W>(
        &self,
        plan: PlanFile,
        process_class: &str,
        cancel: CancellationToken,
        output: W,
    ) -> Result<(RunSummary, W)>
    where
        W: Write + Send + 'static,
    {
        let admission = TaskAdmission::new(ConfigGate::new(&self.config.gate), self.metrics.clone());
        let admitted = admission.admit(&plan.catalog, plan.tasks.iter().cloned());

        let (dispatcher, sink): (Arc<dyn TaskDispatcher>, OutputSink<W>) = if self.dry_run {
            info!("演练模式：分发只记录日志");
            let dispatcher: Arc<dyn TaskDispatcher> = Arc::new(LoggingDispatcher::new());
            (dispatcher, OutputSink::Unused(output))
        } else {
            let (dispatcher, receiver) = ChannelDispatcher::channel();
            let writer = tokio::spawn(write_envelopes(receiver, output));
            let dispatcher: Arc<dyn TaskDispatcher> = Arc::new(dispatcher);
            (dispatcher, OutputSink::Writer(writer))
        };

        let scheduler = HostAssignmentScheduler::new(
            Arc::new(plan.host_directory()),
            dispatcher,
            Arc::new(ConsumerSetPolicy::from_config(&self.config.consumer)),
            self.config.assignment.clone(),
            self.metrics.clone(),
        )
        .context("创建主机分配调度器失败")?;

        let (pending, result) = Arc::new(scheduler)
            .spawn(admitted.queue, process_class.to_string(), cancel)
            .await
            .context("分配任务异常退出")?;
        let report = result.context("任务分配失败")?;

        let output = match sink {
            OutputSink::Unused(output) => output,
            // 调度器释放后通道关闭，写出任务随之结束
            OutputSink::Writer(writer) => writer
                .await
                .context("输出任务异常退出")?
                .context("写出分发记录失败")?,
        };

        let summary = RunSummary {
            outcome: report.outcome,
            dispatched: report.processed.len(),
            held_back: admitted.held_back,
            pending,
            probe_cycles: report.probe_cycles,
            backoff_waits: report.backoff_waits,
        };

        info!(
            process_class,
            outcome = ?summary.outcome,
            dispatched = summary.dispatched,
            held_back = summary.held_back.len(),
            pending = summary.pending.len(),
            "计划运行完成"
        );
        for held in &summary.held_back {
            warn!(task_id = %held.task.id, decision = ?held.decision, "任务未通过配置门控");
        }

        Ok((summary, output))
    }
}

async fn write_envelopes<W: Write>(
    mut receiver: mpsc::UnboundedReceiver<DispatchEnvelope>,
    mut output: W,
) -> Result<W> {
    while let Some(envelope) = receiver.recv().await {
        serde_json::to_writer(&mut output, &envelope).context("序列化分发记录失败")?;
        writeln!(output)?;
        output.flush()?;
    }
    Ok(output)
}
