use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hostgate_core::{AssignmentConfig, PendingQueue, SchedulerError};
use hostgate_dispatcher::assignment::*;
use hostgate_dispatcher::consumer_policy::ConsumerSetPolicy;
use hostgate_infrastructure::MetricsCollector;
use hostgate_testing_utils::{
    fast_assignment_config, host, hosts, loader_tasks, long_backoff_config, RecordingDispatcher,
    ScriptedHostDirectory, TaskBuilder, TEST_TIMEOUT,
};
use tokio_util::sync::CancellationToken;

fn build_scheduler(
    directory: &ScriptedHostDirectory,
    dispatcher: &RecordingDispatcher,
    config: AssignmentConfig,
) -> HostAssignmentScheduler {
    HostAssignmentScheduler::new(
        Arc::new(directory.clone()),
        Arc::new(dispatcher.clone()),
        Arc::new(ConsumerSetPolicy::default()),
        config,
        Arc::new(MetricsCollector::new()),
    )
    .unwrap()
}

async fn run(
    scheduler: &HostAssignmentScheduler,
    queue: &mut PendingQueue,
    cancel: &CancellationToken,
) -> AssignmentReport {
    tokio::time::timeout(TEST_TIMEOUT, scheduler.assign_all(queue, "loader", cancel))
        .await
        .expect("assignment run timed out")
        .unwrap()
}

#[tokio::test]
async fn test_one_host_per_probe_processes_all_in_order() {
    let directory = ScriptedHostDirectory::always(vec![host(1)]);
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let tasks = loader_tasks(3);
    let expected: Vec<_> = tasks.iter().map(|t| t.id).collect();
    let mut queue = PendingQueue::from(tasks);

    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(report.outcome, AssignmentOutcome::Drained);
    assert_eq!(report.probe_cycles, 3);
    assert_eq!(report.backoff_waits, 0);
    assert_eq!(
        report.processed.iter().map(|t| t.id).collect::<Vec<_>>(),
        expected
    );
    assert_eq!(dispatcher.sent_task_ids(), expected);
    assert_eq!(dispatcher.sent_host_ids(), vec!["h1", "h1", "h1"]);
    assert_eq!(directory.probe_count(), 3);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_cancel_during_first_backoff_leaves_queue_untouched() {
    let directory = ScriptedHostDirectory::empty();
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, long_backoff_config());

    let tasks = loader_tasks(3);
    let mut queue = PendingQueue::from(tasks.clone());
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    let report = run(&scheduler, &mut queue, &cancel).await;
    canceller.await.unwrap();

    assert_eq!(report.outcome, AssignmentOutcome::Cancelled);
    assert!(report.processed.is_empty());
    assert_eq!(report.probe_cycles, 1);
    assert_eq!(report.backoff_waits, 1);
    assert_eq!(dispatcher.sent_count(), 0);
    assert_eq!(queue.into_vec(), tasks);
}

#[tokio::test]
async fn test_cancel_observed_right_after_backoff_probe() {
    let cancel = CancellationToken::new();
    let directory = ScriptedHostDirectory::empty().cancel_on_probe(1, cancel.clone());
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, long_backoff_config());

    let mut queue = PendingQueue::from(loader_tasks(2));
    let report = run(&scheduler, &mut queue, &cancel).await;

    assert_eq!(report.outcome, AssignmentOutcome::Cancelled);
    assert!(report.processed.is_empty());
    assert_eq!(directory.probe_count(), 1);
    assert_eq!(queue.len(), 2);
}

#[tokio::test]
async fn test_backoff_then_retry_until_hosts_appear() {
    let directory = ScriptedHostDirectory::new(vec![vec![], vec![], hosts(2)]);
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(loader_tasks(2));
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(report.outcome, AssignmentOutcome::Drained);
    assert_eq!(report.backoff_waits, 2);
    assert_eq!(report.probe_cycles, 3);
    assert_eq!(dispatcher.sent_host_ids(), vec!["h1", "h2"]);
}

#[tokio::test]
async fn test_hosts_are_consumed_once_per_cycle_in_directory_order() {
    let directory = ScriptedHostDirectory::new(vec![
        vec![host(3), host(1), host(2)],
        vec![host(5), host(4)],
    ]);
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(loader_tasks(5));
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(report.probe_cycles, 2);
    assert_eq!(dispatcher.sent_host_ids(), vec!["h3", "h1", "h2", "h5", "h4"]);
}

#[tokio::test]
async fn test_surplus_hosts_are_left_unused() {
    let directory = ScriptedHostDirectory::always(hosts(5));
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(loader_tasks(2));
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(report.probe_cycles, 1);
    assert_eq!(dispatcher.sent_host_ids(), vec!["h1", "h2"]);
}

#[tokio::test]
async fn test_cancel_after_pair_keeps_remaining_tasks() {
    let cancel = CancellationToken::new();
    let directory = ScriptedHostDirectory::always(hosts(3));
    let dispatcher = RecordingDispatcher::new().cancel_after(1, cancel.clone());
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let tasks = loader_tasks(3);
    let mut queue = PendingQueue::from(tasks.clone());
    let report = run(&scheduler, &mut queue, &cancel).await;

    assert_eq!(report.outcome, AssignmentOutcome::Cancelled);
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].id, tasks[0].id);
    assert_eq!(
        queue.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![tasks[1].id, tasks[2].id]
    );
}

#[tokio::test]
async fn test_cancel_during_settle_delay() {
    let directory = ScriptedHostDirectory::always(hosts(3));
    let dispatcher = RecordingDispatcher::new();
    let config = AssignmentConfig {
        settle_delay_millis: 60_000,
        ..fast_assignment_config()
    };
    let scheduler = build_scheduler(&directory, &dispatcher, config);

    let mut queue = PendingQueue::from(loader_tasks(3));
    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    let report = run(&scheduler, &mut queue, &cancel).await;
    canceller.await.unwrap();

    assert_eq!(report.outcome, AssignmentOutcome::Cancelled);
    assert_eq!(report.processed.len(), 1);
    assert_eq!(queue.len(), 2);
}

#[tokio::test]
async fn test_already_cancelled_never_probes() {
    let directory = ScriptedHostDirectory::always(hosts(2));
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut queue = PendingQueue::from(loader_tasks(2));
    let report = run(&scheduler, &mut queue, &cancel).await;

    assert_eq!(report.outcome, AssignmentOutcome::Cancelled);
    assert_eq!(directory.probe_count(), 0);
    assert_eq!(queue.len(), 2);
}

#[tokio::test]
async fn test_empty_queue_is_drained_without_probing() {
    let directory = ScriptedHostDirectory::always(hosts(1));
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::new();
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(report.outcome, AssignmentOutcome::Drained);
    assert!(report.processed.is_empty());
    assert_eq!(directory.probe_count(), 0);
}

#[tokio::test]
async fn test_consumer_tasks_get_group_once() {
    let directory = ScriptedHostDirectory::always(hosts(4));
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(vec![
        TaskBuilder::new().consumer().with_config_id("CFG-007").build(),
        TaskBuilder::new().with_process("loader").build(),
        TaskBuilder::new().consumer().with_funnel_group("preset").build(),
        TaskBuilder::new().with_process("producer").build(),
    ]);
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    let groups: Vec<Option<&str>> = report
        .processed
        .iter()
        .map(|t| t.funnel_group_id())
        .collect();
    assert_eq!(groups, vec![Some("A1-D1-7"), None, Some("preset"), None]);

    let sent_groups: Vec<Option<String>> = dispatcher
        .sent()
        .iter()
        .map(|(t, _)| t.funnel_group_id().map(str::to_string))
        .collect();
    assert_eq!(sent_groups[0].as_deref(), Some("A1-D1-7"));
    assert_eq!(sent_groups[1], None);
}

#[tokio::test]
async fn test_each_task_is_dispatched_once() {
    let directory = ScriptedHostDirectory::new(vec![
        hosts(2),
        vec![],
        vec![host(7)],
        hosts(3),
    ]);
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(loader_tasks(6));
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    let ids = dispatcher.sent_task_ids();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(unique.len(), 6);
    assert_eq!(report.processed.len(), 6);
    assert_eq!(report.outcome, AssignmentOutcome::Drained);
}

#[tokio::test]
async fn test_max_pairs_per_cycle_forces_reprobe() {
    let directory = ScriptedHostDirectory::always(hosts(3));
    let dispatcher = RecordingDispatcher::new();
    let config = AssignmentConfig {
        max_pairs_per_cycle: Some(1),
        ..fast_assignment_config()
    };
    let scheduler = build_scheduler(&directory, &dispatcher, config);

    let mut queue = PendingQueue::from(loader_tasks(3));
    let report = run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(report.probe_cycles, 3);
    assert_eq!(dispatcher.sent_host_ids(), vec!["h1", "h1", "h1"]);
}

#[tokio::test]
async fn test_probes_use_requested_process_class() {
    let directory = ScriptedHostDirectory::always(hosts(1));
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(loader_tasks(2));
    run(&scheduler, &mut queue, &CancellationToken::new()).await;

    assert_eq!(directory.probed_classes(), vec!["loader", "loader"]);
}

#[test]
fn test_invalid_config_fails_before_loop() {
    let config = AssignmentConfig {
        backoff_interval_millis: 0,
        ..AssignmentConfig::default()
    };
    let result = HostAssignmentScheduler::new(
        Arc::new(ScriptedHostDirectory::empty()),
        Arc::new(RecordingDispatcher::new()),
        Arc::new(ConsumerSetPolicy::default()),
        config,
        Arc::new(MetricsCollector::new()),
    );
    assert!(matches!(result, Err(SchedulerError::Configuration(_))));
}

#[tokio::test]
async fn test_blank_process_class_is_rejected() {
    let directory = ScriptedHostDirectory::always(hosts(1));
    let dispatcher = RecordingDispatcher::new();
    let scheduler = build_scheduler(&directory, &dispatcher, fast_assignment_config());

    let mut queue = PendingQueue::from(loader_tasks(1));
    let result = scheduler
        .assign_all(&mut queue, " ", &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(SchedulerError::InvalidTask(_))));
    assert_eq!(queue.len(), 1);
    assert_eq!(directory.probe_count(), 0);
}

#[tokio::test]
async fn test_spawned_run_returns_queue_on_cancel() {
    let directory = ScriptedHostDirectory::empty();
    let dispatcher = RecordingDispatcher::new();
    let scheduler = Arc::new(build_scheduler(&directory, &dispatcher, long_backoff_config()));

    let tasks = loader_tasks(2);
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(
        PendingQueue::from(tasks.clone()),
        "loader".to_string(),
        cancel.clone(),
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    let (queue, result) = tokio::time::timeout(TEST_TIMEOUT, handle)
        .await
        .expect("spawned run timed out")
        .unwrap();
    let report = result.unwrap();

    assert_eq!(report.outcome, AssignmentOutcome::Cancelled);
    assert_eq!(queue.into_vec(), tasks);
}
