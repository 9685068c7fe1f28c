//! Send-only folder service tests.
//!
//! Tick and request handlers are driven directly where the decision matters;
//! the full event loop runs under a paused clock for timing behavior.

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use pretty_assertions::assert_eq;

  use crate::{
    actor::{
      __tests__::helpers::{ModelCall, MockModel, paused_error, send_only_folder, wait_for, walk_error},
      folder::FolderService,
      message::ScanRequest,
      send_only::TickOutcome,
    },
    domain::folder::FolderState,
    model::{FolderError, ScanSummary},
  };

  fn summary(added: usize) -> ScanSummary {
    ScanSummary {
      scanned: added,
      added,
      ..ScanSummary::default()
    }
  }

  fn assert_jittered(next: Duration, interval: Duration) {
    assert!(next >= interval.mul_f64(0.75), "{next:?} below 3/4 of {interval:?}");
    assert!(next <= interval.mul_f64(1.25), "{next:?} above 5/4 of {interval:?}");
  }

  // ==========================================================================
  // Periodic Tick Tests
  // ==========================================================================

  #[tokio::test]
  async fn test_first_tick_scans_whole_folder_and_reschedules() {
    let model = MockModel::new();
    model.push_scan(Ok(summary(3)));
    let (mut folder, state, _cancel) = send_only_folder(&model, 60);

    let mut initial = false;
    let outcome = folder.handle_tick(&mut initial).await;

    assert_eq!(
      outcome,
      TickOutcome::Scanned {
        summary: summary(3),
        first: true
      }
    );
    assert!(initial);
    assert_eq!(model.calls(), vec![ModelCall::Health, ModelCall::Scan(Vec::new())]);
    assert_eq!(state.state().await, FolderState::Idle);

    let next = folder.base.scan.delay_rx.try_recv().expect("next scan scheduled");
    assert_jittered(next, Duration::from_secs(60));
    assert!(folder.base.scan.delay_rx.try_recv().is_err(), "exactly one reschedule");
  }

  #[tokio::test]
  async fn test_only_first_success_is_initial() {
    let model = MockModel::new();
    let (mut folder, _state, _cancel) = send_only_folder(&model, 60);

    let mut initial = false;
    let first = folder.handle_tick(&mut initial).await;
    let second = folder.handle_tick(&mut initial).await;

    assert!(matches!(first, TickOutcome::Scanned { first: true, .. }));
    assert!(matches!(second, TickOutcome::Scanned { first: false, .. }));
  }

  #[tokio::test]
  async fn test_unhealthy_tick_skips_scan() {
    let model = MockModel::new();
    model.push_health(Err(paused_error()));
    let (mut folder, state, _cancel) = send_only_folder(&model, 60);

    let mut initial = false;
    let outcome = folder.handle_tick(&mut initial).await;

    assert_eq!(outcome, TickOutcome::Skipped(paused_error()));
    assert!(!initial);
    assert_eq!(model.calls(), vec![ModelCall::Health]);
    assert_eq!(state.state().await, FolderState::Idle, "health failures are not recorded");

    let next = folder.base.scan.delay_rx.try_recv().expect("retry scheduled");
    assert_jittered(next, Duration::from_secs(60));
  }

  #[tokio::test]
  async fn test_initial_flag_survives_unhealthy_first_tick() {
    let model = MockModel::new();
    model.push_health(Err(paused_error()));
    let (mut folder, _state, _cancel) = send_only_folder(&model, 60);

    let mut initial = false;
    folder.handle_tick(&mut initial).await;
    let outcome = folder.handle_tick(&mut initial).await;

    assert!(matches!(outcome, TickOutcome::Scanned { first: true, .. }));
  }

  #[tokio::test]
  async fn test_failed_scan_records_error_once() {
    let model = MockModel::new();
    model.push_scan(Err(walk_error()));
    let (mut folder, state, _cancel) = send_only_folder(&model, 60);
    let mut events = state.subscribe();

    let mut initial = false;
    let outcome = folder.handle_tick(&mut initial).await;

    assert_eq!(outcome, TickOutcome::Failed(walk_error()));
    assert!(!initial);

    // The model recorded it while scanning; the service's report is a repeat
    let status = state.status().await;
    assert_eq!(status.state, FolderState::Error);
    assert_eq!(status.error, Some(walk_error().to_string()));
    assert!(events.try_recv().is_ok());
    assert!(events.try_recv().is_err(), "error recorded exactly once");

    assert!(folder.base.scan.delay_rx.try_recv().is_ok(), "retry scheduled");
  }

  #[tokio::test]
  async fn test_repeated_failure_is_not_recorded_again() {
    let model = MockModel::new();
    model.push_scan(Err(walk_error()));
    model.push_scan(Err(walk_error()));
    let (mut folder, state, _cancel) = send_only_folder(&model, 60);
    let mut events = state.subscribe();

    let mut initial = false;
    folder.handle_tick(&mut initial).await;
    folder.handle_tick(&mut initial).await;

    assert_eq!(model.scan_calls().len(), 2);
    assert!(events.try_recv().is_ok());
    assert!(events.try_recv().is_err(), "second identical failure left no trace");
  }

  #[tokio::test]
  async fn test_manual_only_never_reschedules() {
    let model = MockModel::new();
    model.push_scan(Ok(summary(1)));
    model.push_scan(Err(walk_error()));
    model.push_health(Ok(()));
    model.push_health(Ok(()));
    model.push_health(Err(paused_error()));
    let (mut folder, _state, _cancel) = send_only_folder(&model, 0);

    let mut initial = false;
    assert!(matches!(
      folder.handle_tick(&mut initial).await,
      TickOutcome::Scanned { first: true, .. }
    ));
    assert!(matches!(folder.handle_tick(&mut initial).await, TickOutcome::Failed(_)));
    assert!(matches!(folder.handle_tick(&mut initial).await, TickOutcome::Skipped(_)));

    assert!(folder.base.scan.delay_rx.try_recv().is_err());
  }

  // ==========================================================================
  // On-Demand Request Tests
  // ==========================================================================

  #[tokio::test]
  async fn test_scan_request_is_restricted_and_answered() {
    let model = MockModel::new();
    model.push_scan(Ok(summary(2)));
    let (mut folder, _state, _cancel) = send_only_folder(&model, 60);

    let (req, rx) = ScanRequest::new(vec!["a/b".to_string()]);
    folder.handle_scan_request(req).await;

    assert_eq!(rx.await.unwrap(), Ok(summary(2)));
    assert_eq!(model.calls(), vec![ModelCall::Scan(vec!["a/b".to_string()])]);
    assert!(folder.base.scan.delay_rx.try_recv().is_err(), "on-demand scans keep the schedule");
  }

  #[tokio::test]
  async fn test_scan_request_failure_goes_to_requester() {
    let model = MockModel::new();
    model.push_scan(Err(walk_error()));
    let (mut folder, state, _cancel) = send_only_folder(&model, 60);

    let (req, rx) = ScanRequest::new(Vec::new());
    folder.handle_scan_request(req).await;

    assert_eq!(rx.await.unwrap(), Err(walk_error()));
    assert_eq!(state.state().await, FolderState::Error);
  }

  #[tokio::test]
  async fn test_departed_requester_does_not_stop_service() {
    let model = MockModel::new();
    let (mut folder, _state, _cancel) = send_only_folder(&model, 60);

    let (req, rx) = ScanRequest::new(Vec::new());
    drop(rx);
    folder.handle_scan_request(req).await;

    assert_eq!(model.scan_calls().len(), 1);
  }

  // ==========================================================================
  // Event Loop Tests
  // ==========================================================================

  #[tokio::test(start_paused = true)]
  async fn test_serve_scans_immediately_then_periodically() {
    let model = MockModel::new();
    let (folder, _state, cancel) = send_only_folder(&model, 10);
    let task = tokio::spawn(Box::new(folder).serve());

    // First scan at t=0, second within [7.5s, 12.5s], third no earlier than 15s
    tokio::time::sleep(Duration::from_secs(13)).await;
    assert_eq!(model.scan_calls().len(), 2);

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_serve_manual_only_scans_once() {
    let model = MockModel::new();
    let (folder, _state, cancel) = send_only_folder(&model, 0);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
    assert_eq!(model.scan_calls().len(), 1);

    let result = handle.scan(vec!["docs".to_string()]).await;
    assert_eq!(result, Ok(ScanSummary::default()));
    assert_eq!(model.scan_calls(), vec![Vec::<String>::new(), vec!["docs".to_string()]]);

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_delay_moves_next_scan() {
    let model = MockModel::new();
    let (folder, _state, cancel) = send_only_folder(&model, 3600);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    assert!(wait_for(|| model.scan_calls().len() == 1, Duration::from_secs(1)).await);

    handle.delay(Duration::from_secs(5)).unwrap();
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(model.scan_calls().len(), 1);
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(model.scan_calls().len(), 2);

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_huge_interval_keeps_loop_alive() {
    let model = MockModel::new();
    let (folder, _state, cancel) = send_only_folder(&model, u64::MAX);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    assert!(wait_for(|| model.scan_calls().len() == 1, Duration::from_secs(1)).await);
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(!task.is_finished());
    assert_eq!(handle.scan(Vec::new()).await, Ok(ScanSummary::default()));

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_max_delay_keeps_loop_alive() {
    let model = MockModel::new();
    let (folder, _state, cancel) = send_only_folder(&model, 60);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    assert!(wait_for(|| model.scan_calls().len() == 1, Duration::from_secs(1)).await);
    handle.delay(Duration::MAX).unwrap();
    tokio::time::sleep(Duration::from_secs(3600)).await;

    assert!(!task.is_finished());
    assert_eq!(model.scan_calls().len(), 1, "periodic scan pushed out of reach");
    assert_eq!(handle.scan(Vec::new()).await, Ok(ScanSummary::default()));

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_scan_request_does_not_touch_timer() {
    let model = MockModel::new();
    let (folder, _state, cancel) = send_only_folder(&model, 10);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    assert!(wait_for(|| model.scan_calls().len() == 1, Duration::from_secs(1)).await);
    for _ in 0..3 {
      handle.scan(vec!["sub".to_string()]).await.unwrap();
    }

    // Periodic scan still due within 12.5s of the first
    tokio::time::sleep(Duration::from_secs(13)).await;
    let periodic = model.scan_calls().iter().filter(|s| s.is_empty()).count();
    assert_eq!(periodic, 2);

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_queued_request_waits_for_running_scan() {
    let model = MockModel::with_scan_delay(Duration::from_secs(30));
    let (folder, _state, cancel) = send_only_folder(&model, 3600);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    assert!(wait_for(|| model.scan_calls().len() == 1, Duration::from_secs(1)).await);

    let start = tokio::time::Instant::now();
    handle.scan(vec!["late".to_string()]).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(59), "request waited for the periodic scan");

    cancel.cancel();
    task.await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_stop_ends_loop_and_rejects_requests() {
    let model = MockModel::new();
    let (folder, _state, _cancel) = send_only_folder(&model, 60);
    let handle = folder.handle();
    let task = tokio::spawn(Box::new(folder).serve());

    assert!(wait_for(|| model.scan_calls().len() == 1, Duration::from_secs(1)).await);

    handle.stop();
    handle.stop();
    task.await.unwrap();

    assert!(handle.is_stopped());
    assert_eq!(handle.scan(Vec::new()).await, Err(FolderError::ServiceStopped));
    assert_eq!(handle.delay(Duration::from_secs(1)), Err(FolderError::ServiceStopped));
  }

  #[tokio::test(start_paused = true)]
  async fn test_shutdown_wins_over_queued_request() {
    let model = MockModel::new();
    let (mut folder, _state, cancel) = send_only_folder(&model, 60);
    let handle = folder.handle();

    let requester = tokio::spawn(async move { handle.scan(Vec::new()).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    cancel.cancel();
    folder.run().await;

    assert!(folder.base.scan.timer.is_stopped());
    assert!(model.calls().is_empty(), "nothing scanned after shutdown");

    drop(folder);
    assert_eq!(requester.await.unwrap(), Err(FolderError::ServiceStopped));
  }
}
