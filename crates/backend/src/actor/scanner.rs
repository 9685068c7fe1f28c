//! Scan scheduling for a folder service.
//!
//! The scanner owns the folder's rescan timer and the two channels that feed
//! its event loop besides shutdown:
//!
//! - `now`: on-demand scan requests, each carrying a one-shot reply
//! - `delay`: new timer deadlines
//!
//! Rescheduling never touches the timer directly. [`FolderScanner::reschedule`]
//! computes the next delay and sends it on the delay channel; the event loop
//! applies it when it receives it, so the loop is the only writer of the timer.

use std::{future, pin::Pin, time::Duration};

use rand::Rng;
use tokio::{
  sync::mpsc,
  time::{Instant, Sleep},
};
use tracing::{debug, trace};

use super::message::ScanRequest;

/// Capacity of the on-demand request queue; further callers wait for space
const SCAN_REQUEST_CAPACITY: usize = 16;

/// Deadline offset used when a delay does not fit in an `Instant` (~30 years)
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

// ============================================================================
// ScanTimer
// ============================================================================

/// Single-deadline timer.
///
/// Either armed at one deadline, fired and waiting to be reset, or stopped
/// for good.
#[derive(Debug)]
pub struct ScanTimer {
  sleep: Option<Pin<Box<Sleep>>>,
  stopped: bool,
}

impl ScanTimer {
  /// Create a timer armed to fire after `delay`
  pub fn new(delay: Duration) -> Self {
    Self {
      sleep: Some(Box::pin(tokio::time::sleep(delay))),
      stopped: false,
    }
  }

  /// Wait for the armed deadline. Pending forever when not armed.
  ///
  /// Cancel safe: dropping the future keeps the deadline armed.
  pub async fn fired(&mut self) {
    let Some(sleep) = self.sleep.as_mut() else {
      return future::pending().await;
    };
    sleep.as_mut().await;
    self.sleep = None;
  }

  /// Arm the timer to fire after `delay`, replacing any pending deadline.
  /// Ignored once stopped.
  pub fn reset(&mut self, delay: Duration) {
    if self.stopped {
      trace!("Ignoring reset of stopped scan timer");
      return;
    }

    let now = Instant::now();
    let deadline = now.checked_add(delay).unwrap_or_else(|| now + FAR_FUTURE);
    match self.sleep.as_mut() {
      Some(sleep) => sleep.as_mut().reset(deadline),
      None => self.sleep = Some(Box::pin(tokio::time::sleep_until(deadline))),
    }
  }

  /// Disarm the timer permanently. Idempotent.
  pub fn stop(&mut self) {
    self.sleep = None;
    self.stopped = true;
  }

  pub fn is_stopped(&self) -> bool {
    self.stopped
  }

  /// Pending deadline, if armed
  pub fn deadline(&self) -> Option<Instant> {
    self.sleep.as_ref().map(|s| s.deadline())
  }
}

// ============================================================================
// FolderScanner
// ============================================================================

/// Sending halves of a scanner's channels, used to build folder handles
#[derive(Debug, Clone)]
pub struct ScanChannels {
  pub now_tx: mpsc::Sender<ScanRequest>,
  pub delay_tx: mpsc::UnboundedSender<Duration>,
}

/// Rescan timer and request channels of one folder.
///
/// Fields are public to the actor module so an event loop can select over
/// them with disjoint borrows.
#[derive(Debug)]
pub struct FolderScanner {
  interval: Duration,
  pub(super) timer: ScanTimer,
  pub(super) now_rx: mpsc::Receiver<ScanRequest>,
  pub(super) delay_rx: mpsc::UnboundedReceiver<Duration>,
  delay_tx: mpsc::UnboundedSender<Duration>,
}

impl FolderScanner {
  /// Create a scanner for the given rescan interval (zero = manual only).
  ///
  /// The first scan is due immediately, whatever the interval.
  pub fn new(interval: Duration) -> (Self, ScanChannels) {
    let (now_tx, now_rx) = mpsc::channel(SCAN_REQUEST_CAPACITY);
    let (delay_tx, delay_rx) = mpsc::unbounded_channel();

    let scanner = Self {
      interval,
      timer: ScanTimer::new(Duration::ZERO),
      now_rx,
      delay_rx,
      delay_tx: delay_tx.clone(),
    };

    (scanner, ScanChannels { now_tx, delay_tx })
  }

  /// True if the folder only scans on request
  pub fn has_no_interval(&self) -> bool {
    self.interval.is_zero()
  }

  /// A random delay between 3/4 and 5/4 of the rescan interval.
  ///
  /// Spreading rescans keeps many folders with the same interval from
  /// scanning in lockstep.
  pub fn next_interval(&self) -> Duration {
    let factor: f64 = rand::thread_rng().gen_range(0.75..=1.25);
    Duration::try_from_secs_f64(self.interval.as_secs_f64() * factor).unwrap_or(self.interval)
  }

  /// Request the next periodic scan. Does nothing in manual-only mode.
  ///
  /// The new delay arrives on the delay channel; the caller never blocks.
  pub fn reschedule(&self) {
    if self.has_no_interval() {
      return;
    }

    let next = self.next_interval();
    debug!(next_secs = next.as_secs_f64(), "Next rescan scheduled");
    // The receiver lives in this struct, so the channel is open
    let _ = self.delay_tx.send(next);
  }

  /// Release the timer. Idempotent.
  pub fn stop(&mut self) {
    self.timer.stop();
  }
}
