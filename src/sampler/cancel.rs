//! Cooperative cancellation with escalation.
//!
//! The first interrupt asks the read loops to wind down. A loop only
//! notices between reads, and a device-file read blocked on a stalled
//! RNG is restarted after the signal, so the handler waits a short
//! grace period for the loop to acknowledge. If it does not, or if a
//! second interrupt arrives, the process exits on the spot.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const RUNNING: u8 = 0;
const REQUESTED: u8 = 1;
const ACKNOWLEDGED: u8 = 2;

/// How long the interrupt handler waits for a loop to acknowledge.
pub const INTERRUPT_GRACE: Duration = Duration::from_millis(250);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Shared flag telling the read loops to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<AtomicU8>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Does nothing if already requested.
    pub fn cancel(&self) {
        let _ = self
            .state
            .compare_exchange(RUNNING, REQUESTED, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::SeqCst) != RUNNING
    }

    /// Checks for cancellation from a read loop.
    ///
    /// Returns true if cancellation was requested, and records that the
    /// loop has seen it and is shutting down.
    pub fn acknowledge(&self) -> bool {
        self.state
            .compare_exchange(REQUESTED, ACKNOWLEDGED, Ordering::SeqCst, Ordering::SeqCst)
            .map_or_else(|current| current == ACKNOWLEDGED, |_| true)
    }

    /// Returns true once a loop has acknowledged cancellation.
    pub fn is_acknowledged(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ACKNOWLEDGED
    }

    /// Handles one interrupt.
    ///
    /// The first call requests cancellation and waits up to `grace` for
    /// a loop to acknowledge it. Any later call escalates at once.
    /// Returns true when the caller should terminate the process.
    pub fn interrupt(&self, grace: Duration) -> bool {
        if self
            .state
            .compare_exchange(RUNNING, REQUESTED, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return true;
        }

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.is_acknowledged() {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
        !self.is_acknowledged()
    }

    /// Installs a Ctrl-C handler driving this token.
    ///
    /// When an interrupt escalates the process exits with `exit_code`,
    /// the same code a cooperative shutdown of the current mode uses.
    pub fn cancel_on_interrupt(&self, exit_code: i32) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            tracing::debug!("Interrupt received");
            if token.interrupt(INTERRUPT_GRACE) {
                tracing::debug!(exit_code, "Read loop did not stop, exiting");
                std::process::exit(exit_code);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());

        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_acknowledge_only_after_cancel() {
        let token = CancelToken::new();
        assert!(!token.acknowledge());
        assert!(!token.is_acknowledged());

        token.cancel();
        assert!(!token.is_acknowledged());
        assert!(token.acknowledge());
        assert!(token.is_acknowledged());
        // Stays acknowledged on later checks.
        assert!(token.acknowledge());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_unacknowledged_interrupt_escalates() {
        let token = CancelToken::new();

        assert!(token.interrupt(Duration::from_millis(20)));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_acknowledged_interrupt_does_not_escalate() {
        let token = CancelToken::new();
        let looper = token.clone();
        let worker = thread::spawn(move || {
            while !looper.acknowledge() {
                thread::sleep(Duration::from_millis(1));
            }
        });

        assert!(!token.interrupt(Duration::from_secs(5)));
        worker.join().unwrap();
        assert!(token.is_acknowledged());
    }

    #[test]
    fn test_second_interrupt_escalates() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.acknowledge());

        assert!(token.interrupt(Duration::from_secs(5)));
    }
}
