use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Debounces free-text search input.
///
/// Every `push` restarts the quiet period; only the most recent input is
/// released once the deadline passes. Dropping a `settled()` future leaves
/// the pending input in place, so the caller can race it against new input.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<PendingInput>,
}

#[derive(Debug)]
struct PendingInput {
    text: String,
    deadline: Instant,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records new input and restarts the timer.
    pub fn push(&mut self, text: impl Into<String>) {
        self.pending = Some(PendingInput {
            text: text.into(),
            deadline: Instant::now() + self.delay,
        });
    }

    /// Discards the pending input without firing.
    pub fn cancel(&mut self) -> Option<String> {
        self.pending.take().map(|pending| pending.text)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending input if its quiet period has already elapsed.
    pub fn take_ready(&mut self) -> Option<String> {
        let elapsed = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.deadline <= Instant::now());
        if elapsed {
            self.cancel()
        } else {
            None
        }
    }

    /// Waits for the quiet period to elapse and yields the input, or `None`
    /// when nothing is pending.
    pub async fn settled(&mut self) -> Option<String> {
        let deadline = self.pending.as_ref()?.deadline;
        sleep_until(deadline).await;
        self.cancel()
    }
}
