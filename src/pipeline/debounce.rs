//! Quiet-period gate between frame production and analysis.
//!
//! Every submitted item restarts the quiet timer and replaces the pending
//! item; only when the timer runs out does the latest item come out the
//! other end. At most one item is pending at any time. Cancelling the
//! token drops the pending item without emitting it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Handle for submitting items to a running debounce task.
///
/// Dropping the handle tears the gate down like [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub struct DebounceController<T> {
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
    quiet: Duration,
}

impl<T: Send + 'static> DebounceController<T> {
    /// Spawn the debounce task on the current tokio runtime.
    ///
    /// Returns the controller and the receiver of items that survived a
    /// full quiet period. The receiver closes once the gate is torn down.
    pub fn spawn(quiet: Duration, cancel: CancellationToken) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_debounce(quiet, in_rx, out_tx, cancel.clone()));
        (
            Self {
                tx: in_tx,
                cancel,
                quiet,
            },
            out_rx,
        )
    }

    /// Submit an item, restarting the quiet timer.
    ///
    /// Returns `false` if the gate has already been torn down.
    pub fn submit(&self, item: T) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.tx.send(item).is_ok()
    }

    /// Cancel the pending item (if any) and stop the task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

impl<T> Drop for DebounceController<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_debounce<T>(
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<T>,
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
) {
    let mut pending: Option<T> = None;
    let timer = tokio::time::sleep(quiet);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                if pending.take().is_some() {
                    tracing::debug!("debounce torn down; pending frame dropped");
                }
                break;
            }
            item = rx.recv() => {
                let Some(item) = item else {
                    break;
                };
                if pending.replace(item).is_some() {
                    tracing::trace!("superseded pending frame");
                }
                timer.as_mut().reset(Instant::now() + quiet);
            }
            () = &mut timer, if pending.is_some() => {
                if let Some(item) = pending.take()
                    && tx.send(item).is_err()
                {
                    tracing::debug!("debounce output closed; stopping");
                    break;
                }
            }
        }
    }
}
