//! Background execution of receive waits.
//!
//! One wait runs as one tokio task owning the link for its whole lifetime;
//! the link comes back together with the outcome on join, so the protocol's
//! one-outstanding-expectation rule is enforced by ownership.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::error::WaitError;
use crate::protocol::InboundMessage;
use crate::receiver::{wait_for, SessionPhase, WaitLimits, WaitOutcome};
use crate::transport::Link;

/// Cooperative cancellation flag, shared between a wait and its owner.
///
/// Cancellation cannot abort a read already in flight, but the loop checks
/// the flag at its top and after every decode, so no further reads or
/// writes happen once it is observed.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A receive wait running in the background.
pub struct ReceiverTask<L: Link + 'static> {
    cancel: CancelFlag,
    join: JoinHandle<(L, Result<WaitOutcome, WaitError>)>,
}

impl<L: Link + 'static> ReceiverTask<L> {
    /// Moves the link into a background task running
    /// [`wait_for`](crate::receiver::wait_for) with the given parameters.
    pub fn spawn<F>(mut link: L, phase: SessionPhase, limits: WaitLimits, expected: F) -> Self
    where
        F: FnMut(&InboundMessage) -> bool + Send + 'static,
    {
        let cancel = CancelFlag::new();
        let flag = cancel.clone();
        let join = tokio::spawn(async move {
            let result = wait_for(&mut link, phase, &limits, &flag, expected).await;
            (link, result)
        });
        Self { cancel, join }
    }

    /// Request cooperative cancellation. The task will finish with
    /// [`WaitOutcome::Cancelled`] once it observes the flag.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the task and hands the link back with the outcome.
    pub async fn join(self) -> (L, Result<WaitOutcome, WaitError>) {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => unreachable!("receiver tasks are never aborted"),
        }
    }
}
