//! The resilient receive loop: waits for an expected message while
//! absorbing keep-alive probes, unexpected-but-valid messages and malformed
//! input, under an idle budget and an attempt budget.

use tokio::time::Duration;

use crate::codec::decode;
use crate::config::{ALIVE_DEADLINE, MAX_ATTEMPTS, MAX_IDLE};
use crate::error::{RecvError, WaitError};
use crate::protocol::{InboundMessage, OutboundMessage};
use crate::task::CancelFlag;
use crate::transport::Link;

/// Which phase of the session the wait runs in.
///
/// The only behavioral difference: in a running game an `END_GAME` message
/// is always accepted immediately, whatever was expected, because the match
/// can end at any time. Before the game exists it is just another
/// unexpected message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    PreGame,
    InGame,
}

/// Budgets for one wait. `None` disables the respective budget.
#[derive(Debug, Clone)]
pub struct WaitLimits {
    /// Cumulative idle time tolerated before a liveness probe is mandatory.
    pub max_idle: Option<Duration>,
    /// Recoverable failures (malformed or unexpected messages) tolerated
    /// before giving up.
    pub max_attempts: Option<u32>,
}

impl WaitLimits {
    /// No budgets at all; the wait only ends through the predicate, an
    /// `END_GAME` short-circuit, cancellation or stream loss. Used to
    /// observe the game while the opponent plays.
    pub const UNBOUNDED: WaitLimits = WaitLimits {
        max_idle: None,
        max_attempts: None,
    };

    pub fn new(max_idle: Option<Duration>, max_attempts: Option<u32>) -> Self {
        Self {
            max_idle,
            max_attempts,
        }
    }

    /// The default budgets for request/response waits.
    pub fn standard() -> Self {
        Self {
            max_idle: Some(MAX_IDLE),
            max_attempts: Some(MAX_ATTEMPTS),
        }
    }
}

impl Default for WaitLimits {
    fn default() -> Self {
        Self::standard()
    }
}

/// How a wait finished when it did not fail.
#[derive(Debug)]
pub enum WaitOutcome {
    /// The terminal message: either one the predicate accepted, or an
    /// in-game `END_GAME` short-circuit.
    Message(InboundMessage),
    /// The invocation was cancelled. Not an error; nothing was torn down.
    Cancelled,
}

/// Runs decode attempts against `expected` until a terminal outcome.
///
/// Recoverable decode failures and well-formed but unexpected messages
/// count against the attempt budget. Read timeouts accumulate into the idle
/// budget; when it runs out an `ALIVE` probe is sent and the peer gets one
/// short deadline to answer `OK`, failing the wait otherwise. Inbound
/// `ALIVE` probes are answered with `OK` for free. End of stream is fatal
/// immediately.
pub async fn wait_for<L, F>(
    link: &mut L,
    phase: SessionPhase,
    limits: &WaitLimits,
    cancel: &CancelFlag,
    mut expected: F,
) -> Result<WaitOutcome, WaitError>
where
    L: Link + ?Sized,
    F: FnMut(&InboundMessage) -> bool + Send,
{
    let mut idle = Duration::ZERO;
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            log::debug!("receive wait cancelled");
            return Ok(WaitOutcome::Cancelled);
        }

        match decode(link).await {
            Ok(msg) => {
                if cancel.is_cancelled() {
                    log::debug!("receive wait cancelled");
                    return Ok(WaitOutcome::Cancelled);
                }
                if expected(&msg) {
                    return Ok(WaitOutcome::Message(msg));
                }
                if msg.is_alive() {
                    // peer probing us; answer and keep waiting
                    link.send(&OutboundMessage::ok().to_bytes()).await?;
                    continue;
                }
                if phase == SessionPhase::InGame && msg.is_end_game() {
                    log::debug!("end of game received while waiting for something else");
                    return Ok(WaitOutcome::Message(msg));
                }
                log::debug!("unexpected message {:?}, counting an attempt", msg);
                attempts += 1;
                check_attempts(attempts, limits)?;
            }
            Err(RecvError::TimedOut) => {
                idle += link.read_deadline();
                if let Some(max_idle) = limits.max_idle {
                    if idle >= max_idle {
                        if !probe_liveness(link).await? {
                            log::error!("peer did not answer the liveness probe");
                            return Err(WaitError::TimedOut);
                        }
                        idle = Duration::ZERO;
                        attempts += 1;
                        check_attempts(attempts, limits)?;
                    }
                }
            }
            Err(RecvError::StreamClosed) => {
                log::error!("end of stream while waiting");
                return Err(WaitError::StreamClosed);
            }
            Err(RecvError::Io(e)) => return Err(WaitError::Io(e)),
            Err(err) => {
                log::warn!("recoverable receive failure ({}), counting an attempt", err);
                attempts += 1;
                check_attempts(attempts, limits)?;
            }
        }
    }
}

/// Sends `ALIVE` and gives the peer one short deadline to answer `OK`.
///
/// Any other message, decode failure or silence counts as a dead peer.
/// Write failures are fatal in their own right.
async fn probe_liveness<L: Link + ?Sized>(link: &mut L) -> Result<bool, WaitError> {
    log::debug!("idle budget exhausted, probing the peer");
    link.send(&OutboundMessage::alive().to_bytes()).await?;

    let saved = link.read_deadline();
    link.set_read_deadline(ALIVE_DEADLINE);
    let answered = matches!(decode(link).await, Ok(InboundMessage::Ok));
    link.set_read_deadline(saved);
    Ok(answered)
}

fn check_attempts(attempts: u32, limits: &WaitLimits) -> Result<(), WaitError> {
    match limits.max_attempts {
        Some(max) if attempts >= max => {
            log::error!("attempt budget ({}) exhausted", max);
            Err(WaitError::MaxAttempts)
        }
        _ => Ok(()),
    }
}
