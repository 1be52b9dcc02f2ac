//! The collaborator-facing surface: outbound requests paired with the
//! receive waits the login and turn flows need.

use tokio::net::ToSocketAddrs;

use crate::config::STONES_PER_PLAYER;
use crate::error::{ErrorCode, LinkError, RecvError, WaitError};
use crate::protocol::{valid_nick, InboundMessage, OutboundMessage};
use crate::receiver::{wait_for, SessionPhase, WaitLimits, WaitOutcome};
use crate::task::{CancelFlag, ReceiverTask};
use crate::transport::tcp::TcpLink;
use crate::transport::Link;

/// A connected game client.
///
/// Owns the link; the protocol is half-duplex from the client's side, so
/// every wait here runs inline and exclusively. For the one long-running
/// wait (watching the game while the opponent plays) the client converts
/// itself into a background [`Observation`] and comes back on join.
pub struct SenetClient<L: Link> {
    link: L,
    limits: WaitLimits,
}

impl SenetClient<TcpLink> {
    /// Connect over TCP with default deadlines and budgets.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, LinkError> {
        Ok(Self::new(TcpLink::connect(addr).await?))
    }
}

impl<L: Link + 'static> SenetClient<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            limits: WaitLimits::standard(),
        }
    }

    pub fn with_limits(link: L, limits: WaitLimits) -> Self {
        Self { link, limits }
    }

    /// Gives the link back, e.g. to hand it to another owner.
    pub fn into_link(self) -> L {
        self.link
    }

    /// Full login round: validate the nick locally, send it, wait for the
    /// confirmation. `Ok(None)` means the server accepted the nick;
    /// `Ok(Some(code))` carries the rejection (a locally invalid nick is
    /// rejected without touching the wire).
    pub async fn login(&mut self, nick: &str) -> Result<Option<ErrorCode>, WaitError> {
        if !valid_nick(nick) {
            return Ok(Some(ErrorCode::BadNickname));
        }
        self.send_nick(nick).await?;
        match self.await_nick_confirm().await? {
            InboundMessage::Error { code } => Ok(Some(code)),
            _ => Ok(None),
        }
    }

    /// Sends the login message. The nick must satisfy
    /// [`valid_nick`](crate::protocol::valid_nick).
    pub async fn send_nick(&mut self, nick: &str) -> Result<(), LinkError> {
        self.send(&OutboundMessage::nick(nick)).await
    }

    /// Sends both turn words, ending this player's turn.
    pub async fn send_end_turn(
        &mut self,
        first_player: &[u8; STONES_PER_PLAYER],
        second_player: &[u8; STONES_PER_PLAYER],
    ) -> Result<(), LinkError> {
        self.send(&OutboundMessage::end_turn(first_player, second_player))
            .await
    }

    /// Sends a bare confirmation.
    pub async fn send_ok(&mut self) -> Result<(), LinkError> {
        self.send(&OutboundMessage::ok()).await
    }

    /// Announces a graceful leave.
    pub async fn send_exit(&mut self) -> Result<(), LinkError> {
        self.send(&OutboundMessage::exit()).await
    }

    async fn send(&mut self, msg: &OutboundMessage) -> Result<(), LinkError> {
        log::trace!("sending {:?}", msg);
        self.link.send(&msg.to_bytes()).await
    }

    /// Pre-game wait for the nick confirmation: `OK` or an error report.
    pub async fn await_nick_confirm(&mut self) -> Result<InboundMessage, WaitError> {
        self.wait(SessionPhase::PreGame, |m| m.is_ok() || m.is_error())
            .await
    }

    /// Pre-game wait for the match to start.
    pub async fn await_start_game(&mut self) -> Result<InboundMessage, WaitError> {
        self.wait(SessionPhase::PreGame, |m| {
            matches!(m, InboundMessage::StartGame { .. })
        })
        .await
    }

    /// In-game wait for the answer to an end-turn: `OK` or an error report.
    /// An `END_GAME` arriving instead is returned as-is.
    pub async fn await_turn_confirm(&mut self) -> Result<InboundMessage, WaitError> {
        self.wait(SessionPhase::InGame, |m| m.is_ok() || m.is_error())
            .await
    }

    /// In-game wait for this player's next turn. An `END_GAME` arriving
    /// instead is returned as-is.
    pub async fn await_new_turn(&mut self) -> Result<InboundMessage, WaitError> {
        self.wait(SessionPhase::InGame, |m| m.is_start_turn()).await
    }

    /// General request/response form: send, then wait under the given
    /// phase, limits and predicate.
    pub async fn send_and_await<F>(
        &mut self,
        msg: &OutboundMessage,
        phase: SessionPhase,
        limits: &WaitLimits,
        expected: F,
    ) -> Result<InboundMessage, WaitError>
    where
        F: FnMut(&InboundMessage) -> bool + Send,
    {
        self.send(msg).await?;
        let outcome = wait_for(&mut self.link, phase, limits, &CancelFlag::new(), expected).await?;
        Ok(Self::into_message(outcome))
    }

    /// Decodes a single message with no retry loop.
    pub async fn recv_once(&mut self) -> Result<InboundMessage, RecvError> {
        crate::codec::decode(&mut self.link).await
    }

    /// Converts the client into a background wait with no budgets, used to
    /// watch for the next turn or the end of the game while the opponent
    /// plays. Only the predicate, an `END_GAME`, cancellation or stream
    /// loss end it.
    pub fn observe_until<F>(self, expected: F) -> Observation<L>
    where
        F: FnMut(&InboundMessage) -> bool + Send + 'static,
    {
        Observation {
            task: ReceiverTask::spawn(
                self.link,
                SessionPhase::InGame,
                WaitLimits::UNBOUNDED,
                expected,
            ),
            limits: self.limits,
        }
    }

    async fn wait<F>(&mut self, phase: SessionPhase, expected: F) -> Result<InboundMessage, WaitError>
    where
        F: FnMut(&InboundMessage) -> bool + Send,
    {
        let limits = self.limits.clone();
        let outcome = wait_for(&mut self.link, phase, &limits, &CancelFlag::new(), expected).await?;
        Ok(Self::into_message(outcome))
    }

    fn into_message(outcome: WaitOutcome) -> InboundMessage {
        match outcome {
            WaitOutcome::Message(msg) => msg,
            // inline waits carry a flag nobody can set
            WaitOutcome::Cancelled => unreachable!("inline wait cancelled"),
        }
    }
}

/// A client that is busy observing the game in the background.
pub struct Observation<L: Link + 'static> {
    task: ReceiverTask<L>,
    limits: WaitLimits,
}

impl<L: Link + 'static> Observation<L> {
    /// Request cooperative cancellation of the observation.
    pub fn cancel(&self) {
        self.task.cancel();
    }

    /// Waits for the observation to finish and restores the client.
    pub async fn join(self) -> (SenetClient<L>, Result<WaitOutcome, WaitError>) {
        let (link, result) = self.task.join().await;
        (
            SenetClient {
                link,
                limits: self.limits,
            },
            result,
        )
    }
}
