//! Message model for the Senet wire protocol.
//!
//! Every frame is a fixed 3-letter tag followed by a body whose end is
//! determined by the tag's grammar; there is no length prefix and no
//! terminator.

use crate::config::{MAX_NICK_LEN, MIN_NICK_LEN, STONES_PER_PLAYER};
use crate::error::ErrorCode;

/// The three message kinds the protocol knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Info,
    Command,
}

impl MessageKind {
    /// Canonical uppercase tag bytes.
    pub fn tag(&self) -> &'static [u8; 3] {
        match self {
            MessageKind::Error => b"ERR",
            MessageKind::Info => b"INF",
            MessageKind::Command => b"CMD",
        }
    }
}

/// Messages received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Generic confirmation, `INFOK`.
    Ok,
    /// Liveness probe from the peer, `INFALIVE`. May arrive unsolicited.
    Alive,
    /// The match is starting; both nicks in login order.
    StartGame {
        first_nick: String,
        second_nick: String,
    },
    /// The match is over, carrying the winner's nick.
    EndGame { winner: String },
    /// Server-side error report.
    Error { code: ErrorCode },
    /// A new turn begins; both players' stone positions.
    StartTurn {
        first_player: [u8; STONES_PER_PLAYER],
        second_player: [u8; STONES_PER_PLAYER],
    },
}

impl InboundMessage {
    /// True for the `Ok` confirmation.
    pub fn is_ok(&self) -> bool {
        matches!(self, InboundMessage::Ok)
    }

    /// True for a liveness probe.
    pub fn is_alive(&self) -> bool {
        matches!(self, InboundMessage::Alive)
    }

    /// True for an end-of-game notification.
    pub fn is_end_game(&self) -> bool {
        matches!(self, InboundMessage::EndGame { .. })
    }

    /// True for a server error report.
    pub fn is_error(&self) -> bool {
        matches!(self, InboundMessage::Error { .. })
    }

    /// True for a new-turn command.
    pub fn is_start_turn(&self) -> bool {
        matches!(self, InboundMessage::StartTurn { .. })
    }
}

/// A message to be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    kind: MessageKind,
    body: Vec<u8>,
}

impl OutboundMessage {
    /// Generic confirmation, also the answer to an inbound `Alive`.
    pub fn ok() -> Self {
        Self {
            kind: MessageKind::Info,
            body: b"OK".to_vec(),
        }
    }

    /// Liveness probe.
    pub fn alive() -> Self {
        Self {
            kind: MessageKind::Info,
            body: b"ALIVE".to_vec(),
        }
    }

    /// Graceful leave.
    pub fn exit() -> Self {
        Self {
            kind: MessageKind::Info,
            body: b"EXIT".to_vec(),
        }
    }

    /// Login message: one digit with the nick length, then the raw nick.
    ///
    /// The nick must satisfy [`valid_nick`]; the single length digit only
    /// works because the grammar caps nicks at 8 bytes.
    pub fn nick(nick: &str) -> Self {
        debug_assert!(valid_nick(nick));
        let mut body = Vec::with_capacity(1 + nick.len());
        body.push(b'0' + nick.len() as u8);
        body.extend_from_slice(nick.as_bytes());
        Self {
            kind: MessageKind::Command,
            body,
        }
    }

    /// End-of-turn message: both turn words as 20 ASCII digits.
    pub fn end_turn(
        first_player: &[u8; STONES_PER_PLAYER],
        second_player: &[u8; STONES_PER_PLAYER],
    ) -> Self {
        let mut body = Vec::with_capacity(STONES_PER_PLAYER * 4);
        for stone in first_player.iter().chain(second_player.iter()) {
            debug_assert!(*stone <= 99);
            body.push(b'0' + stone / 10);
            body.push(b'0' + stone % 10);
        }
        Self {
            kind: MessageKind::Info,
            body,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Wire form: uppercase tag followed by the body, nothing else.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.body.len());
        out.extend_from_slice(self.kind.tag());
        out.extend_from_slice(&self.body);
        out
    }
}

/// Checks a nickname against the protocol grammar: an ASCII letter first,
/// alphanumeric after that, total length within [3, 8].
pub fn valid_nick(nick: &str) -> bool {
    let len = nick.len();
    if len < MIN_NICK_LEN || len > MAX_NICK_LEN {
        return false;
    }
    let mut chars = nick.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}
