//! Error codes shared with the server and the client-side failure taxonomy.

use std::io;

/// Numeric error codes carried by `ERR` messages.
///
/// The wire form is exactly two ASCII decimal digits. Numbers outside the
/// table decode to [`ErrorCode::Unrecognized`]; that is still a successfully
/// decoded message, not a framing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unspecified server-side failure.
    GeneralError,
    /// Operation not valid in the server's current state.
    BadOperation,
    /// Message tag was not ERR/INF/CMD.
    BadMsgType,
    /// Message body violated its grammar.
    BadMsgContent,
    /// Nickname failed the nickname grammar.
    BadNickname,
    /// Nickname already in use on the server.
    NicknameTaken,
    /// Nickname shorter than the minimum length.
    NickTooShort,
    /// Server has no free player slot.
    ServerFull,
    /// Turn data sent while it was not this player's turn.
    NotMyTurn,
    /// Login attempted while a game is already running.
    GameAlreadyRunning,
    /// Turn word rejected by the server.
    BadTurn,
    /// Peer stopped responding within the time budget.
    Timeout,
    /// Too many recoverable failures in one wait.
    MaxAttemptsReached,
    /// A well-formed but unexpected message arrived.
    UnexpectedMessage,
    /// No connection is established.
    NoConnection,
    // any other two-digit number
    Unrecognized,
}

impl ErrorCode {
    /// Maps a two-digit wire number onto a code.
    pub fn from_wire(code: u8) -> ErrorCode {
        match code {
            50 => ErrorCode::GeneralError,
            51 => ErrorCode::BadOperation,
            52 => ErrorCode::BadMsgType,
            53 => ErrorCode::BadMsgContent,
            54 => ErrorCode::BadNickname,
            55 => ErrorCode::NicknameTaken,
            56 => ErrorCode::NickTooShort,
            57 => ErrorCode::ServerFull,
            58 => ErrorCode::NotMyTurn,
            59 => ErrorCode::GameAlreadyRunning,
            60 => ErrorCode::BadTurn,
            61 => ErrorCode::Timeout,
            62 => ErrorCode::MaxAttemptsReached,
            63 => ErrorCode::UnexpectedMessage,
            64 => ErrorCode::NoConnection,
            _ => ErrorCode::Unrecognized,
        }
    }

    /// The two-digit wire number, if this code has one.
    pub fn wire_code(&self) -> Option<u8> {
        match self {
            ErrorCode::GeneralError => Some(50),
            ErrorCode::BadOperation => Some(51),
            ErrorCode::BadMsgType => Some(52),
            ErrorCode::BadMsgContent => Some(53),
            ErrorCode::BadNickname => Some(54),
            ErrorCode::NicknameTaken => Some(55),
            ErrorCode::NickTooShort => Some(56),
            ErrorCode::ServerFull => Some(57),
            ErrorCode::NotMyTurn => Some(58),
            ErrorCode::GameAlreadyRunning => Some(59),
            ErrorCode::BadTurn => Some(60),
            ErrorCode::Timeout => Some(61),
            ErrorCode::MaxAttemptsReached => Some(62),
            ErrorCode::UnexpectedMessage => Some(63),
            ErrorCode::NoConnection => Some(64),
            ErrorCode::Unrecognized => None,
        }
    }

    /// Human-readable translation for the presentation layer.
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorCode::GeneralError => "The server reported a general failure.",
            ErrorCode::BadOperation => "The server rejected the operation.",
            ErrorCode::BadMsgType => "Malformed message type.",
            ErrorCode::BadMsgContent => "Malformed message content.",
            ErrorCode::BadNickname => "The nickname is not valid.",
            ErrorCode::NicknameTaken => "The nickname is already taken.",
            ErrorCode::NickTooShort => "The nickname is too short.",
            ErrorCode::ServerFull => "The server is full.",
            ErrorCode::NotMyTurn => "It is not your turn.",
            ErrorCode::GameAlreadyRunning => "A game is already running.",
            ErrorCode::BadTurn => "The server rejected the turn.",
            ErrorCode::Timeout => "The server stopped responding.",
            ErrorCode::MaxAttemptsReached => "Too many failed receive attempts.",
            ErrorCode::UnexpectedMessage => "The server sent an unexpected message.",
            ErrorCode::NoConnection => "No active connection.",
            ErrorCode::Unrecognized => "The server reported an unknown error.",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Failures raised by a [`Link`](crate::transport::Link).
#[derive(Debug)]
pub enum LinkError {
    /// No byte arrived within the per-read deadline.
    TimedOut,
    /// The peer closed the connection.
    Closed,
    /// Any other socket-level failure.
    Io(io::Error),
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::TimedOut => write!(f, "read deadline elapsed"),
            LinkError::Closed => write!(f, "connection closed by peer"),
            LinkError::Io(e) => write!(f, "socket error: {}", e),
        }
    }
}

impl std::error::Error for LinkError {}

/// The only error type the codec raises.
///
/// [`RecvError::Malformed`] is recoverable: the stream is still aligned on a
/// message boundary as far as the peer is concerned, so the caller may try
/// the next message. Everything else means the current wait cannot continue.
#[derive(Debug)]
pub enum RecvError {
    /// The peer sent bytes violating the message grammar.
    Malformed(ErrorCode),
    /// The per-read deadline elapsed before a byte arrived.
    TimedOut,
    /// End of stream: the connection is gone. Never retried.
    StreamClosed,
    /// Socket-level failure other than a clean close.
    Io(io::Error),
}

impl RecvError {
    /// True for failures the receive loop may absorb and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RecvError::Malformed(_))
    }

    /// The error code this failure resolves to.
    pub fn code(&self) -> ErrorCode {
        match self {
            RecvError::Malformed(code) => *code,
            RecvError::TimedOut => ErrorCode::Timeout,
            RecvError::StreamClosed => ErrorCode::NoConnection,
            RecvError::Io(_) => ErrorCode::GeneralError,
        }
    }
}

impl From<LinkError> for RecvError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::TimedOut => RecvError::TimedOut,
            LinkError::Closed => RecvError::StreamClosed,
            LinkError::Io(e) => RecvError::Io(e),
        }
    }
}

impl std::fmt::Display for RecvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecvError::Malformed(code) => write!(f, "malformed message: {:?}", code),
            RecvError::TimedOut => write!(f, "read deadline elapsed"),
            RecvError::StreamClosed => write!(f, "end of stream"),
            RecvError::Io(e) => write!(f, "socket error: {}", e),
        }
    }
}

impl std::error::Error for RecvError {}

/// Fatal outcomes of a receive wait. Any of these must tear the session down.
#[derive(Debug)]
pub enum WaitError {
    /// The idle budget ran out and the liveness probe went unanswered.
    TimedOut,
    /// The attempt budget ran out.
    MaxAttempts,
    /// The peer closed the connection.
    StreamClosed,
    /// Socket-level failure.
    Io(io::Error),
}

impl WaitError {
    /// The error code this failure resolves to.
    pub fn code(&self) -> ErrorCode {
        match self {
            WaitError::TimedOut => ErrorCode::Timeout,
            WaitError::MaxAttempts => ErrorCode::MaxAttemptsReached,
            WaitError::StreamClosed => ErrorCode::NoConnection,
            WaitError::Io(_) => ErrorCode::GeneralError,
        }
    }
}

impl From<LinkError> for WaitError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::TimedOut => WaitError::TimedOut,
            LinkError::Closed => WaitError::StreamClosed,
            LinkError::Io(e) => WaitError::Io(e),
        }
    }
}

impl std::fmt::Display for WaitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitError::TimedOut => write!(f, "peer stopped responding"),
            WaitError::MaxAttempts => write!(f, "too many failed receive attempts"),
            WaitError::StreamClosed => write!(f, "end of stream"),
            WaitError::Io(e) => write!(f, "socket error: {}", e),
        }
    }
}

impl std::error::Error for WaitError {}
