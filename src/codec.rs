//! Byte-by-byte decoder for the inbound wire format.
//!
//! There is no length prefix: each message kind has a grammar that tells the
//! reader where the message ends. All tags and literals are matched
//! case-insensitively.

use crate::config::{MAX_NICK_LEN, MIN_NICK_LEN, STONES_PER_PLAYER};
use crate::error::{ErrorCode, RecvError};
use crate::protocol::{valid_nick, InboundMessage, MessageKind};
use crate::transport::Link;

/// Reads exactly one message from the link.
///
/// A [`RecvError::Malformed`] return leaves the stream cursor somewhere
/// inside the rejected message; the receive loop simply tries again from
/// there until a tag byte lines up. End of stream is fatal wherever it
/// occurs.
pub async fn decode<L: Link + ?Sized>(link: &mut L) -> Result<InboundMessage, RecvError> {
    let kind = read_tag(link).await?;
    let msg = match kind {
        MessageKind::Info => read_info_body(link).await?,
        MessageKind::Error => read_error_body(link).await?,
        MessageKind::Command => read_command_body(link).await?,
    };
    log::trace!("received {:?}", msg);
    Ok(msg)
}

/// Determines the message kind from the 3-letter tag.
///
/// Stray `' '` / `'\n'` bytes are skipped in a pre-scan before any tag byte
/// counts, so whitespace can never misalign the fixed-width tag match.
async fn read_tag<L: Link + ?Sized>(link: &mut L) -> Result<MessageKind, RecvError> {
    let mut first = link.recv_byte().await?;
    while first == b' ' || first == b'\n' {
        first = link.recv_byte().await?;
    }

    let kind = match first {
        b'c' | b'C' => MessageKind::Command,
        b'i' | b'I' => MessageKind::Info,
        b'e' | b'E' => MessageKind::Error,
        _ => return Err(RecvError::Malformed(ErrorCode::BadMsgType)),
    };

    for expected in &kind.tag()[1..] {
        let got = link.recv_byte().await?;
        if !got.eq_ignore_ascii_case(expected) {
            return Err(RecvError::Malformed(ErrorCode::BadMsgType));
        }
    }
    Ok(kind)
}

/// INF bodies: `OK`, `ALIVE`, `START_GAME<n1>,<n2>;`, `END_GAME<winner>;`.
async fn read_info_body<L: Link + ?Sized>(link: &mut L) -> Result<InboundMessage, RecvError> {
    let first = link.recv_byte().await?;
    match first {
        b'o' | b'O' => {
            let second = link.recv_byte().await?;
            if second.eq_ignore_ascii_case(&b'K') {
                Ok(InboundMessage::Ok)
            } else {
                Err(RecvError::Malformed(ErrorCode::BadMsgContent))
            }
        }
        b'a' | b'A' => {
            expect_literal(link, b"LIVE").await?;
            Ok(InboundMessage::Alive)
        }
        b's' | b'S' => {
            expect_literal(link, b"TART_GAME").await?;
            let first_nick = read_nick(link, b',')
                .await?
                .filter(|n| valid_nick(n))
                .ok_or(RecvError::Malformed(ErrorCode::BadNickname))?;
            let second_nick = read_nick(link, b';')
                .await?
                .filter(|n| valid_nick(n))
                .ok_or(RecvError::Malformed(ErrorCode::BadNickname))?;
            Ok(InboundMessage::StartGame {
                first_nick,
                second_nick,
            })
        }
        b'e' | b'E' => {
            expect_literal(link, b"ND_GAME").await?;
            let winner = read_nick(link, b';')
                .await?
                .ok_or(RecvError::Malformed(ErrorCode::GeneralError))?;
            Ok(InboundMessage::EndGame { winner })
        }
        _ => Err(RecvError::Malformed(ErrorCode::BadMsgContent)),
    }
}

/// ERR bodies: exactly two decimal digits.
///
/// Every two-digit number decodes successfully; numbers outside the code
/// table surface as [`ErrorCode::Unrecognized`].
async fn read_error_body<L: Link + ?Sized>(link: &mut L) -> Result<InboundMessage, RecvError> {
    let code = read_decimal(link, 2).await?;
    Ok(InboundMessage::Error {
        code: ErrorCode::from_wire(code),
    })
}

/// CMD bodies: both players' turn words, 20 decimal digits total.
async fn read_command_body<L: Link + ?Sized>(link: &mut L) -> Result<InboundMessage, RecvError> {
    let first_player = read_turn_word(link).await?;
    let second_player = read_turn_word(link).await?;
    Ok(InboundMessage::StartTurn {
        first_player,
        second_player,
    })
}

async fn read_turn_word<L: Link + ?Sized>(
    link: &mut L,
) -> Result<[u8; STONES_PER_PLAYER], RecvError> {
    let mut stones = [0u8; STONES_PER_PLAYER];
    for stone in stones.iter_mut() {
        *stone = read_decimal(link, 2).await?;
    }
    Ok(stones)
}

/// Reads `digits` ASCII decimal digits into one number.
async fn read_decimal<L: Link + ?Sized>(link: &mut L, digits: u32) -> Result<u8, RecvError> {
    let mut value = 0u8;
    for _ in 0..digits {
        let b = link.recv_byte().await?;
        if !b.is_ascii_digit() {
            return Err(RecvError::Malformed(ErrorCode::BadMsgContent));
        }
        value = value * 10 + (b - b'0');
    }
    Ok(value)
}

/// Matches the remaining bytes of a keyword, case-insensitively.
async fn expect_literal<L: Link + ?Sized>(link: &mut L, literal: &[u8]) -> Result<(), RecvError> {
    for expected in literal {
        let got = link.recv_byte().await?;
        if !got.eq_ignore_ascii_case(expected) {
            return Err(RecvError::Malformed(ErrorCode::BadMsgContent));
        }
    }
    Ok(())
}

/// Scans bytes up to `delimiter`.
///
/// `None` means the text cannot be a nickname: the delimiter did not show
/// up within the scan bound, a newline was embedded, or the result is
/// shorter than the minimum. Link failures pass through untouched.
async fn read_nick<L: Link + ?Sized>(
    link: &mut L,
    delimiter: u8,
) -> Result<Option<String>, RecvError> {
    let mut nick = String::new();
    loop {
        let b = link.recv_byte().await?;
        if b == delimiter {
            break;
        }
        if nick.len() >= MAX_NICK_LEN || b == b'\n' {
            return Ok(None);
        }
        nick.push(b as char);
    }
    if nick.len() < MIN_NICK_LEN {
        return Ok(None);
    }
    Ok(Some(nick))
}
