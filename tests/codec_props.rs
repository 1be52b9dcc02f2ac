use proptest::prelude::*;
use senet_client::{decode, ErrorCode, InboundMessage, InMemoryLink, RecvError};
use tokio::runtime::Builder;

fn block_decode(bytes: &[u8]) -> Result<InboundMessage, RecvError> {
    let rt = Builder::new_current_thread().build().unwrap();
    rt.block_on(async {
        let mut link = InMemoryLink::new().feed(bytes).then_eof();
        decode(&mut link).await
    })
}

/// Upper/lower-cases each letter of `text` according to the bits.
fn perturb_case(text: &[u8], bits: u64) -> Vec<u8> {
    text.iter()
        .enumerate()
        .map(|(i, &b)| {
            if (bits >> (i % 64)) & 1 == 1 {
                b.to_ascii_lowercase()
            } else {
                b.to_ascii_uppercase()
            }
        })
        .collect()
}

fn whitespace() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(b' '), Just(b'\n')], 0..4)
}

fn nick() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{2,7}"
}

proptest! {
    #[test]
    fn ok_survives_case_and_whitespace(bits in any::<u64>(), ws in whitespace()) {
        let mut bytes = ws;
        bytes.extend(perturb_case(b"INFOK", bits));
        prop_assert_eq!(block_decode(&bytes).unwrap(), InboundMessage::Ok);
    }

    #[test]
    fn alive_survives_case_and_whitespace(bits in any::<u64>(), ws in whitespace()) {
        let mut bytes = ws;
        bytes.extend(perturb_case(b"INFALIVE", bits));
        prop_assert_eq!(block_decode(&bytes).unwrap(), InboundMessage::Alive);
    }

    #[test]
    fn start_game_round_trips(
        n1 in nick(),
        n2 in nick(),
        bits in any::<u64>(),
        ws in whitespace(),
    ) {
        let mut bytes = ws;
        bytes.extend(perturb_case(b"INFSTART_GAME", bits));
        bytes.extend(n1.as_bytes());
        bytes.push(b',');
        bytes.extend(n2.as_bytes());
        bytes.push(b';');
        prop_assert_eq!(
            block_decode(&bytes).unwrap(),
            InboundMessage::StartGame { first_nick: n1, second_nick: n2 }
        );
    }

    #[test]
    fn end_game_round_trips(winner in nick(), bits in any::<u64>(), ws in whitespace()) {
        let mut bytes = ws;
        bytes.extend(perturb_case(b"INFEND_GAME", bits));
        bytes.extend(winner.as_bytes());
        bytes.push(b';');
        prop_assert_eq!(
            block_decode(&bytes).unwrap(),
            InboundMessage::EndGame { winner }
        );
    }

    #[test]
    fn every_two_digit_error_code_decodes(code in 0u8..100, bits in any::<u64>(), ws in whitespace()) {
        let mut bytes = ws;
        bytes.extend(perturb_case(b"ERR", bits));
        bytes.extend(format!("{:02}", code).as_bytes());
        prop_assert_eq!(
            block_decode(&bytes).unwrap(),
            InboundMessage::Error { code: ErrorCode::from_wire(code) }
        );
    }

    #[test]
    fn start_turn_round_trips(
        stones in prop::array::uniform10(0u8..100),
        bits in any::<u64>(),
        ws in whitespace(),
    ) {
        let mut bytes = ws;
        bytes.extend(perturb_case(b"CMD", bits));
        for stone in stones {
            bytes.extend(format!("{:02}", stone).as_bytes());
        }
        let mut first_player = [0u8; 5];
        let mut second_player = [0u8; 5];
        first_player.copy_from_slice(&stones[..5]);
        second_player.copy_from_slice(&stones[5..]);
        prop_assert_eq!(
            block_decode(&bytes).unwrap(),
            InboundMessage::StartTurn { first_player, second_player }
        );
    }

    #[test]
    fn junk_first_bytes_never_panic(byte in any::<u8>()) {
        // anything that is not a tag letter or whitespace must fail cleanly
        if !matches!(byte, b'c' | b'C' | b'i' | b'I' | b'e' | b'E' | b' ' | b'\n') {
            let result = block_decode(&[byte, b'X', b'X']);
            prop_assert!(matches!(
                result,
                Err(RecvError::Malformed(ErrorCode::BadMsgType))
            ));
        }
    }
}
