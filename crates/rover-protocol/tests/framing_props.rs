//! Property-based tests for the stream framer.
//!
//! The framing law: any sequence of valid messages survives arbitrary
//! re-chunking of its encoded bytes: the framer yields exactly the same
//! payloads regardless of how reads split or coalesce the stream.

use proptest::prelude::*;
use rover_core::constants::TERMINATOR;
use rover_protocol::Framer;

/// Strategy for a single payload: ASCII without terminator bytes.
fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        (0x20u8..0x7F).prop_filter("no terminator bytes", |b| *b != 0x07 && *b != 0x08),
        0..=98,
    )
}

/// Strategy for chunk boundaries: sizes in 1..=7 drawn until exhausted.
fn chunk_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=7, 1..200)
}

fn encode(messages: &[Vec<u8>]) -> Vec<u8> {
    let mut stream = Vec::new();
    for message in messages {
        stream.extend_from_slice(message);
        stream.extend_from_slice(TERMINATOR);
    }
    stream
}

proptest! {
    /// Feeding the encoded stream in arbitrary chunks yields the original
    /// payload sequence.
    #[test]
    fn rechunking_preserves_messages(
        messages in prop::collection::vec(payload(), 1..8),
        sizes in chunk_sizes(),
    ) {
        let stream = encode(&messages);
        let mut framer = Framer::new();
        let mut decoded = Vec::new();

        let mut offset = 0;
        let mut size_iter = sizes.iter().cycle();
        while offset < stream.len() {
            let size = (*size_iter.next().unwrap()).min(stream.len() - offset);
            framer.feed(&stream[offset..offset + size]);
            offset += size;

            while let Some(frame) = framer.next_frame(98).unwrap() {
                decoded.push(frame.to_vec());
            }
        }

        prop_assert_eq!(decoded, messages);
    }

    /// A stream with no terminator never yields a frame and is rejected
    /// exactly when it can no longer fit the limit.
    #[test]
    fn oversize_streams_are_rejected(content in prop::collection::vec(0x20u8..0x7F, 20..60)) {
        let content: Vec<u8> = content
            .into_iter()
            .filter(|b| *b != 0x07 && *b != 0x08)
            .collect();
        prop_assume!(content.len() > 18);

        let mut framer = Framer::new();
        let mut rejected = false;
        for (i, &b) in content.iter().enumerate() {
            framer.feed(&[b]);
            match framer.next_frame(18) {
                Ok(None) => prop_assert!(i < 18, "viable past the limit"),
                Ok(Some(_)) => prop_assert!(false, "no frame exists in this stream"),
                Err(_) => {
                    rejected = true;
                    break;
                }
            }
        }
        prop_assert!(rejected);
    }
}
