//! Frame codec tests

use rf_joystick_link::frame::{checksum, DecodedFrame, Frame, FrameCodec, FrameError, FRAME_LEN};
use rf_joystick_link::input::{Button, InputState, Keys};

fn codec() -> FrameCodec {
    FrameCodec::default()
}

#[test]
fn test_status_frame_known_bytes() {
    // K1 + KZ pressed, X full right, Y full down
    let state = InputState::new(Keys::from_bits(0x11), 0x03FF, 0x0000);
    let frame = codec().encode_status(&state);
    assert_eq!(frame.as_bytes(), &[0xAA, 0x11, 0x03, 0xFF, 0x00, 0x00, 0x47]);
}

#[test]
fn test_keepalive_frame_known_bytes() {
    let frame = codec().encode_keepalive();
    assert_eq!(frame.as_bytes(), &[0xE0, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x4A]);
}

#[test]
fn test_keepalive_is_constant() {
    let codec = codec();
    // Encoding a status in between must not affect the keepalive
    let before = codec.encode_keepalive();
    let _ = codec.encode_status(&InputState::new(Keys::from_bits(0x1F), 512, 512));
    assert_eq!(codec.encode_keepalive(), before);
}

#[test]
fn test_checksum_cancels_to_zero() {
    let codec = codec();
    let frames = [
        codec.encode_keepalive(),
        codec.encode_status(&InputState::default()),
        codec.encode_status(&InputState::new(Keys::from_bits(0x15), 0x0123, 0x03FE)),
        codec.encode_status(&InputState::new(Keys::from_bits(0x1F), 1023, 1023)),
    ];

    for frame in frames {
        let bytes = frame.as_bytes();
        assert_eq!(checksum(&bytes[..6]) ^ bytes[6], 0, "frame {}", frame);
        assert_eq!(checksum(bytes), 0);
    }
}

#[test]
fn test_status_round_trip_sampled() {
    let codec = codec();

    // Boundaries plus a spread of interior values
    let axes = [0u16, 1, 7, 255, 256, 511, 512, 768, 1022, 1023];
    for keys in [0u8, 1, 2, 4, 8, 16, 0x11, 0x0A, 0x1F] {
        for (i, &x) in axes.iter().enumerate() {
            let y = axes[axes.len() - 1 - i];
            let state = InputState::new(Keys::from_bits(keys), x, y);
            let frame = codec.encode_status(&state);
            assert_eq!(codec.decode(frame.as_bytes()), Ok(DecodedFrame::Status(state)));
        }
    }
}

#[test]
fn test_keepalive_round_trip() {
    let codec = codec();
    let frame = codec.encode_keepalive();
    assert_eq!(codec.decode(frame.as_bytes()), Ok(DecodedFrame::Keepalive));
}

#[test]
fn test_every_single_bit_flip_detected() {
    let codec = codec();
    let frames = [
        codec.encode_keepalive(),
        codec.encode_status(&InputState::new(Keys::from_bits(0x11), 0x03FF, 0)),
    ];

    for frame in frames {
        for byte in 0..FRAME_LEN {
            for bit in 0..8 {
                let mut bytes = frame.into_bytes();
                bytes[byte] ^= 1 << bit;
                assert!(
                    matches!(codec.decode(&bytes), Err(FrameError::Checksum { .. })),
                    "flip byte {} bit {} of {} not detected",
                    byte,
                    bit,
                    frame
                );
            }
        }
    }
}

#[test]
fn test_cancelling_double_flip_not_detected() {
    let codec = codec();
    let state = InputState::new(Keys::from_bits(0x01), 0x0200, 0x0100);
    let mut bytes = codec.encode_status(&state).into_bytes();

    // Same bit flipped in two payload bytes: XOR is blind to it
    bytes[1] ^= 0x02;
    bytes[3] ^= 0x02;

    let decoded = codec.decode(&bytes).unwrap();
    let DecodedFrame::Status(corrupted) = decoded else {
        panic!("expected status, got {:?}", decoded);
    };
    assert_ne!(corrupted, state);
    assert!(corrupted.keys.contains(Button::K2));
}

#[test]
fn test_decode_length_errors() {
    let codec = codec();
    let frame = codec.encode_keepalive();

    assert_eq!(codec.decode(&frame.as_bytes()[..6]), Err(FrameError::Length { len: 6 }));

    let mut long = [0u8; 8];
    long[..7].copy_from_slice(frame.as_bytes());
    assert_eq!(codec.decode(&long), Err(FrameError::Length { len: 8 }));
}

#[test]
fn test_decode_checksum_error_fields() {
    let codec = codec();
    let mut bytes = codec.encode_keepalive().into_bytes();
    bytes[6] = 0xB5; // value claimed by old documentation

    assert_eq!(
        codec.decode(&bytes),
        Err(FrameError::Checksum { computed: 0x4A, received: 0xB5 })
    );
}

#[test]
fn test_decode_unknown_preamble_with_valid_checksum() {
    let codec = codec();
    let frame = Frame::new(0x55, [1, 2, 3, 4, 5]);
    assert_eq!(
        codec.decode(frame.as_bytes()),
        Err(FrameError::UnknownFrameType { preamble: 0x55 })
    );
}

#[test]
fn test_altered_keepalive_payload_rejected() {
    let codec = codec();
    // Checksum-valid, right preamble, wrong filler
    let frame = Frame::new(0xE0, [0, 0, 0, 0, 0]);
    assert_eq!(codec.decode(frame.as_bytes()), Err(FrameError::Payload { preamble: 0xE0 }));
}

#[test]
fn test_shifted_status_window_rejected() {
    // Any 7-byte window of a repeated frame XORs to zero, so the checksum
    // passes; the payload check must catch it.
    let codec = codec();
    let wire = codec.encode_status(&InputState::new(Keys::NONE, 0x00AA, 0x00E0));
    let mut stream = wire.as_bytes().to_vec();
    stream.extend_from_slice(wire.as_bytes());

    // Window starting at the 0xAA inside X
    assert_eq!(
        codec.decode(&stream[3..3 + FRAME_LEN]),
        Err(FrameError::Payload { preamble: 0xAA })
    );
    // Window starting at the 0xE0 inside Y
    assert_eq!(
        codec.decode(&stream[5..5 + FRAME_LEN]),
        Err(FrameError::Payload { preamble: 0xE0 })
    );
}

#[test]
fn test_frame_display() {
    let state = InputState::new(Keys::from_bits(0x11), 0x03FF, 0);
    let frame = codec().encode_status(&state);
    assert_eq!(frame.to_string(), "AA 11 03 FF 00 00 47");
}
