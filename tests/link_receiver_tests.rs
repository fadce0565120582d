//! End-to-end link tests: scheduler → byte stream → assembler → receiver

use rf_joystick_link::config::{LinkConfig, SchedulerConfig};
use rf_joystick_link::frame::{FrameCodec, FrameError, FRAME_LEN};
use rf_joystick_link::input::{InputState, Keys};
use rf_joystick_link::{
    FrameAssembler, InputSource, LinkEvent, LinkReceiver, Reception, TransmitScheduler,
};

/// Input that reports one pending change, then holds.
#[derive(Default)]
struct Joystick {
    pending: Option<InputState>,
    current: InputState,
}

impl Joystick {
    fn move_to(&mut self, state: InputState) {
        self.pending = Some(state);
    }
}

impl InputSource for Joystick {
    fn has_changed(&mut self) -> bool {
        match self.pending.take() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    fn state(&self) -> InputState {
        self.current
    }
}

/// Feed bytes through the assembler, collecting receptions.
fn deliver(
    bytes: &[u8],
    assembler: &mut FrameAssembler,
    receiver: &mut LinkReceiver,
    now_us: u64,
) -> Vec<Reception> {
    bytes
        .iter()
        .filter_map(|&b| assembler.push(b))
        .map(|candidate| match candidate {
            Ok(frame) => receiver.receive(&frame, now_us),
            Err(e) => receiver.reject(e, now_us),
        })
        .collect()
}

#[test]
fn test_end_to_end_status_and_keepalive() {
    let mut tx = TransmitScheduler::new(FrameCodec::default(), Vec::new(), SchedulerConfig::default());
    let mut rx = LinkReceiver::default();
    let mut asm = FrameAssembler::default();
    let mut stick = Joystick::default();

    let state = InputState::new(Keys::K1.with(rf_joystick_link::Button::KZ), 1023, 0);
    stick.move_to(state);
    tx.tick(0, &mut stick);

    let received = deliver(tx.transport(), &mut asm, &mut rx, 0);
    assert_eq!(received, vec![Reception::Input(state), Reception::Keepalive]);
    assert!(rx.is_alive(0));
    assert_eq!(rx.poll(0), Some(LinkEvent::Up { at_us: 0 }));
}

#[test]
fn test_resync_after_garbage() {
    let codec = FrameCodec::default();
    let mut rx = LinkReceiver::default();
    let mut asm = FrameAssembler::default();

    let mut bytes = vec![0x00, 0x13, 0x37];
    bytes.extend_from_slice(codec.encode_keepalive().as_bytes());

    let received = deliver(&bytes, &mut asm, &mut rx, 1);
    assert_eq!(received, vec![Reception::Keepalive]);
    assert_eq!(asm.discarded(), 3);
}

#[test]
fn test_truncated_frame_costs_one_error() {
    let codec = FrameCodec::default();
    let mut rx = LinkReceiver::default();
    let mut asm = FrameAssembler::default();

    // First status lost its last two bytes on the air
    let lost = codec.encode_status(&InputState::new(Keys::K1, 0x10, 0x20));
    let next = InputState::new(Keys::K2, 0x30, 0x40);
    let mut bytes = lost.as_bytes()[..FRAME_LEN - 2].to_vec();
    bytes.extend_from_slice(codec.encode_status(&next).as_bytes());
    bytes.extend_from_slice(codec.encode_status(&next).as_bytes());

    let received = deliver(&bytes, &mut asm, &mut rx, 0);
    assert_eq!(
        received,
        vec![
            Reception::Discarded(FrameError::Checksum { computed: 0x11, received: 0x02 }),
            Reception::Input(next),
            Reception::Input(next),
        ]
    );
    // Stub of the lost frame dropped; the rejected window slid to the next preamble
    assert_eq!(asm.discarded(), 5);
    assert_eq!(rx.stats().checksum_errors, 1);
}

#[test]
fn test_join_one_byte_into_keepalive_stream() {
    let codec = FrameCodec::default();
    let mut rx = LinkReceiver::default();
    let mut asm = FrameAssembler::default();

    // Receiver powered up after the remote's first 0xE0 went by
    let keepalive = codec.encode_keepalive();
    let mut bytes = keepalive.as_bytes()[1..].to_vec();
    for _ in 0..3 {
        bytes.extend_from_slice(keepalive.as_bytes());
    }

    let received = deliver(&bytes, &mut asm, &mut rx, 0);
    let shifted = Reception::Discarded(FrameError::Payload { preamble: 0xAA });
    assert_eq!(
        received,
        vec![
            shifted,
            shifted,
            shifted,
            Reception::Keepalive,
            Reception::Keepalive,
            Reception::Keepalive,
        ]
    );
    // No phantom input from the misaligned windows
    assert_eq!(rx.stats().status, 0);
    assert_eq!(rx.stats().payload_errors, 3);
    assert_eq!(rx.stats().keepalive, 3);
    assert!(rx.is_alive(0));
}

#[test]
fn test_join_mid_status_frame_with_preamble_bytes_in_payload() {
    let codec = FrameCodec::default();
    let mut rx = LinkReceiver::default();
    let mut asm = FrameAssembler::default();

    // X and Y low bytes equal the two preambles: AA 00 00 AA 00 E0 E0
    let state = InputState::new(Keys::NONE, 0x00AA, 0x00E0);
    let frame = codec.encode_status(&state);
    assert_eq!(frame.as_bytes(), &[0xAA, 0x00, 0x00, 0xAA, 0x00, 0xE0, 0xE0]);

    // Stream picked up at the 0xAA inside X
    let mut bytes = frame.as_bytes()[3..].to_vec();
    bytes.extend_from_slice(frame.as_bytes());
    bytes.extend_from_slice(frame.as_bytes());

    let received = deliver(&bytes, &mut asm, &mut rx, 0);
    assert_eq!(
        received,
        vec![
            Reception::Discarded(FrameError::Payload { preamble: 0xAA }),
            Reception::Discarded(FrameError::Payload { preamble: 0xE0 }),
            Reception::Discarded(FrameError::Payload { preamble: 0xE0 }),
            Reception::Input(state),
            Reception::Input(state),
        ]
    );
    assert_eq!(asm.pending(), 0);
    assert_eq!(asm.discarded(), 4);
    assert_eq!(rx.stats().status, 2);
}

#[test]
fn test_corrupt_frame_discarded_without_liveness() {
    let codec = FrameCodec::default();
    let mut rx = LinkReceiver::default();

    let mut bytes = codec.encode_status(&InputState::new(Keys::K2, 1, 2)).into_bytes();
    bytes[2] ^= 0x01;

    let reception = rx.receive(&bytes, 0);
    assert!(matches!(reception, Reception::Discarded(FrameError::Checksum { .. })));
    assert!(!rx.is_alive(0));
    assert_eq!(rx.poll(0), None);
}

#[test]
fn test_short_buffer_discarded() {
    let mut rx = LinkReceiver::default();
    assert_eq!(rx.receive(&[0xAA, 0x00], 0), Reception::Discarded(FrameError::Length { len: 2 }));
    assert_eq!(rx.stats().length_errors, 1);
}

#[test]
fn test_unknown_type_does_not_keep_link_alive() {
    let config = LinkConfig::default();
    let mut rx = LinkReceiver::from_config(&config);

    // A remote using a different keepalive marker
    let foreign = FrameCodec::new(0xC3).encode_keepalive();
    let reception = rx.receive(foreign.as_bytes(), 0);
    assert_eq!(reception, Reception::Discarded(FrameError::UnknownFrameType { preamble: 0xC3 }));
    assert!(!rx.is_alive(0));
}

#[test]
fn test_link_loss_and_recovery() {
    let mut tx = TransmitScheduler::new(FrameCodec::default(), Vec::new(), SchedulerConfig::default());
    let mut rx = LinkReceiver::default();
    let mut asm = FrameAssembler::default();
    let mut stick = Joystick::default();
    let mut events = Vec::new();

    // Remote on for 4 s, then out of range for 5 s, then back
    let mut sent = 0;
    for tick in 0..=1_200u64 {
        let now = tick * 10_000;
        let in_range = !(4_000_000..9_000_000).contains(&now);

        tx.tick(now, &mut stick);
        let bytes = &tx.transport()[sent..];
        if in_range {
            deliver(bytes, &mut asm, &mut rx, now);
        }
        sent = tx.transport().len();

        if tick % 50 == 0 {
            events.extend(rx.poll(now));
        }
    }

    assert_eq!(
        events,
        vec![
            LinkEvent::Up { at_us: 0 },
            // Last keepalive heard at 2 s; the 4 s one was lost
            LinkEvent::Down { silent_us: 3_500_000 },
            // 10 s keepalive is the first one back in range
            LinkEvent::Up { at_us: 10_000_000 },
        ]
    );
    assert_eq!(rx.stats().link_losses, 1);
}
