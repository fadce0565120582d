//! Wire frame codec.
//!
//! Every frame on the radio is exactly 7 bytes:
//!
//! ```text
//! +----------+--------+--------+--------+--------+--------+----------+
//! | preamble | byte 1 | byte 2 | byte 3 | byte 4 | byte 5 | checksum |
//! +----------+--------+--------+--------+--------+--------+----------+
//!
//! Status    (0xAA): keys | x high | x low | y high | y low | XOR 0..=5
//! Keepalive (0xE0): 0xAA | 0x55   | 0xAA  | 0x55   | 0xAA  | XOR 0..=5
//! ```
//!
//! The checksum is a plain XOR fold over the preamble and payload. It
//! catches every single-bit error but is blind to error pairs that cancel
//! (the same bit flipped in two bytes).

use core::fmt;

use crate::input::{InputState, Keys, AXIS_MAX};

/// Length of every frame on the wire.
pub const FRAME_LEN: usize = 7;

/// Preamble of a status frame.
pub const STATUS_PREAMBLE: u8 = 0xAA;

/// Default preamble of a keepalive frame.
pub const KEEPALIVE_PREAMBLE: u8 = 0xE0;

/// Fixed keepalive payload (bytes 1..=5).
pub const KEEPALIVE_PAYLOAD: [u8; 5] = [0xAA, 0x55, 0xAA, 0x55, 0xAA];

/// Index of the checksum byte.
const CHECKSUM_IDX: usize = FRAME_LEN - 1;

/// XOR-fold of all bytes in `bytes`.
///
/// Shared by encode and decode; callers pass the preamble too.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// An encoded 7-byte frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Build a frame from a preamble and payload, filling in the checksum.
    pub fn new(preamble: u8, payload: [u8; 5]) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = preamble;
        bytes[1..CHECKSUM_IDX].copy_from_slice(&payload);
        bytes[CHECKSUM_IDX] = checksum(&bytes[..CHECKSUM_IDX]);
        Self(bytes)
    }

    /// Raw bytes, ready for the transport.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Consume into raw bytes.
    #[inline]
    pub const fn into_bytes(self) -> [u8; FRAME_LEN] {
        self.0
    }

    #[inline]
    pub const fn preamble(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn checksum(&self) -> u8 {
        self.0[CHECKSUM_IDX]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Hex dump, e.g. `AA 11 03 FF 00 00 47`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

/// A validated, classified frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedFrame {
    /// Input snapshot from the remote.
    Status(InputState),
    /// Presence marker, no payload.
    Keepalive,
}

/// Coarse error class, used for counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameErrorKind {
    Length,
    Checksum,
    UnknownFrameType,
    Payload,
}

/// Reasons a received buffer is discarded.
///
/// None of these is fatal: the receiver drops the buffer and carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Buffer is not exactly [`FRAME_LEN`] bytes (transport framing fault).
    #[error("frame length {len}, expected 7")]
    Length { len: usize },
    /// Checksum byte does not match the XOR of bytes 0..=5.
    #[error("checksum mismatch: computed {computed:#04x}, received {received:#04x}")]
    Checksum { computed: u8, received: u8 },
    /// Checksum is valid but the preamble is not a known frame type.
    #[error("unknown frame type, preamble {preamble:#04x}")]
    UnknownFrameType { preamble: u8 },
    /// Checksum and preamble are valid but the payload is one no remote
    /// can send (keys above bit 4, axis above 1023, altered keepalive).
    #[error("impossible payload for frame type {preamble:#04x}")]
    Payload { preamble: u8 },
}

impl FrameError {
    pub const fn kind(&self) -> FrameErrorKind {
        match self {
            FrameError::Length { .. } => FrameErrorKind::Length,
            FrameError::Checksum { .. } => FrameErrorKind::Checksum,
            FrameError::UnknownFrameType { .. } => FrameErrorKind::UnknownFrameType,
            FrameError::Payload { .. } => FrameErrorKind::Payload,
        }
    }
}

/// Encoder/decoder for the 7-byte wire frame.
///
/// Stateless apart from the keepalive preamble, which is configurable so a
/// receiver can be paired with firmware that uses a different marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCodec {
    keepalive_preamble: u8,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(KEEPALIVE_PREAMBLE)
    }
}

impl FrameCodec {
    /// Create a codec using `keepalive_preamble` for keepalive frames.
    pub const fn new(keepalive_preamble: u8) -> Self {
        Self { keepalive_preamble }
    }

    #[inline]
    pub const fn keepalive_preamble(&self) -> u8 {
        self.keepalive_preamble
    }

    /// Check if `byte` starts a frame this codec understands.
    #[inline]
    pub const fn is_known_preamble(&self, byte: u8) -> bool {
        byte == STATUS_PREAMBLE || byte == self.keepalive_preamble
    }

    /// Encode an input snapshot as a status frame.
    pub fn encode_status(&self, state: &InputState) -> Frame {
        let [x_hi, x_lo] = state.x_axis.to_be_bytes();
        let [y_hi, y_lo] = state.y_axis.to_be_bytes();
        Frame::new(STATUS_PREAMBLE, [state.keys.bits(), x_hi, x_lo, y_hi, y_lo])
    }

    /// Encode a keepalive frame. The result never depends on transmitter state.
    pub fn encode_keepalive(&self) -> Frame {
        Frame::new(self.keepalive_preamble, KEEPALIVE_PAYLOAD)
    }

    /// Validate and classify a received buffer.
    ///
    /// Length is checked first, then the checksum, then the preamble, then
    /// the payload. Any 7 bytes of a repeated frame XOR to zero, so the
    /// payload check is what rejects a misaligned window.
    pub fn decode(&self, raw: &[u8]) -> Result<DecodedFrame, FrameError> {
        if raw.len() != FRAME_LEN {
            return Err(FrameError::Length { len: raw.len() });
        }

        let computed = checksum(&raw[..CHECKSUM_IDX]);
        let received = raw[CHECKSUM_IDX];
        if computed != received {
            return Err(FrameError::Checksum { computed, received });
        }

        let preamble = raw[0];
        match preamble {
            STATUS_PREAMBLE => {
                let keys = raw[1];
                let x_axis = u16::from_be_bytes([raw[2], raw[3]]);
                let y_axis = u16::from_be_bytes([raw[4], raw[5]]);
                if keys & !Keys::MASK != 0 || x_axis > AXIS_MAX || y_axis > AXIS_MAX {
                    return Err(FrameError::Payload { preamble });
                }
                Ok(DecodedFrame::Status(InputState {
                    keys: Keys::from_bits(keys),
                    x_axis,
                    y_axis,
                }))
            }
            p if p == self.keepalive_preamble => {
                if raw[1..CHECKSUM_IDX] != KEEPALIVE_PAYLOAD {
                    return Err(FrameError::Payload { preamble });
                }
                Ok(DecodedFrame::Keepalive)
            }
            preamble => Err(FrameError::UnknownFrameType { preamble }),
        }
    }
}
