//! Byte stream to frame assembler.
//!
//! Radio UART modules deliver a byte stream with no framing. The assembler
//! hunts for a known preamble, collects the next six bytes and decodes the
//! candidate. A rejected candidate is not thrown away whole: hunting resumes
//! at the next preamble byte inside it, so joining the stream mid-frame
//! costs a few rejections and never a permanent misalignment.

use crate::frame::{FrameCodec, FrameError, FRAME_LEN};

/// Cuts a byte stream into validated 7-byte frames.
pub struct FrameAssembler {
    codec: FrameCodec,
    buf: [u8; FRAME_LEN],
    len: usize,
    /// Bytes skipped while hunting for a preamble.
    discarded: u32,
    /// Candidates that failed to decode.
    rejected: u32,
}

impl FrameAssembler {
    /// Resynchronise on the preambles `codec` understands.
    pub fn new(codec: FrameCodec) -> Self {
        Self {
            codec,
            buf: [0; FRAME_LEN],
            len: 0,
            discarded: 0,
            rejected: 0,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some(Ok(frame))` for a frame that decodes, `Some(Err(_))`
    /// for a rejected candidate, `None` while collecting.
    pub fn push(&mut self, byte: u8) -> Option<Result<[u8; FRAME_LEN], FrameError>> {
        if self.len == 0 && !self.codec.is_known_preamble(byte) {
            self.discarded = self.discarded.saturating_add(1);
            return None;
        }

        self.buf[self.len] = byte;
        self.len += 1;

        if self.len < FRAME_LEN {
            return None;
        }

        match self.codec.decode(&self.buf) {
            Ok(_) => {
                self.len = 0;
                Some(Ok(self.buf))
            }
            Err(e) => {
                self.rejected = self.rejected.saturating_add(1);
                self.slide();
                Some(Err(e))
            }
        }
    }

    /// Drop the rejected candidate up to the next preamble byte inside it.
    fn slide(&mut self) {
        let codec = self.codec;
        let start = self.buf[1..]
            .iter()
            .position(|&b| codec.is_known_preamble(b))
            .map_or(FRAME_LEN, |i| i + 1);

        self.buf.copy_within(start.., 0);
        self.len = FRAME_LEN - start;
        self.discarded = self.discarded.saturating_add(start as u32);
    }

    /// Drop any partial frame (e.g. after a UART overrun).
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Bytes skipped so far, while hunting or sliding past a rejection.
    #[inline]
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Candidates rejected so far.
    #[inline]
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Bytes collected towards the next candidate.
    #[inline]
    pub fn pending(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(FrameCodec::default())
    }
}
