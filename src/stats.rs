//! Link statistics for RfJoystickLink.
//!
//! Each loop owns its counters (no sharing, no atomics). Diagnostics read a
//! `Copy` snapshot through the owning component.
//!
//! Counters saturate instead of wrapping.

use crate::frame::FrameErrorKind;

/// Transmitter-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TxStats {
    /// Status frames handed to the transport.
    pub status_sent: u32,
    /// Keepalive frames handed to the transport.
    pub keepalive_sent: u32,
    /// Frames lost at the transport boundary (write error).
    pub dropped: u32,
}

impl TxStats {
    pub const fn new() -> Self {
        Self {
            status_sent: 0,
            keepalive_sent: 0,
            dropped: 0,
        }
    }

    #[inline]
    pub fn record_status(&mut self) {
        self.status_sent = self.status_sent.saturating_add(1);
    }

    #[inline]
    pub fn record_keepalive(&mut self) {
        self.keepalive_sent = self.keepalive_sent.saturating_add(1);
    }

    #[inline]
    pub fn record_drop(&mut self) {
        self.dropped = self.dropped.saturating_add(1);
    }

    /// Frames that made it to the transport.
    #[inline]
    pub fn sent(&self) -> u32 {
        self.status_sent.saturating_add(self.keepalive_sent)
    }
}

/// Receiver-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RxStats {
    /// Valid status frames.
    pub status: u32,
    /// Valid keepalive frames.
    pub keepalive: u32,
    /// Buffers of the wrong length.
    pub length_errors: u32,
    /// Buffers with a bad checksum.
    pub checksum_errors: u32,
    /// Checksum-valid buffers with an unknown preamble.
    pub unknown_type: u32,
    /// Checksum-valid buffers whose payload no remote can send.
    pub payload_errors: u32,
    /// Link-down transitions since boot.
    pub link_losses: u32,
}

impl RxStats {
    pub const fn new() -> Self {
        Self {
            status: 0,
            keepalive: 0,
            length_errors: 0,
            checksum_errors: 0,
            unknown_type: 0,
            payload_errors: 0,
            link_losses: 0,
        }
    }

    #[inline]
    pub fn record_status(&mut self) {
        self.status = self.status.saturating_add(1);
    }

    #[inline]
    pub fn record_keepalive(&mut self) {
        self.keepalive = self.keepalive.saturating_add(1);
    }

    #[inline]
    pub fn record_error(&mut self, kind: FrameErrorKind) {
        let counter = match kind {
            FrameErrorKind::Length => &mut self.length_errors,
            FrameErrorKind::Checksum => &mut self.checksum_errors,
            FrameErrorKind::UnknownFrameType => &mut self.unknown_type,
            FrameErrorKind::Payload => &mut self.payload_errors,
        };
        *counter = counter.saturating_add(1);
    }

    #[inline]
    pub fn record_link_loss(&mut self) {
        self.link_losses = self.link_losses.saturating_add(1);
    }

    /// Valid frames of either kind.
    #[inline]
    pub fn valid(&self) -> u32 {
        self.status.saturating_add(self.keepalive)
    }

    /// Discarded buffers of any kind.
    #[inline]
    pub fn discarded(&self) -> u32 {
        self.length_errors
            .saturating_add(self.checksum_errors)
            .saturating_add(self.unknown_type)
            .saturating_add(self.payload_errors)
    }
}
