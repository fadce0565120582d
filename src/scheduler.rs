//! Transmit scheduler for the remote.
//!
//! Once per tick:
//! 1. Status frame if the input source reports a meaningful change
//! 2. Keepalive frame if the keepalive interval has elapsed
//!
//! The two triggers are independent and may both fire in one tick, status
//! first. The first tick after construction always sends a keepalive so
//! the receiver sees the remote as soon as it powers up.
//!
//! Transport errors drop the frame. Nothing is buffered or retried: the
//! next change or keepalive supersedes it anyway.

use embedded_io::Write;

use crate::config::SchedulerConfig;
use crate::frame::{Frame, FrameCodec};
use crate::link_warn;
use crate::sampler::InputSource;
use crate::stats::TxStats;

const LOG_TARGET: &str = "tx";

/// What one tick put on the air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// A status frame was written.
    pub status_sent: bool,
    /// A keepalive frame was written.
    pub keepalive_sent: bool,
}

impl TickReport {
    /// Nothing was written (no trigger, or every write failed).
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.status_sent && !self.keepalive_sent
    }
}

/// Send-on-change-or-heartbeat scheduler.
///
/// # Type parameters
///
/// * `T` - Byte transport to the radio module
pub struct TransmitScheduler<T> {
    codec: FrameCodec,
    transport: T,
    interval_us: u64,
    /// Time of the last keepalive attempt; `None` until the first tick.
    last_keepalive_us: Option<u64>,
    stats: TxStats,
}

impl<T: Write> TransmitScheduler<T> {
    pub fn new(codec: FrameCodec, transport: T, config: SchedulerConfig) -> Self {
        Self {
            codec,
            transport,
            interval_us: config.keepalive_interval_us(),
            last_keepalive_us: None,
            stats: TxStats::new(),
        }
    }

    /// Run one scheduling pass at `now_us`.
    ///
    /// Calls `source.has_changed()` exactly once.
    pub fn tick<S: InputSource + ?Sized>(&mut self, now_us: u64, source: &mut S) -> TickReport {
        let mut report = TickReport::default();

        if source.has_changed() {
            let frame = self.codec.encode_status(&source.state());
            if self.send(&frame, now_us) {
                self.stats.record_status();
                report.status_sent = true;
            }
        }

        if self.keepalive_due(now_us) {
            // The timer restarts even if the write fails
            self.last_keepalive_us = Some(now_us);
            let frame = self.codec.encode_keepalive();
            if self.send(&frame, now_us) {
                self.stats.record_keepalive();
                report.keepalive_sent = true;
            }
        }

        report
    }

    /// Check if a keepalive is due at `now_us`.
    #[inline]
    pub fn keepalive_due(&self, now_us: u64) -> bool {
        match self.last_keepalive_us {
            None => true,
            Some(last) => now_us.saturating_sub(last) >= self.interval_us,
        }
    }

    /// Update keepalive cadence. Takes effect from the next tick.
    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.interval_us = config.keepalive_interval_us();
    }

    #[inline]
    pub fn keepalive_interval_us(&self) -> u64 {
        self.interval_us
    }

    #[inline]
    pub fn stats(&self) -> TxStats {
        self.stats
    }

    #[inline]
    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Write one whole frame. Failures are counted, logged and swallowed.
    fn send(&mut self, frame: &Frame, now_us: u64) -> bool {
        match self.transport.write_all(frame.as_bytes()) {
            Ok(()) => true,
            Err(e) => {
                self.stats.record_drop();
                link_warn!(LOG_TARGET, now_us, "dropped frame {}: {:?}", frame, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputState, Keys};

    /// Input source that never changes.
    struct Idle;

    impl InputSource for Idle {
        fn has_changed(&mut self) -> bool {
            false
        }

        fn state(&self) -> InputState {
            InputState::default()
        }
    }

    fn scheduler() -> TransmitScheduler<Vec<u8>> {
        TransmitScheduler::new(FrameCodec::default(), Vec::new(), SchedulerConfig::default())
    }

    #[test]
    fn test_first_tick_sends_keepalive() {
        let mut tx = scheduler();
        let report = tx.tick(0, &mut Idle);
        assert!(report.keepalive_sent);
        assert!(!report.status_sent);
        assert_eq!(tx.transport().len(), 7);
        assert_eq!(tx.transport()[0], 0xE0);
    }

    #[test]
    fn test_keepalive_due_boundary() {
        let mut tx = scheduler();
        tx.tick(1_000, &mut Idle);
        assert!(!tx.keepalive_due(1_000 + 1_999_999));
        assert!(tx.keepalive_due(1_000 + 2_000_000));
    }

    #[test]
    fn test_idle_report() {
        let mut tx = scheduler();
        tx.tick(0, &mut Idle);
        let report = tx.tick(10, &mut Idle);
        assert!(report.is_idle());
        assert_eq!(tx.stats().sent(), 1);
    }

    #[test]
    fn test_status_frame_bytes() {
        struct Pressed;
        impl InputSource for Pressed {
            fn has_changed(&mut self) -> bool {
                true
            }
            fn state(&self) -> InputState {
                InputState::new(Keys::from_bits(0x11), 0x03FF, 0)
            }
        }

        let mut tx = scheduler();
        tx.tick(0, &mut Pressed);
        assert_eq!(&tx.transport()[..7], &[0xAA, 0x11, 0x03, 0xFF, 0x00, 0x00, 0x47]);
    }
}
