//! Receiver glue: candidate frame → decode → supervisor.
//!
//! The application sees only forwarded input states and link edges;
//! discarded buffers are logged and counted, nothing else.

use crate::config::LinkConfig;
use crate::frame::{FrameCodec, FrameError};
use crate::input::InputState;
use crate::stats::RxStats;
use crate::supervisor::{LinkEvent, LinkState, LinkSupervisor};
use crate::{link_debug, link_info, link_warn};

const LOG_TARGET: &str = "rx";

/// Outcome of one received buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reception {
    /// Status frame, forward to the application.
    Input(InputState),
    /// Keepalive, liveness refreshed.
    Keepalive,
    /// Buffer rejected; liveness untouched.
    Discarded(FrameError),
}

/// Decodes received buffers and tracks link liveness.
pub struct LinkReceiver {
    codec: FrameCodec,
    supervisor: LinkSupervisor,
}

impl LinkReceiver {
    pub fn new(codec: FrameCodec, supervisor: LinkSupervisor) -> Self {
        Self { codec, supervisor }
    }

    /// Build codec and supervisor from a shared link configuration.
    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(
            FrameCodec::new(config.keepalive_preamble),
            LinkSupervisor::new(config.supervisor),
        )
    }

    /// Handle one candidate frame received at `now_us`.
    pub fn receive(&mut self, raw: &[u8], now_us: u64) -> Reception {
        match self.codec.decode(raw) {
            Ok(frame) => match self.supervisor.on_frame(frame, now_us) {
                Some(state) => Reception::Input(state),
                None => Reception::Keepalive,
            },
            Err(e) => self.reject(e, now_us),
        }
    }

    /// Count and log a candidate rejected before it got here (by the
    /// assembler). Liveness is untouched.
    pub fn reject(&mut self, error: FrameError, now_us: u64) -> Reception {
        self.supervisor.on_error(&error);
        link_debug!(LOG_TARGET, now_us, "discarded: {}", error);
        Reception::Discarded(error)
    }

    /// Report and log a link edge, if any.
    pub fn poll(&mut self, now_us: u64) -> Option<LinkEvent> {
        let event = self.supervisor.poll(now_us)?;
        match event {
            LinkEvent::Up { at_us } => {
                link_info!(LOG_TARGET, now_us, "link up (first frame at {} us)", at_us);
            }
            LinkEvent::Down { silent_us } => {
                link_warn!(LOG_TARGET, now_us, "remote out of range, silent for {} ms", silent_us / 1000);
            }
        }
        Some(event)
    }

    #[inline]
    pub fn is_alive(&self, now_us: u64) -> bool {
        self.supervisor.is_alive(now_us)
    }

    #[inline]
    pub fn state(&self, now_us: u64) -> LinkState {
        self.supervisor.state(now_us)
    }

    #[inline]
    pub fn stats(&self) -> RxStats {
        self.supervisor.stats()
    }

    #[inline]
    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }

    #[inline]
    pub fn supervisor(&self) -> &LinkSupervisor {
        &self.supervisor
    }
}

impl Default for LinkReceiver {
    fn default() -> Self {
        Self::new(FrameCodec::default(), LinkSupervisor::default())
    }
}
