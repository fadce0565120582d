//! Link liveness supervisor for the receiver.
//!
//! Any valid frame proves the remote is in range. The link is up while
//! the silence since the last valid frame is at most the timeout, and down
//! before the first frame ever arrives.
//!
//! Decode failures are counted but never refresh liveness: noise on the
//! channel must not keep a dead link looking alive.

use crate::config::SupervisorConfig;
use crate::frame::{DecodedFrame, FrameError};
use crate::input::InputState;
use crate::stats::RxStats;

/// Derived link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No valid frame within the timeout (or none yet).
    Down,
    /// Remote heard recently.
    Up,
}

/// Link state edge, reported once by [`LinkSupervisor::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Link came up at the frame received at `at_us`.
    Up { at_us: u64 },
    /// Link timed out; `silent_us` since the last valid frame.
    Down { silent_us: u64 },
}

/// Liveness timeout tracker.
pub struct LinkSupervisor {
    timeout_us: u64,
    /// Time of the last valid frame.
    last_seen_us: Option<u64>,
    /// State last reported by `poll`.
    reported: LinkState,
    stats: RxStats,
}

impl LinkSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            timeout_us: config.timeout_us(),
            last_seen_us: None,
            reported: LinkState::Down,
            stats: RxStats::new(),
        }
    }

    /// Record a valid frame received at `now_us`.
    ///
    /// Returns the input state for status frames, `None` for keepalives.
    pub fn on_frame(&mut self, frame: DecodedFrame, now_us: u64) -> Option<InputState> {
        self.last_seen_us = Some(now_us);
        match frame {
            DecodedFrame::Status(state) => {
                self.stats.record_status();
                Some(state)
            }
            DecodedFrame::Keepalive => {
                self.stats.record_keepalive();
                None
            }
        }
    }

    /// Record a discarded buffer. Liveness is untouched.
    pub fn on_error(&mut self, error: &FrameError) {
        self.stats.record_error(error.kind());
    }

    /// Check if the remote was heard within the timeout.
    ///
    /// `now_us - last_seen_us == timeout` is still alive.
    #[inline]
    pub fn is_alive(&self, now_us: u64) -> bool {
        match self.last_seen_us {
            Some(last) => now_us.saturating_sub(last) <= self.timeout_us,
            None => false,
        }
    }

    #[inline]
    pub fn state(&self, now_us: u64) -> LinkState {
        if self.is_alive(now_us) {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }

    /// Report a link edge since the last poll, if any.
    ///
    /// Call periodically; each transition is reported exactly once.
    pub fn poll(&mut self, now_us: u64) -> Option<LinkEvent> {
        let state = self.state(now_us);
        if state == self.reported {
            return None;
        }
        self.reported = state;

        match state {
            LinkState::Up => Some(LinkEvent::Up {
                at_us: self.last_seen_us.unwrap_or(now_us),
            }),
            LinkState::Down => {
                self.stats.record_link_loss();
                Some(LinkEvent::Down {
                    silent_us: self.silence_us(now_us).unwrap_or(0),
                })
            }
        }
    }

    /// Time since the last valid frame, `None` if nothing was ever heard.
    #[inline]
    pub fn silence_us(&self, now_us: u64) -> Option<u64> {
        self.last_seen_us.map(|last| now_us.saturating_sub(last))
    }

    #[inline]
    pub fn last_seen_us(&self) -> Option<u64> {
        self.last_seen_us
    }

    #[inline]
    pub fn timeout_us(&self) -> u64 {
        self.timeout_us
    }

    /// Update timeout (e.g., when config changes).
    pub fn set_config(&mut self, config: SupervisorConfig) {
        self.timeout_us = config.timeout_us();
    }

    #[inline]
    pub fn stats(&self) -> RxStats {
        self.stats
    }

    /// Forget the remote: back to down, counters kept.
    pub fn reset(&mut self) {
        self.last_seen_us = None;
        self.reported = LinkState::Down;
    }
}

impl Default for LinkSupervisor {
    fn default() -> Self {
        Self::new(SupervisorConfig::default())
    }
}
