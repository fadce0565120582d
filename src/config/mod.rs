//! Module: config
//!
//! Purpose: Tuning for both ends of the link.
//!
//! Architecture:
//! - One plain `Copy` struct per component, owned by that component
//! - `LinkConfig` groups them so both firmwares can share one definition
//! - Defaults come from the field-proven remote/receiver pair
//! - `validate()` rejects combinations that break the link contract
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

use crate::frame::{KEEPALIVE_PREAMBLE, STATUS_PREAMBLE};
use crate::input::AXIS_MAX;

/// Debounce delay before re-reading a pressed button.
pub const DEFAULT_DEBOUNCE_US: u32 = 4_000;

/// Minimum axis movement, in raw units, that counts as a change.
pub const DEFAULT_SMOOTHING: u16 = 8;

/// Interval between keepalive frames sent by the remote.
pub const DEFAULT_KEEPALIVE_INTERVAL_MS: u32 = 2_000;

/// Silence after which the receiver declares the link down.
pub const DEFAULT_LINK_TIMEOUT_MS: u32 = 3_000;

/// Upper bound for per-read axis averaging.
pub const MAX_AVERAGING: u8 = 16;

/// Button debounce strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Debounce {
    /// Busy-wait `delay_us` after a press is seen, then re-read the pin.
    ///
    /// Blocks the sampling tick for up to 5 × `delay_us`.
    Reread { delay_us: u32 },
    /// Accept a level once it has been read on this many consecutive ticks.
    ///
    /// Never blocks; latency is `n` ticks.
    StableTicks(u8),
}

impl Default for Debounce {
    fn default() -> Self {
        Debounce::Reread { delay_us: DEFAULT_DEBOUNCE_US }
    }
}

/// Input sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Button debounce strategy.
    pub debounce: Debounce,

    /// X axis hysteresis: a change must exceed this many raw units.
    pub x_smoothing: u16,

    /// Y axis hysteresis: a change must exceed this many raw units.
    pub y_smoothing: u16,

    /// ADC reads averaged per axis sample (1 = single read).
    pub averaging: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            debounce: Debounce::default(),
            x_smoothing: DEFAULT_SMOOTHING,
            y_smoothing: DEFAULT_SMOOTHING,
            averaging: 1,
        }
    }
}

impl SamplerConfig {
    /// Default config with the same hysteresis on both axes.
    pub fn with_smoothing(threshold: u16) -> Self {
        Self {
            x_smoothing: threshold,
            y_smoothing: threshold,
            ..Default::default()
        }
    }
}

/// Transmit scheduler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub keepalive_interval_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            keepalive_interval_ms: DEFAULT_KEEPALIVE_INTERVAL_MS,
        }
    }
}

impl SchedulerConfig {
    #[inline]
    pub fn keepalive_interval_us(&self) -> u64 {
        self.keepalive_interval_ms as u64 * 1000
    }
}

/// Link supervisor configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub timeout_ms: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_LINK_TIMEOUT_MS,
        }
    }
}

impl SupervisorConfig {
    #[inline]
    pub fn timeout_us(&self) -> u64 {
        self.timeout_ms as u64 * 1000
    }
}

/// Complete link configuration shared by remote and receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    pub sampler: SamplerConfig,
    pub scheduler: SchedulerConfig,
    pub supervisor: SupervisorConfig,
    /// Keepalive preamble byte, must differ from the status preamble.
    pub keepalive_preamble: u8,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            scheduler: SchedulerConfig::default(),
            supervisor: SupervisorConfig::default(),
            keepalive_preamble: KEEPALIVE_PREAMBLE,
        }
    }
}

/// Configuration rejected by [`LinkConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("keepalive interval must be non-zero")]
    ZeroKeepaliveInterval,
    #[error("link timeout {timeout_ms} ms must be at least 1.5x the keepalive interval {interval_ms} ms")]
    TimeoutTooShort { timeout_ms: u32, interval_ms: u32 },
    #[error("axis averaging {0} outside 1..=16")]
    AveragingOutOfRange(u8),
    #[error("smoothing threshold {0} exceeds axis range")]
    SmoothingOutOfRange(u16),
    #[error("stable-ticks debounce needs at least one tick")]
    ZeroDebounceTicks,
    #[error("keepalive preamble {0:#04x} collides with the status preamble")]
    PreambleCollision(u8),
}

impl LinkConfig {
    /// Check the configuration against the link contract.
    ///
    /// The receiver timeout must leave a margin of at least half an interval
    /// over the remote's keepalive period, or ordinary jitter reads as link loss.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval_ms = self.scheduler.keepalive_interval_ms;
        if interval_ms == 0 {
            return Err(ConfigError::ZeroKeepaliveInterval);
        }

        let timeout_ms = self.supervisor.timeout_ms;
        if (timeout_ms as u64) * 2 < (interval_ms as u64) * 3 {
            return Err(ConfigError::TimeoutTooShort { timeout_ms, interval_ms });
        }

        let averaging = self.sampler.averaging;
        if averaging == 0 || averaging > MAX_AVERAGING {
            return Err(ConfigError::AveragingOutOfRange(averaging));
        }

        for threshold in [self.sampler.x_smoothing, self.sampler.y_smoothing] {
            if threshold > AXIS_MAX {
                return Err(ConfigError::SmoothingOutOfRange(threshold));
            }
        }

        if self.sampler.debounce == Debounce::StableTicks(0) {
            return Err(ConfigError::ZeroDebounceTicks);
        }

        if self.keepalive_preamble == STATUS_PREAMBLE {
            return Err(ConfigError::PreambleCollision(self.keepalive_preamble));
        }

        Ok(())
    }
}
