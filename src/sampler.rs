//! Input sampler for the remote.
//!
//! Turns noisy button contacts and ADC readings into a stable
//! [`InputState`], and decides once per tick whether that state moved
//! enough to be worth a status frame. Pure logic over the HAL seams,
//! fully testable on host.
//!
//! # Change detection
//!
//! - Buttons: any difference from the previous stable key set
//! - Axes: strictly more than the smoothing threshold away from the last
//!   reported value. The reference only moves when the threshold is
//!   crossed, so slow drift still triggers once it adds up.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::config::{Debounce, SamplerConfig};
use crate::hal::AxisSource;
use crate::input::{clamp_axis, Axis, Button, InputState, Keys, BUTTON_COUNT};

/// Anything that can report a fresh input state once per tick.
///
/// The transmit scheduler only needs this seam, so it can be driven by a
/// scripted source in tests.
pub trait InputSource {
    /// Sample inputs and report whether they changed meaningfully.
    ///
    /// Updates the state returned by [`InputSource::state`]. Call exactly
    /// once per tick; extra calls move the change-detection reference.
    fn has_changed(&mut self) -> bool;

    /// Latest sampled state.
    fn state(&self) -> InputState;
}

/// Per-button debounce bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebounceState {
    /// Last raw level seen (true = pressed).
    last_raw: bool,
    /// Consecutive ticks `last_raw` has been observed.
    stable_ticks: u8,
    /// Debounced level that went into the key set.
    accepted: bool,
}

impl DebounceState {
    pub const fn new() -> Self {
        Self {
            last_raw: false,
            stable_ticks: 0,
            accepted: false,
        }
    }

    #[inline]
    pub fn last_raw(&self) -> bool {
        self.last_raw
    }

    #[inline]
    pub fn stable_ticks(&self) -> u8 {
        self.stable_ticks
    }

    #[inline]
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Record this tick's raw level.
    fn observe(&mut self, raw_pressed: bool) {
        if raw_pressed == self.last_raw {
            self.stable_ticks = self.stable_ticks.saturating_add(1);
        } else {
            self.last_raw = raw_pressed;
            self.stable_ticks = 1;
        }
    }

    /// Level after `ticks` of stability; holds the old level until then.
    fn settled(&self, ticks: u8) -> bool {
        if self.stable_ticks >= ticks {
            self.last_raw
        } else {
            self.accepted
        }
    }
}

/// Debounced, smoothed sampler over five buttons and two axes.
///
/// # Type parameters
///
/// * `B` - Button pin (active-low, pulled up)
/// * `X`, `Y` - Axis sources
/// * `D` - Delay used by [`Debounce::Reread`]
pub struct InputSampler<B, X, Y, D> {
    config: SamplerConfig,

    // Hardware
    buttons: [B; BUTTON_COUNT],
    x: X,
    y: Y,
    delay: D,

    // Debounce state, indexed by Button
    debounce: [DebounceState; BUTTON_COUNT],

    // Latest sample and change-detection reference
    current: InputState,
    old_keys: Keys,
    old_x: u16,
    old_y: u16,
}

impl<B, X, Y, D> InputSampler<B, X, Y, D>
where
    B: InputPin,
    X: AxisSource,
    Y: AxisSource,
    D: DelayNs,
{
    /// Create a sampler and take the baseline axis reading.
    ///
    /// Keys start released; debounce state starts reset.
    pub fn new(buttons: [B; BUTTON_COUNT], x: X, y: Y, delay: D, config: SamplerConfig) -> Self {
        let mut sampler = Self {
            config,
            buttons,
            x,
            y,
            delay,
            debounce: [DebounceState::new(); BUTTON_COUNT],
            current: InputState::default(),
            old_keys: Keys::NONE,
            old_x: 0,
            old_y: 0,
        };

        let x_axis = sampler.sample_axis(Axis::X);
        let y_axis = sampler.sample_axis(Axis::Y);
        sampler.current = InputState::new(Keys::NONE, x_axis, y_axis);
        sampler.old_x = x_axis;
        sampler.old_y = y_axis;
        sampler
    }

    /// Get current configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Update configuration (e.g., change smoothing).
    pub fn set_config(&mut self, config: SamplerConfig) {
        self.config = config;
    }

    /// Read and debounce all buttons.
    ///
    /// Each button contributes exactly one bit; bits 5-7 stay zero.
    pub fn sample_buttons(&mut self) -> Keys {
        let mut keys = Keys::NONE;

        for button in Button::ALL {
            let i = button.index();
            let raw = is_pressed(&mut self.buttons[i]);
            self.debounce[i].observe(raw);

            let accepted = match self.config.debounce {
                Debounce::Reread { delay_us } => {
                    if raw {
                        self.delay.delay_us(delay_us);
                        is_pressed(&mut self.buttons[i])
                    } else {
                        false
                    }
                }
                Debounce::StableTicks(ticks) => self.debounce[i].settled(ticks),
            };

            self.debounce[i].accepted = accepted;
            keys.set(button, accepted);
        }

        keys
    }

    /// Read one axis, averaged over `config.averaging` conversions.
    pub fn sample_axis(&mut self, axis: Axis) -> u16 {
        let count = self.config.averaging.max(1) as u32;
        let source: &mut dyn AxisSource = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        };

        let sum: u32 = (0..count).map(|_| clamp_axis(source.read_axis()) as u32).sum();
        (sum / count) as u16
    }

    /// Sample everything and report a meaningful change.
    ///
    /// See the module docs for the change rules. Call once per tick.
    pub fn has_changed(&mut self) -> bool {
        let mut changed = false;

        let keys = self.sample_buttons();
        self.current.keys = keys;
        if keys != self.old_keys {
            self.old_keys = keys;
            changed = true;
        }

        let x_axis = self.sample_axis(Axis::X);
        self.current.x_axis = x_axis;
        if x_axis.abs_diff(self.old_x) > self.config.x_smoothing {
            self.old_x = x_axis;
            changed = true;
        }

        let y_axis = self.sample_axis(Axis::Y);
        self.current.y_axis = y_axis;
        if y_axis.abs_diff(self.old_y) > self.config.y_smoothing {
            self.old_y = y_axis;
            changed = true;
        }

        changed
    }

    /// Latest sampled state.
    #[inline]
    pub fn state(&self) -> InputState {
        self.current
    }

    #[inline]
    pub fn keys(&self) -> Keys {
        self.current.keys
    }

    #[inline]
    pub fn x_axis(&self) -> u16 {
        self.current.x_axis
    }

    #[inline]
    pub fn y_axis(&self) -> u16 {
        self.current.y_axis
    }

    /// Debounce bookkeeping of one button.
    #[inline]
    pub fn debounce_state(&self, button: Button) -> &DebounceState {
        &self.debounce[button.index()]
    }
}

impl<B, X, Y, D> InputSource for InputSampler<B, X, Y, D>
where
    B: InputPin,
    X: AxisSource,
    Y: AxisSource,
    D: DelayNs,
{
    #[inline]
    fn has_changed(&mut self) -> bool {
        InputSampler::has_changed(self)
    }

    #[inline]
    fn state(&self) -> InputState {
        self.current
    }
}

/// Active-low read. A failed read counts as released.
#[inline]
fn is_pressed<B: InputPin>(pin: &mut B) -> bool {
    pin.is_low().unwrap_or(false)
}
