//! Hardware Abstraction Layer for RfJoystickLink.
//!
//! Thin capability seams between the protocol core and the board.
//! Business logic stays in core modules, HAL is just I/O.
//!
//! - Buttons: `embedded_hal::digital::InputPin` (active-low, pulled up)
//! - Debounce wait: `embedded_hal::delay::DelayNs`
//! - Joystick: [`AxisSource`] (no ADC trait in embedded-hal 1.0)
//! - Radio: `embedded_io::Write` on the remote, raw bytes on the receiver

pub mod gpio;

#[cfg(target_os = "espidf")]
pub mod esp;

pub use gpio::{BoardPins, RadioPins};

/// Analog source for one joystick axis.
///
/// Implementations return a 10-bit value (0..=1023). Reads are assumed to
/// never fail; a board adapter that can fail must pick a reading itself.
pub trait AxisSource {
    fn read_axis(&mut self) -> u16;
}

impl<T: AxisSource + ?Sized> AxisSource for &mut T {
    #[inline]
    fn read_axis(&mut self) -> u16 {
        (**self).read_axis()
    }
}
