//! GPIO pin maps for the remote and the receiver.

use crate::input::{Button, BUTTON_COUNT};

/// Remote board pin configuration.
///
/// Buttons are wired to ground with internal pull-ups (pressed reads low).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPins {
    /// Button pins indexed by [`Button`].
    pub buttons: [i32; BUTTON_COUNT],
    /// ADC pin of the X axis.
    pub x_axis: i32,
    /// ADC pin of the Y axis.
    pub y_axis: i32,
    /// Radio module UART.
    pub radio: RadioPins,
}

impl BoardPins {
    /// Pin of one button.
    #[inline]
    pub const fn button(&self, button: Button) -> i32 {
        self.buttons[button.index()]
    }
}

impl Default for BoardPins {
    fn default() -> Self {
        Self {
            //         K1  K2  K3  K4  KZ
            buttons: [4, 5, 6, 7, 15],
            x_axis: 1,
            y_axis: 2,
            radio: RadioPins::default(),
        }
    }
}

/// Radio module UART configuration (transparent serial radio).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioPins {
    pub tx_pin: i32,
    pub rx_pin: i32,
    pub baud_rate: u32,
}

impl Default for RadioPins {
    fn default() -> Self {
        Self {
            tx_pin: 17,
            rx_pin: 18,
            // 2000 bit/s on air in the original link; the module UART runs at its default
            baud_rate: 9600,
        }
    }
}
