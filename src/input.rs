//! Module: input
//!
//! Purpose: InputState types for the remote. One `InputState` is a stable
//! snapshot of the five buttons and both joystick axes, produced by the
//! sampler once per tick and carried verbatim in a status frame.
//!
//! Architecture:
//! - Compact 5-byte value type, `Copy`, immutable once produced
//! - Keys are a bitset in wire order (K1 = bit 0 ... KZ = bit 4)
//! - Axes are 10-bit raw ADC values (0..=1023)
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

use core::fmt;

/// Largest raw axis value (10-bit ADC).
pub const AXIS_MAX: u16 = 0x03FF;

/// Number of physical buttons on the remote.
pub const BUTTON_COUNT: usize = 5;

/// Physical button identifier.
///
/// The discriminant is the bit position of the button in [`Keys`] and the
/// index into fixed-size per-button tables (pins, debounce state).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Button {
    K1 = 0,
    K2 = 1,
    K3 = 2,
    K4 = 3,
    /// Joystick push button (labelled as z-axis on the remote).
    KZ = 4,
}

impl Button {
    /// All buttons in bit order.
    pub const ALL: [Button; BUTTON_COUNT] = [Button::K1, Button::K2, Button::K3, Button::K4, Button::KZ];

    /// Bit mask of this button inside [`Keys`].
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Table index of this button.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label used in logs and reports.
    pub const fn label(self) -> &'static str {
        match self {
            Button::K1 => "K1",
            Button::K2 => "K2",
            Button::K3 => "K3",
            Button::K4 => "K4",
            Button::KZ => "KZ",
        }
    }
}

/// Pressed-button set
///
/// Stored as a single byte exactly as it travels on the wire.
///
/// Bit layout:
/// - Bit 0: K1
/// - Bit 1: K2
/// - Bit 2: K3
/// - Bit 3: K4
/// - Bit 4: KZ (joystick button)
/// - Bits 5-7: always zero
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Keys(u8);

impl Keys {
    pub const K1: Self = Self(0x01);
    pub const K2: Self = Self(0x02);
    pub const K3: Self = Self(0x04);
    pub const K4: Self = Self(0x08);
    pub const KZ: Self = Self(0x10);

    /// Mask of all valid button bits.
    pub const MASK: u8 = 0x1F;

    /// No button pressed.
    pub const NONE: Self = Self(0);

    /// Create a key set from a raw byte. Bits 5-7 are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw bitmask value (always < 32).
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if a button is pressed.
    pub const fn contains(&self, button: Button) -> bool {
        (self.0 & button.mask()) != 0
    }

    /// Set or clear the bit of one button.
    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.0 |= button.mask();
        } else {
            self.0 &= !button.mask();
        }
    }

    /// Copy of this set with one button pressed.
    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.mask())
    }

    /// Check if no button is pressed.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over pressed buttons in bit order.
    pub fn pressed(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, button) in self.pressed().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(button.label())?;
        }
        Ok(())
    }
}

/// Joystick axis selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One stable sample of the remote's controls.
///
/// Size: 5 bytes of payload, matching bytes 1..=5 of a status frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    /// Pressed buttons.
    pub keys: Keys,
    /// Horizontal axis, 0..=1023.
    pub x_axis: u16,
    /// Vertical axis, 0..=1023.
    pub y_axis: u16,
}

impl InputState {
    /// Create a state, clamping axes into the 10-bit range.
    pub const fn new(keys: Keys, x_axis: u16, y_axis: u16) -> Self {
        Self {
            keys,
            x_axis: clamp_axis(x_axis),
            y_axis: clamp_axis(y_axis),
        }
    }

    /// Value of one axis.
    pub const fn axis(&self, axis: Axis) -> u16 {
        match axis {
            Axis::X => self.x_axis,
            Axis::Y => self.y_axis,
        }
    }
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keys={} x={} y={}", self.keys, self.x_axis, self.y_axis)
    }
}

/// Clamp a raw reading into the 10-bit axis range.
#[inline]
pub const fn clamp_axis(raw: u16) -> u16 {
    if raw > AXIS_MAX {
        AXIS_MAX
    } else {
        raw
    }
}
