//! ESP-IDF adapters for the capability seams.

use core::borrow::Borrow;

use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::gpio::ADCPin;

use super::AxisSource;
use crate::input::clamp_axis;

/// ESP32 ADC resolution is 12 bits; the link carries 10.
const ADC_SHIFT: u32 = 2;

/// One joystick axis on an ESP32 one-shot ADC channel.
pub struct EspAxis<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    channel: AdcChannelDriver<'d, T, M>,
    last: u16,
}

impl<'d, T, M> EspAxis<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    pub fn new(channel: AdcChannelDriver<'d, T, M>) -> Self {
        Self { channel, last: 0 }
    }
}

impl<'d, T, M> AxisSource for EspAxis<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    fn read_axis(&mut self) -> u16 {
        // A failed conversion repeats the previous reading
        if let Ok(raw) = self.channel.read_raw() {
            self.last = clamp_axis(raw >> ADC_SHIFT);
        }
        self.last
    }
}

/// Monotonic time since boot in microseconds.
#[inline]
pub fn timestamp_us() -> u64 {
    // SAFETY: esp_timer_get_time is always safe to call after boot
    let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
    now.max(0) as u64
}
