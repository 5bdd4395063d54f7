use avr_device::atmega128a::ADC;

use crate::config;

/// Analog inputs wired on this board.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum AdcChannel {
    WindVane = 0,
    SolarCurrent = 1,
    SolarVoltage = 2,
}

pub struct Adc {
    _private: (),
}

impl Adc {
    pub fn new() -> Self {
        unsafe {
            let p = ADC::ptr();
            // Enable ADC, prescaler div128 (125kHz @ 16MHz)
            (*p).adcsra.write(|w| w.bits(0x87));
            // Internal 2.56V reference
            (*p).admux.write(|w| w.bits(0xC0));
        }
        Self { _private: () }
    }

    /// Blocking single conversion on the given channel.
    pub fn read_channel(&mut self, channel: AdcChannel) -> u16 {
        unsafe {
            let p = ADC::ptr();

            // Select channel, keep the reference bits
            (*p).admux.modify(|r, w| w.bits((r.bits() & 0xE0) | (channel as u8)));

            // Start conversion
            (*p).adcsra.modify(|r, w| w.bits(r.bits() | 0x40));

            // Wait for completion
            while (*p).adcsra.read().bits() & 0x40 != 0 {}

            (*p).adc.read().bits()
        }
    }

    /// Single conversion scaled to volts at the pin.
    pub fn read_voltage(&mut self, channel: AdcChannel) -> f32 {
        config::volts_from_raw(self.read_channel(channel))
    }
}

impl Default for Adc {
    fn default() -> Self {
        Self::new()
    }
}
