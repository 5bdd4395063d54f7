//! Configuration constants for the weather station slave board.

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate for the diagnostics console
pub const UART_BAUD: u32 = 9600;

/// 7-bit TWI slave address polled by the data logger
pub const TWI_SLAVE_ADDRESS: u8 = 0x42;

/// Command byte that zeroes all telemetry (ASCII 'R')
pub const RESET_COMMAND: u8 = b'R';

/// Internal ADC reference in volts
pub const ADC_VREF_VOLTS: f32 = 2.56;

/// 10-bit ADC full-scale reading
pub const ADC_FULL_SCALE: u16 = 1023;

/// Analog samples taken per wind-direction or solar update
pub const READINGS_PER_UPDATE: usize = 5;

/// Retained wind-direction samples; sampling saturates once this is reached
pub const WIND_HISTORY_CAPACITY: usize = 110;

/// Scheduler interval in seconds (one tick of the periodic scheduler)
pub const TICK_PERIOD_S: u8 = 5;

/// Gap between consecutive vane samples in milliseconds
pub const WIND_SAMPLE_GAP_MS: u16 = 200;

/// Gap between consecutive solar sample pairs in milliseconds
pub const SOLAR_SAMPLE_GAP_MS: u16 = 100;

/// Panel voltage divider ratio (12 kΩ : 1 kΩ)
pub const SOLAR_DIVIDER_RATIO: f32 = 12.0;

/// Current-sense shunt resistance in ohms
pub const SHUNT_OHMS: f32 = 0.1;

/// Current-sense amplifier gain
pub const SHUNT_AMP_GAIN: f32 = 30.0;

/// Integration window for one energy update in seconds: one scheduler tick
/// plus the 0.5 s spent taking the five sample pairs.
pub const ENERGY_INTERVAL_S: f32 = 5.5;

/// Convert a raw ADC reading to volts at the pin.
pub fn volts_from_raw(raw: u16) -> f32 {
    (raw as f32 / ADC_FULL_SCALE as f32) * ADC_VREF_VOLTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_reads_vref() {
        assert!((volts_from_raw(ADC_FULL_SCALE) - ADC_VREF_VOLTS).abs() < 1e-6);
        assert_eq!(volts_from_raw(0), 0.0);
    }

    #[test]
    fn midscale_is_half_vref() {
        let v = volts_from_raw(512);
        assert!((v - 1.2812).abs() < 1e-2);
    }
}
