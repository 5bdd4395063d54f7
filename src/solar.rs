//! Solar energy integration.
//!
//! The panel voltage arrives through a 12:1 divider, the panel current
//! through a 0.1 Ω shunt and a 30x sense amplifier. One update averages
//! five sample pairs, forms instantaneous power and integrates it over the
//! scheduler interval into the mWh accumulator.

use crate::config;

/// Panel voltage in volts from the ADC pin voltage.
pub fn panel_voltage(adc_volts: f32) -> f32 {
    adc_volts * config::SOLAR_DIVIDER_RATIO
}

/// Panel current in amperes from the current-sense pin voltage.
pub fn panel_current(adc_volts: f32) -> f32 {
    adc_volts / (config::SHUNT_AMP_GAIN * config::SHUNT_OHMS)
}

/// Energy in mWh produced by holding `power_w` for one integration window.
pub fn interval_energy_mwh(power_w: f32) -> f32 {
    power_w * (config::ENERGY_INTERVAL_S / 3600.0) * 1000.0
}

/// Take one round of voltage/current samples and add the interval energy to
/// the accumulator. Runs in the main loop.
#[cfg(target_arch = "avr")]
pub fn sample_solar_power(
    adc: &mut crate::hal::Adc,
    delay: &mut crate::hal::Delay,
) {
    use crate::hal::AdcChannel;
    use crate::telemetry;
    use embedded_hal::blocking::delay::DelayMs;

    let mut volt_sum = 0.0f32;
    let mut amp_sum = 0.0f32;

    for _ in 0..config::READINGS_PER_UPDATE {
        volt_sum += panel_voltage(adc.read_voltage(AdcChannel::SolarVoltage));
        amp_sum += panel_current(adc.read_voltage(AdcChannel::SolarCurrent));
        delay.delay_ms(config::SOLAR_SAMPLE_GAP_MS);
    }

    let n = config::READINGS_PER_UPDATE as f32;
    let power_w = (volt_sum / n) * (amp_sum / n);
    let energy = interval_energy_mwh(power_w);

    telemetry::with(|st| st.telemetry.energy_generated += energy);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn full_scale_pin_voltage_is_thirty_volts_at_the_panel() {
        assert!(close(panel_voltage(2.56), 30.72));
    }

    #[test]
    fn shunt_conversion() {
        // 0.3 V after the 30x amplifier is 10 mV across the 0.1 Ω shunt,
        // i.e. 0.1 A.
        assert!(close(panel_current(0.3), 0.1));
        assert!(close(panel_current(3.0), 1.0));
    }

    #[test]
    fn one_watt_for_one_interval() {
        // 1 W over 5.5 s is 5.5/3600 Wh ≈ 1.5278 mWh.
        assert!(close(interval_energy_mwh(1.0), 1.5278));
        assert_eq!(interval_energy_mwh(0.0), 0.0);
    }

    #[test]
    fn accumulator_is_strictly_additive() {
        let mut energy = 0.0f32;
        for _ in 0..10 {
            let before = energy;
            energy += interval_energy_mwh(2.5);
            assert!(energy > before);
        }
    }
}
