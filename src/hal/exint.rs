//! Edge-triggered pulse inputs.
//!
//! The anemometer reed switch hangs on INT4 (PE4) and the rain-gauge
//! tipping bucket on INT5 (PE5), both with pull-ups, both counted on the
//! falling edge. Every edge is an event; the sensors are slow enough that
//! no debouncing is done.

use avr_device::atmega128a::{EXINT, PORTE};

use crate::telemetry;

const WIND_PIN: u8 = 1 << 4; // PE4 / INT4
const RAIN_PIN: u8 = 1 << 5; // PE5 / INT5

pub fn init() {
    unsafe {
        let porte = PORTE::ptr();
        // Inputs with pull-ups
        (*porte).ddre.modify(|r, w| w.bits(r.bits() & !(WIND_PIN | RAIN_PIN)));
        (*porte).porte.modify(|r, w| w.bits(r.bits() | WIND_PIN | RAIN_PIN));

        let exint = EXINT::ptr();
        // ISC4/ISC5 = 0b10: interrupt on falling edge
        (*exint).eicrb.modify(|r, w| w.bits((r.bits() & 0xF0) | 0x0A));
        (*exint).eimsk.modify(|r, w| w.bits(r.bits() | WIND_PIN | RAIN_PIN));
    }
}

#[avr_device::interrupt(atmega128a)]
fn INT4() {
    telemetry::with(|st| st.wind_pulse());
}

#[avr_device::interrupt(atmega128a)]
fn INT5() {
    telemetry::with(|st| st.rain_pulse());
}
