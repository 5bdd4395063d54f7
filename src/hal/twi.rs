//! TWI (I2C) slave driver.
//!
//! The data logger is the bus master; this board only ever answers. The
//! interrupt reduces the hardware status codes to protocol-level events and
//! feeds them through the slave engine. Everything happens inside the one
//! interrupt invocation; the handler never waits on the bus.

use avr_device::atmega128a::{TC1, TWI};

use crate::slave::{BusEvent, SlaveAction};
use crate::telemetry;

// TWCR bits
const TWINT: u8 = 0x80;
const TWEA: u8 = 0x40;
const TWEN: u8 = 0x04;
const TWIE: u8 = 0x01;

/// Put the TWI peripheral in slave mode at the given 7-bit address.
pub fn init(address: u8) {
    unsafe {
        let p = TWI::ptr();
        (*p).twar.write(|w| w.bits(address << 1));
        (*p).twcr.write(|w| w.bits(TWEA | TWEN | TWIE));
    }
}

#[avr_device::interrupt(atmega128a)]
fn TWI() {
    let status = unsafe { (*TWI::ptr()).twsr.read().bits() & 0xF8 };

    let action = match status {
        // Addressed for a master write; a fresh transaction begins
        0x60 | 0x68 | 0x70 | 0x78 => {
            telemetry::with(|st| st.bus_event(BusEvent::AddressMatch))
        }
        // Command byte received (acked or not)
        0x80 | 0x88 | 0x90 | 0x98 => {
            let byte = unsafe { (*TWI::ptr()).twdr.read().bits() };
            telemetry::with(|st| st.bus_event(BusEvent::Command(byte)))
        }
        // Addressed for a master read: rewind, then stage the first byte
        0xA8 | 0xB0 => telemetry::with(|st| {
            st.bus_event(BusEvent::AddressMatch);
            st.bus_event(BusEvent::DataRequested)
        }),
        // Previous byte acked; stage the next one
        0xB8 => telemetry::with(|st| st.bus_event(BusEvent::DataRequested)),
        // Stop condition or repeated start
        0xA0 => telemetry::with(|st| st.bus_event(BusEvent::Stop)),
        // 0xC0/0xC8: master nacked the last byte; nothing left to do
        _ => SlaveAction::None,
    };

    match action {
        SlaveAction::Respond(byte) => unsafe {
            (*TWI::ptr()).twdr.write(|w| w.bits(byte));
        },
        SlaveAction::TimerReset => unsafe {
            // The reset command also restarts the in-flight scheduler second
            (*TC1::ptr()).tcnt1.write(|w| w.bits(0));
        },
        SlaveAction::None => {}
    }

    unsafe {
        // Release the bus and re-arm for the next event
        (*TWI::ptr()).twcr.write(|w| w.bits(TWINT | TWEA | TWEN | TWIE));
    }
}
