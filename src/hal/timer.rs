//! Timer0 busy-wait delays and the Timer1 scheduler tick.

use avr_device::atmega128a::{TC0, TC1};
use embedded_hal::blocking::delay::DelayMs;

use crate::config::CPU_FREQ_HZ;
use crate::telemetry;

// Timer0, clk/64: 250 counts per millisecond at 16 MHz
const COUNTS_PER_MS: u8 = (CPU_FREQ_HZ / 64 / 1000) as u8;

// Timer1, clk/1024, CTC: one compare per second at 16 MHz. The 16-bit
// compare register cannot hold a full 5 s interval, so the scheduler
// divides the 1 s compares in software.
const SECOND_TOP: u16 = (CPU_FREQ_HZ / 1024 - 1) as u16;

/// Millisecond busy-wait on Timer0.
pub struct Delay {
    _private: (),
}

impl Delay {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        unsafe {
            let p = TC0::ptr();
            (*p).tcnt0.write(|w| w.bits(0));
            (*p).tccr0.write(|w| w.bits(0x04)); // clk/64

            for _ in 0..ms {
                while (*p).tcnt0.read().bits() < COUNTS_PER_MS {}
                (*p).tcnt0.write(|w| w.bits(0));
            }

            (*p).tccr0.write(|w| w.bits(0)); // stop
        }
    }
}

/// Start the 1 s Timer1 compare interrupt that drives the scheduler.
pub fn start_tick_timer() {
    unsafe {
        let p = TC1::ptr();
        (*p).tccr1a.write(|w| w.bits(0));
        (*p).tcnt1.write(|w| w.bits(0));
        (*p).ocr1a.write(|w| w.bits(SECOND_TOP));
        (*p).tccr1b.write(|w| w.bits(0x0D)); // CTC, clk/1024

        // Enable compare match A interrupt
        (*p).timsk.modify(|r, w| w.bits(r.bits() | 0x10));
    }
}

#[avr_device::interrupt(atmega128a)]
fn TIMER1_COMPA() {
    telemetry::with(|st| {
        if st.second_elapsed() {
            st.tick();
        }
    });
}
