//! Shared telemetry state.
//!
//! Everything the interrupt handlers and the main loop touch lives in one
//! aggregate behind a critical-section mutex, so multi-byte fields can never
//! be observed half-written by the bus handler.

use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;

use crate::scheduler::WorkFlags;
use crate::slave::SlaveEngine;
use crate::wind::WindHistory;

/// The values served over the bus, plus the in-flight interval counter.
pub struct Telemetry {
    /// Total rain-gauge tips since the last reset
    pub rain_count: u16,
    /// Total anemometer pulses since the last reset
    pub wind_count: u16,
    /// Anemometer pulses in the current scheduler interval
    pub interval_wind_count: u16,
    /// Highest interval count seen since the last reset (gust proxy)
    pub max_interval_wind_count: u16,
    /// Circular-mean wind direction in centidegrees (0–35999)
    pub avg_wind_dir: u16,
    /// Accumulated generated energy in mWh
    pub energy_generated: f32,
}

impl Telemetry {
    pub const fn new() -> Self {
        Self {
            rain_count: 0,
            wind_count: 0,
            interval_wind_count: 0,
            max_interval_wind_count: 0,
            avg_wind_dir: 0,
            energy_generated: 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// The single shared aggregate: telemetry, sample history, scheduler
/// bookkeeping and the slave protocol engine.
pub struct Station {
    pub telemetry: Telemetry,
    pub history: WindHistory,
    /// Scheduler ticks since power-up or reset (wraps)
    pub ticks: u8,
    /// Seconds elapsed within the current scheduler interval
    pub subticks: u8,
    pub flags: WorkFlags,
    pub engine: SlaveEngine,
}

impl Station {
    pub const fn new() -> Self {
        Self {
            telemetry: Telemetry::new(),
            history: WindHistory::new(),
            ticks: 0,
            subticks: 0,
            flags: WorkFlags::new(),
            engine: SlaveEngine::new(),
        }
    }

    /// One qualifying edge on the rain input.
    pub fn rain_pulse(&mut self) {
        self.telemetry.rain_count = self.telemetry.rain_count.wrapping_add(1);
    }

    /// One qualifying edge on the wind input.
    pub fn wind_pulse(&mut self) {
        self.telemetry.wind_count = self.telemetry.wind_count.wrapping_add(1);
        self.telemetry.interval_wind_count = self.telemetry.interval_wind_count.wrapping_add(1);
    }

    /// The in-band reset command: zero every counter, drop the direction
    /// history and restart the scheduler interval. Pending work flags and
    /// the TX cursor are left alone; the hardware timer counter is cleared
    /// by the caller.
    pub fn reset(&mut self) {
        self.telemetry.clear();
        self.history.clear();
        self.ticks = 0;
        self.subticks = 0;
    }
}

static STATION: Mutex<RefCell<Station>> = Mutex::new(RefCell::new(Station::new()));

/// Run `f` on the shared station state inside a critical section.
///
/// Callers must keep the closure short; interrupts are disabled for its
/// whole duration.
pub fn with<R>(f: impl FnOnce(&mut Station) -> R) -> R {
    interrupt::free(|cs| f(&mut STATION.borrow(cs).borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_accumulate() {
        let mut st = Station::new();
        st.wind_pulse();
        st.wind_pulse();
        st.rain_pulse();
        assert_eq!(st.telemetry.wind_count, 2);
        assert_eq!(st.telemetry.interval_wind_count, 2);
        assert_eq!(st.telemetry.rain_count, 1);
    }

    #[test]
    fn reset_zeroes_everything_but_flags() {
        let mut st = Station::new();
        st.wind_pulse();
        st.rain_pulse();
        st.telemetry.energy_generated = 12.5;
        st.telemetry.avg_wind_dir = 9000;
        st.history.push(9000);
        st.ticks = 7;
        st.subticks = 3;
        st.flags.wind_dir_due = true;

        st.reset();

        assert_eq!(st.telemetry.rain_count, 0);
        assert_eq!(st.telemetry.wind_count, 0);
        assert_eq!(st.telemetry.avg_wind_dir, 0);
        assert_eq!(st.telemetry.energy_generated, 0.0);
        assert_eq!(st.history.len(), 0);
        assert_eq!(st.ticks, 0);
        assert_eq!(st.subticks, 0);
        // A pending update stays pending across a reset.
        assert!(st.flags.wind_dir_due);
    }
}
