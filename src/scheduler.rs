//! Periodic scheduler bookkeeping.
//!
//! Timer1 fires once per second; every [`crate::config::TICK_PERIOD_S`]th
//! compare is one scheduler tick. A tick rolls the per-interval wind count
//! into the gust maximum and raises level flags for the main loop. Flags
//! coalesce: any number of ticks before the loop gets around to them counts
//! as one pending update.

use crate::config;
use crate::telemetry::Station;

/// Wind direction is sampled on every second tick.
pub const TICKS_PER_WIND_UPDATE: u8 = 2;

/// Pending-work level flags, set in interrupt context and consumed by the
/// main loop.
#[derive(Clone, Copy)]
pub struct WorkFlags {
    pub energy_due: bool,
    pub wind_dir_due: bool,
}

impl WorkFlags {
    pub const fn new() -> Self {
        Self {
            energy_due: false,
            wind_dir_due: false,
        }
    }
}

impl Station {
    /// Called on every 1 s timer compare. Returns true when a full
    /// scheduler interval has elapsed.
    pub fn second_elapsed(&mut self) -> bool {
        self.subticks += 1;
        if self.subticks >= config::TICK_PERIOD_S {
            self.subticks = 0;
            true
        } else {
            false
        }
    }

    /// One scheduler tick: interval rollover, then flag updates.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);

        if self.telemetry.max_interval_wind_count < self.telemetry.interval_wind_count {
            self.telemetry.max_interval_wind_count = self.telemetry.interval_wind_count;
        }
        self.telemetry.interval_wind_count = 0;

        // TODO: confirm with the board owner whether this was meant to set
        // the flag. As written the energy flag is cleared on every tick and
        // the main loop's energy branch never runs; this matches the
        // deployed behavior, which we reproduce until sign-off.
        self.flags.energy_due = false;

        if self.ticks % TICKS_PER_WIND_UPDATE == 0 {
            self.flags.wind_dir_due = true;
        }
    }

    /// Main-loop side: fetch and clear the pending-work flags.
    pub fn take_flags(&mut self) -> WorkFlags {
        let flags = self.flags;
        self.flags = WorkFlags::new();
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_rollover_tracks_maximum() {
        let mut st = Station::new();

        for _ in 0..3 {
            st.wind_pulse();
        }
        st.tick();
        assert_eq!(st.telemetry.interval_wind_count, 0);
        assert_eq!(st.telemetry.max_interval_wind_count, 3);

        for _ in 0..7 {
            st.wind_pulse();
        }
        st.tick();
        assert_eq!(st.telemetry.max_interval_wind_count, 7);

        // A calmer interval must not lower the maximum.
        st.wind_pulse();
        st.tick();
        assert_eq!(st.telemetry.max_interval_wind_count, 7);
        // The total keeps counting across intervals.
        assert_eq!(st.telemetry.wind_count, 11);
    }

    #[test]
    fn rollover_happens_even_if_nobody_consumed_the_value() {
        let mut st = Station::new();
        st.wind_pulse();
        st.tick();
        st.tick();
        st.tick();
        assert_eq!(st.telemetry.interval_wind_count, 0);
        assert_eq!(st.telemetry.max_interval_wind_count, 1);
    }

    #[test]
    fn wind_flag_raised_every_second_tick_and_coalesces() {
        let mut st = Station::new();

        st.tick();
        assert!(!st.flags.wind_dir_due);
        st.tick();
        assert!(st.flags.wind_dir_due);

        // Two more flag-raising periods before anyone consumes: still just
        // one pending update.
        st.tick();
        st.tick();
        st.tick();
        st.tick();
        let flags = st.take_flags();
        assert!(flags.wind_dir_due);
        assert!(!st.flags.wind_dir_due);
    }

    #[test]
    fn energy_flag_is_cleared_by_the_tick() {
        // Literal deployed behavior: the tick clears the energy flag, so it
        // can only be observed set if something else raised it in between.
        let mut st = Station::new();
        st.flags.energy_due = true;
        st.tick();
        assert!(!st.flags.energy_due);
        assert!(!st.take_flags().energy_due);
    }

    #[test]
    fn five_seconds_make_one_tick() {
        let mut st = Station::new();
        for _ in 0..4 {
            assert!(!st.second_elapsed());
        }
        assert!(st.second_elapsed());
        assert_eq!(st.subticks, 0);
    }
}
