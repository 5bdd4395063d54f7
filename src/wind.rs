//! Wind direction: vane calibration lookup, circular averaging and the
//! saturating sample history.

use libm::{atanf, cosf, fabsf, sinf};

use crate::config;

const DEG_PER_RAD: f32 = 180.0 / core::f32::consts::PI;
const RAD_PER_DEG: f32 = core::f32::consts::PI / 180.0;

/// One calibration point of the vane: the reference voltage the resistor
/// network produces at a given compass angle.
pub struct VaneEntry {
    pub volts: f32,
    pub angle_deg: f32,
}

/// Calibration table measured on the deployed vane. Read-only for the
/// lifetime of the program.
pub const VANE_TABLE: [VaneEntry; 16] = [
    VaneEntry { volts: 1.36, angle_deg: 0.0 },
    VaneEntry { volts: 0.40, angle_deg: 22.5 },
    VaneEntry { volts: 0.49, angle_deg: 45.0 },
    VaneEntry { volts: 0.06, angle_deg: 67.5 },
    VaneEntry { volts: 0.07, angle_deg: 90.0 },
    VaneEntry { volts: 0.05, angle_deg: 112.5 },
    VaneEntry { volts: 0.15, angle_deg: 135.0 },
    VaneEntry { volts: 0.10, angle_deg: 157.5 },
    VaneEntry { volts: 0.25, angle_deg: 180.0 },
    VaneEntry { volts: 0.21, angle_deg: 202.5 },
    VaneEntry { volts: 0.84, angle_deg: 225.0 },
    VaneEntry { volts: 0.76, angle_deg: 247.5 },
    VaneEntry { volts: 2.37, angle_deg: 270.0 },
    VaneEntry { volts: 1.56, angle_deg: 292.5 },
    VaneEntry { volts: 1.91, angle_deg: 315.0 },
    VaneEntry { volts: 1.05, angle_deg: 337.5 },
];

/// Round an angle in degrees to centidegrees.
pub fn angle_to_centideg(deg: f32) -> u16 {
    (deg * 100.0 + 0.5) as u16
}

pub fn centideg_to_deg(cd: u16) -> f32 {
    cd as f32 / 100.0
}

/// Nearest-neighbor lookup: minimum absolute voltage difference, no
/// interpolation. Ties resolve to the entry that comes first in the table.
pub fn nearest_angle(table: &[VaneEntry], volts: f32) -> f32 {
    let mut best = &table[0];
    let mut smallest = fabsf(volts - best.volts);

    for entry in &table[1..] {
        let diff = fabsf(volts - entry.volts);
        if diff < smallest {
            smallest = diff;
            best = entry;
        }
    }

    best.angle_deg
}

/// Map a vane voltage to a compass angle via the calibration table.
pub fn direction_from_voltage(volts: f32) -> f32 {
    nearest_angle(&VANE_TABLE, volts)
}

/// Quadrant-corrected mean direction from averaged sine/cosine components,
/// in degrees.
///
/// A zero cosine sum would make `atan(s/c)` undefined, so it is resolved
/// first: 90° for a positive sine sum, 270° for a negative one, 0° when
/// both components vanish.
fn quadrant_mean(s: f32, c: f32) -> f32 {
    if c == 0.0 {
        return if s > 0.0 {
            90.0
        } else if s < 0.0 {
            270.0
        } else {
            0.0
        };
    }

    let arc = atanf(s / c) * DEG_PER_RAD;

    if s > 0.0 && c > 0.0 {
        arc
    } else if c < 0.0 {
        arc + 180.0
    } else if s < 0.0 {
        arc + 360.0
    } else {
        0.0
    }
}

/// Circular mean of a set of centidegree angles, as centidegrees.
/// An exact 360° result normalizes to 0°.
pub fn circular_mean(samples: &[u16]) -> u16 {
    if samples.is_empty() {
        return 0;
    }

    let mut sin_sum = 0.0f32;
    let mut cos_sum = 0.0f32;
    for &cd in samples {
        let rad = centideg_to_deg(cd) * RAD_PER_DEG;
        sin_sum += sinf(rad);
        cos_sum += cosf(rad);
    }

    let n = samples.len() as f32;
    let avg = quadrant_mean(sin_sum / n, cos_sum / n);

    let cd = if avg == 360.0 { 0 } else { angle_to_centideg(avg) };
    if cd >= 36000 {
        cd - 36000
    } else {
        cd
    }
}

/// Append-only history of circular-mean samples. Once full, further samples
/// are silently dropped; only the reset command clears it.
#[derive(Clone, Copy)]
pub struct WindHistory {
    samples: [u16; config::WIND_HISTORY_CAPACITY],
    len: u8,
}

impl WindHistory {
    pub const fn new() -> Self {
        Self {
            samples: [0; config::WIND_HISTORY_CAPACITY],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= config::WIND_HISTORY_CAPACITY
    }

    /// Store a sample in the next free slot. Returns false (and stores
    /// nothing) once capacity is reached.
    pub fn push(&mut self, centideg: u16) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples[self.len()] = centideg;
        self.len += 1;
        true
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples[..self.len()]
    }

    pub fn clear(&mut self) {
        let len = self.len();
        for slot in self.samples[..len].iter_mut() {
            *slot = 0;
        }
        self.len = 0;
    }
}

/// Take one round of vane samples, fold them into the history and recompute
/// the long-term mean. Runs in the main loop; the float-heavy recomputation
/// works on a stack copy so interrupts stay enabled for its duration.
#[cfg(target_arch = "avr")]
pub fn sample_wind_direction(
    adc: &mut crate::hal::Adc,
    delay: &mut crate::hal::Delay,
) {
    use crate::hal::AdcChannel;
    use crate::telemetry;
    use embedded_hal::blocking::delay::DelayMs;

    // Saturated history: skip the sampling round entirely.
    if telemetry::with(|st| st.history.is_full()) {
        return;
    }

    let mut readings = [0u16; config::READINGS_PER_UPDATE];
    for slot in readings.iter_mut() {
        let volts = adc.read_voltage(AdcChannel::WindVane);
        *slot = angle_to_centideg(direction_from_voltage(volts));
        delay.delay_ms(config::WIND_SAMPLE_GAP_MS);
    }

    let sample = circular_mean(&readings);
    let history = telemetry::with(|st| {
        st.history.push(sample);
        st.history
    });
    let avg = circular_mean(history.as_slice());
    telemetry::with(|st| st.telemetry.avg_wind_dir = avg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_table_voltage_maps_to_its_angle() {
        for entry in &VANE_TABLE {
            assert_eq!(direction_from_voltage(entry.volts), entry.angle_deg);
        }
    }

    #[test]
    fn off_table_voltages_snap_to_nearest() {
        // 2.50 V sits between 2.37 V (270°) and 2.56 V full scale.
        assert_eq!(direction_from_voltage(2.50), 270.0);
        // Way below the lowest entry still lands on the lowest entry.
        assert_eq!(direction_from_voltage(0.0), 112.5);
    }

    #[test]
    fn equidistant_voltage_takes_first_table_entry() {
        let table = [
            VaneEntry { volts: 1.0, angle_deg: 45.0 },
            VaneEntry { volts: 3.0, angle_deg: 225.0 },
        ];
        // 2.0 V is exactly equidistant; the earlier entry wins.
        assert_eq!(nearest_angle(&table, 2.0), 45.0);
    }

    #[test]
    fn mean_of_identical_angles_is_that_angle() {
        assert_eq!(circular_mean(&[0, 0, 0]), 0);
        let mean = circular_mean(&[9000, 9000]);
        assert!((8999..=9001).contains(&mean), "got {mean}");
    }

    #[test]
    fn mean_wraps_around_north() {
        // 350° and 10° average to north, not south.
        let mean = circular_mean(&[35000, 1000]);
        assert!(
            mean <= 20 || mean >= 35980,
            "wraparound mean was {mean} centidegrees"
        );
    }

    #[test]
    fn mean_of_plain_angles_matches_arithmetic_mean() {
        let mean = circular_mean(&[4000, 6000]);
        assert!((4990..=5010).contains(&mean), "got {mean}");
    }

    #[test]
    fn zero_cosine_sum_falls_back_to_the_sine_sign() {
        assert_eq!(quadrant_mean(1.0, 0.0), 90.0);
        assert_eq!(quadrant_mean(-1.0, 0.0), 270.0);
        assert_eq!(quadrant_mean(0.0, 0.0), 0.0);
    }

    #[test]
    fn southern_quadrants_are_corrected() {
        let mean = circular_mean(&[18000, 18000]);
        assert!((17990..=18010).contains(&mean), "got {mean}");
        let mean = circular_mean(&[30000]);
        assert!((29990..=30010).contains(&mean), "got {mean}");
    }

    #[test]
    fn empty_history_means_north() {
        assert_eq!(circular_mean(&[]), 0);
    }

    #[test]
    fn history_saturates_at_capacity() {
        let mut history = WindHistory::new();
        for i in 0..config::WIND_HISTORY_CAPACITY {
            assert!(history.push(i as u16));
        }
        assert!(history.is_full());

        // The 111th sample is dropped and the stored data is untouched.
        assert!(!history.push(0xBEEF));
        assert_eq!(history.len(), config::WIND_HISTORY_CAPACITY);
        assert!(history.as_slice().iter().all(|&s| s != 0xBEEF));

        // The mean still covers exactly the stored entries.
        let before = circular_mean(history.as_slice());
        history.push(0xBEEF);
        assert_eq!(circular_mean(history.as_slice()), before);
    }

    #[test]
    fn clear_wipes_stored_samples() {
        let mut history = WindHistory::new();
        history.push(1234);
        history.push(5678);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.as_slice(), &[] as &[u16]);

        // Cleared history accepts a fresh run of samples from slot zero.
        assert!(history.push(9000));
        assert_eq!(history.as_slice(), &[9000]);
    }

    #[test]
    fn clearing_a_full_history_reopens_it() {
        let mut history = WindHistory::new();
        for _ in 0..config::WIND_HISTORY_CAPACITY {
            history.push(18000);
        }
        assert!(history.is_full());

        history.clear();
        assert!(!history.is_full());
        assert_eq!(history.len(), 0);
        assert!(history.push(100));
        assert_eq!(circular_mean(history.as_slice()), 100);
    }
}
