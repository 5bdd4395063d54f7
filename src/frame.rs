//! Telemetry frame layout.
//!
//! The slave serves a fixed 13-byte frame: five little-endian u16/f32
//! payload fields followed by one checksum byte. The checksum is the
//! wrapping 8-bit sum of the 12 payload bytes (plain addition, not a CRC).

use crate::telemetry::Telemetry;

/// Payload bytes plus the checksum trailer.
pub const FRAME_LEN: usize = 13;

/// Returned for every byte requested past the end of the frame.
pub const SENTINEL: u8 = 0xFF;

/// Wrapping 8-bit sum of the payload.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Serialize the telemetry into the wire frame. The in-flight interval
/// counter is internal bookkeeping and is not part of the frame.
pub fn serialize(t: &Telemetry) -> [u8; FRAME_LEN] {
    let mut buf = [0u8; FRAME_LEN];
    buf[0..2].copy_from_slice(&t.rain_count.to_le_bytes());
    buf[2..4].copy_from_slice(&t.wind_count.to_le_bytes());
    buf[4..6].copy_from_slice(&t.max_interval_wind_count.to_le_bytes());
    buf[6..8].copy_from_slice(&t.avg_wind_dir.to_le_bytes());
    buf[8..12].copy_from_slice(&t.energy_generated.to_le_bytes());
    buf[12] = checksum(&buf[..12]);
    buf
}

/// The frame byte at `index`, or the sentinel once the frame is exhausted.
pub fn byte_at(t: &Telemetry, index: u8) -> u8 {
    let frame = serialize(t);
    frame.get(index as usize).copied().unwrap_or(SENTINEL)
}
