//! Slave protocol engine.
//!
//! The bus driver reduces TWI hardware states to four events; the engine
//! turns them into state changes and staged response bytes. It runs
//! entirely inside the bus interrupt and never blocks: every answer comes
//! from already-computed state.

use crate::config;
use crate::frame;
use crate::telemetry::Station;

/// Bus-level events delivered by the TWI interrupt.
pub enum BusEvent {
    /// Start condition with our address; begins a fresh transaction.
    AddressMatch,
    /// One command byte written by the master.
    Command(u8),
    /// The master clocked in a byte; stage the next one.
    DataRequested,
    /// Stop condition or repeated start.
    Stop,
}

/// What the bus driver has to do after the engine processed an event.
pub enum SlaveAction {
    None,
    /// Stage this byte for the master's next read clock.
    Respond(u8),
    /// The reset command ran; clear the hardware timer counter too.
    TimerReset,
}

/// Per-transaction read cursor into the serialized frame.
pub struct SlaveEngine {
    tx_index: u8,
}

impl SlaveEngine {
    pub const fn new() -> Self {
        Self { tx_index: 0 }
    }

    fn rewind(&mut self) {
        self.tx_index = 0;
    }
}

impl Station {
    /// Feed one bus event through the protocol engine.
    pub fn bus_event(&mut self, event: BusEvent) -> SlaveAction {
        match event {
            // Only an address match rewinds the cursor; a completed frame
            // does not. Within one transaction everything past the frame is
            // the sentinel byte.
            BusEvent::AddressMatch => {
                self.engine.rewind();
                SlaveAction::None
            }
            BusEvent::Command(byte) => {
                if byte == config::RESET_COMMAND {
                    self.reset();
                    SlaveAction::TimerReset
                } else {
                    // Convention: any other byte is a no-op command.
                    SlaveAction::None
                }
            }
            BusEvent::DataRequested => {
                let byte = frame::byte_at(&self.telemetry, self.engine.tx_index);
                // Saturate so an absurdly long read can never wrap back
                // into the frame.
                self.engine.tx_index = self.engine.tx_index.saturating_add(1);
                SlaveAction::Respond(byte)
            }
            BusEvent::Stop => SlaveAction::None,
        }
    }
}
