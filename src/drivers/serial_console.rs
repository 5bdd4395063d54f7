use core::convert::Infallible;

use crate::hal::Uart;

/// Line-oriented diagnostics console on USART0. Strictly an observer: it
/// never feeds back into the telemetry or the bus protocol.
pub struct SerialConsole {
    uart: Uart,
}

impl SerialConsole {
    pub fn new() -> Self {
        Self { uart: Uart::new() }
    }

    pub fn write_line(&mut self, s: &str) {
        self.uart.write_str(s);
        self.uart.write_str("\r\n");
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        self.uart.read_byte()
    }
}

impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ufmt::uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.uart.write_str(s);
        Ok(())
    }
}
