#![allow(clippy::missing_safety_doc)]

//! Interrupt-driven USART0 driver for the diagnostics console.

use avr_device::atmega128a::USART0;
use avr_device::interrupt::Mutex;
use core::cell::RefCell;
use core::convert::Infallible;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 32;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

const UBRR_VALUE: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

// UCSR0B bits
const RXCIE: u8 = 0x80;
const UDRIE: u8 = 0x20;
const RXEN: u8 = 0x10;
const TXEN: u8 = 0x08;

pub struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
}

impl Buffer {
    const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
        }
    }

    fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            false
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }

    fn is_empty(&self) -> bool {
        self.read_idx == self.write_idx
    }
}

// Global buffers for the interrupt handlers
static TX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));
static RX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

pub struct Uart {
    _private: (),
}

impl Uart {
    pub fn new() -> Self {
        unsafe {
            let p = USART0::ptr();

            // UBRR0H and UBRR0L are not adjacent on this part
            (*p).ubrr0h.write(|w| w.bits((UBRR_VALUE >> 8) as u8));
            (*p).ubrr0l.write(|w| w.bits(UBRR_VALUE as u8));

            // 8N1
            (*p).ucsr0c.write(|w| w.bits(0x06));

            // Enable TX, RX and the RX interrupt
            (*p).ucsr0b.write(|w| w.bits(RXCIE | RXEN | TXEN));
        }

        Self { _private: () }
    }

    /// Blocking write; spins until the TX ring has room.
    pub fn write_byte(&mut self, byte: u8) {
        let _ = nb::block!(embedded_hal::serial::Write::write(self, byte));
    }

    pub fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        embedded_hal::serial::Read::read(self).ok()
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        let accepted =
            avr_device::interrupt::free(|cs| TX_BUFFER.borrow(cs).borrow_mut().write(byte));
        if accepted {
            unsafe {
                // Kick the transmitter
                (*USART0::ptr()).ucsr0b.modify(|r, w| w.bits(r.bits() | UDRIE));
            }
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        let empty = avr_device::interrupt::free(|cs| TX_BUFFER.borrow(cs).borrow().is_empty());
        if empty {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl embedded_hal::serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        avr_device::interrupt::free(|cs| RX_BUFFER.borrow(cs).borrow_mut().read())
            .ok_or(nb::Error::WouldBlock)
    }
}

// Interrupt handlers
#[avr_device::interrupt(atmega128a)]
fn USART0_RX() {
    unsafe {
        let byte = (*USART0::ptr()).udr0.read().bits();
        avr_device::interrupt::free(|cs| {
            // Overruns drop the newest byte
            let _ = RX_BUFFER.borrow(cs).borrow_mut().write(byte);
        });
    }
}

#[avr_device::interrupt(atmega128a)]
fn USART0_UDRE() {
    avr_device::interrupt::free(|cs| {
        if let Some(byte) = TX_BUFFER.borrow(cs).borrow_mut().read() {
            unsafe {
                (*USART0::ptr()).udr0.write(|w| w.bits(byte));
            }
        } else {
            // Buffer empty - disable the TX interrupt
            unsafe {
                (*USART0::ptr()).ucsr0b.modify(|r, w| w.bits(r.bits() & !UDRIE));
            }
        }
    });
}
