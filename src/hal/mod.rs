pub mod adc;
pub mod exint;
pub mod timer;
pub mod twi;
pub mod uart;

// Re-export commonly used types
pub use adc::{Adc, AdcChannel};
pub use timer::Delay;
pub use uart::Uart;
