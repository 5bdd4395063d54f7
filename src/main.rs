#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use ufmt::uwriteln;
    use weatherstation_firmware::drivers::SerialConsole;
    use weatherstation_firmware::hal::{self, Adc, Delay};
    use weatherstation_firmware::{config, solar, telemetry, wind};

    // Claim the peripherals once; the HAL modules work on raw register
    // blocks from here on.
    let _dp = avr_device::atmega128a::Peripherals::take().unwrap();

    let mut console = SerialConsole::new();
    let mut adc = Adc::new();
    let mut delay = Delay::new();

    hal::exint::init();
    hal::twi::init(config::TWI_SLAVE_ADDRESS);
    hal::timer::start_tick_timer();

    // SAFETY: interrupts were disabled up to this point; all shared state
    // is statically initialized.
    unsafe { avr_device::interrupt::enable() };

    uwriteln!(console, "weatherstation slave ready").ok();

    loop {
        let flags = telemetry::with(|st| st.take_flags());

        if flags.energy_due {
            solar::sample_solar_power(&mut adc, &mut delay);
        }

        if flags.wind_dir_due {
            wind::sample_wind_direction(&mut adc, &mut delay);

            let (dir, count) =
                telemetry::with(|st| (st.telemetry.avg_wind_dir, st.telemetry.wind_count));
            uwriteln!(console, "wind avg {} cdeg, {} pulses", dir, count).ok();
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
