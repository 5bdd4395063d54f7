use std::env;

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    // AVR link configuration. Host builds (unit tests of the portable core)
    // pass through without any of this.
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega128a");

        // Pass CPU frequency for timing calculations
        println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");
    }
}
