//! Smoother Comparison Example
//!
//! Runs one recorded echo sequence through the interpreter and the two plain
//! averages the firmware could be built with, and prints the tone each one
//! would play.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_compare_smoothers
//! ```

use cmi_core::{
    constants::{timing::CPU_CLOCK_HZ, ULTRASONIC_CHANNELS},
    ConstDeltaConfig, EchoTicks, Interpreter, MovingAverage, RangeFinder, Smoother,
    WeightedAverage,
};

/// Hand at 0x0300 ticks, wall at 0x0900, a timeout now and then
fn recording() -> Vec<EchoTicks> {
    (0..40u32)
        .map(|i| {
            if i % 13 == 12 {
                EchoTicks::new(0x0B, 0x00)
            } else if i % 4 == 3 {
                EchoTicks::new(0x09, (i * 3) as u8)
            } else {
                EchoTicks::new(0x03, (i * 5 % 16) as u8)
            }
        })
        .collect()
}

fn run<S: Smoother<u32>>(name: &str, smoother: S, readings: &[EchoTicks]) {
    let mut finder = RangeFinder::new(smoother);

    println!("{}", name);
    println!("{}", "-".repeat(name.len()));
    for &reading in readings {
        match finder.process(reading) {
            Ok(cycle) => {
                let hz = cycle
                    .tone
                    .frequency_hz(CPU_CLOCK_HZ)
                    .map_or_else(|| String::from("off"), |hz| format!("{} Hz", hz));
                let code = cycle.code.map_or_else(|| String::from("-"), |c| c.to_string());
                println!(
                    "  raw {:#06x}  code {:>3}  smoothed {:#06x}  tone {}",
                    cycle.raw, code, cycle.smoothed, hz
                );
            }
            Err(e) => println!("  {}", e),
        }
    }
    println!(
        "  {} cycles, {} timeouts, final distance {:#06x}\n",
        finder.cycles(),
        finder.timeouts(),
        finder.smoothed()
    );
}

fn main() {
    println!("CMI Smoother Comparison");
    println!("=======================\n");

    let readings = recording();

    let cmi: Interpreter<u32, _, ULTRASONIC_CHANNELS> =
        Interpreter::new(ConstDeltaConfig::ultrasonic());
    run("Channelling interpreter", cmi, &readings);
    run("Weighted average (80/20)", WeightedAverage::default(), &readings);
    run("Moving average (20 samples)", MovingAverage::firmware(), &readings);

    println!("{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- The interpreter keeps playing the hand's pitch");
    println!("- Both averages wander towards the wall and back");
}
