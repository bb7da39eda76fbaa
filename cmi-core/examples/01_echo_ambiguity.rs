//! Echo Ambiguity Example
//!
//! An ultrasonic sensor pointed at a hand sometimes picks up the wall behind
//! it instead. This example feeds such a stream into the interpreter and
//! prints what it does with every sample.
//!
//! ## What You'll Learn
//!
//! - Configuring an interpreter with the builder
//! - Reading the input outcome (matched rank or new channel)
//! - Watching a second cluster take over once it becomes the better one
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_echo_ambiguity
//! ```

use cmi_core::{ConstDeltaConfig, InputOutcome, Interpreter};

fn main() {
    println!("CMI Echo Ambiguity Example");
    println!("==========================\n");

    let config = ConstDeltaConfig::<u32>::const_delta(5)
        .with_weights(4, 1)
        .with_initial_badness(40)
        .with_badness_reducer(9);

    if let Err(e) = config.check(10_000) {
        println!("Configuration rejected: {}", e);
        return;
    }

    let mut cmi: Interpreter<u32, _, 2> = Interpreter::new(config);

    // hand at ~100, wall at ~500, then the hand moves away to ~300
    let stream = [
        100, 100, 102, 500, 500, 101, 99, 500, 100, 300, 301, 299, 300, 300, 302, 300, 301,
    ];

    println!("{:>6}  {:<12}  {:>6}  channels (average/badness)", "input", "outcome", "output");
    for &sample in &stream {
        let outcome = cmi.input(sample);
        let label = match outcome {
            InputOutcome::Matched(rank) => format!("rank {}", rank),
            InputOutcome::Created => String::from("new channel"),
        };

        let channels: Vec<String> = cmi
            .channels()
            .iter()
            .map(|c| {
                if c.is_valid() {
                    format!("{}/{}", c.average(), c.badness())
                } else {
                    String::from("-")
                }
            })
            .collect();

        println!("{:>6}  {:<12}  {:>6}  {}", sample, label, cmi.output(), channels.join("  "));
    }

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- Far echoes get their own channel instead of dragging the average");
    println!("- The output follows the channel with the lowest badness");
    println!("- A new position takes over after a few consistent samples");
}
