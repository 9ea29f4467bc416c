//! Demo that runs a few sample entries through the engine (stdout/log only).
//!
//! Pass your own text as arguments: `cargo run --bin analyze_demo -- "your entry"`.

use journal_sentiment_analyzer::{analyze, reply, validate_tables};

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    validate_tables()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let samples: Vec<String> = if args.is_empty() {
        [
            "Today was actually a good day. I felt calm and rested.",
            "I'm so stressed and overwhelmed, nothing helps.",
            "Everything feels hopeless and empty. But I'm fine, really.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    } else {
        vec![args.join(" ")]
    };

    for text in &samples {
        let a = analyze(text);
        println!("{}", serde_json::to_string_pretty(&a)?);
        println!("reply: {}", reply(&a, text));
        println!();
    }

    println!("analyze-demo done");
    Ok(())
}
