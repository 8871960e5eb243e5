use colored::*;
use toolfab::orchestrator::{Round, RunOutcome};

pub fn print_separator() {
    println!("{}", "-".repeat(60).bright_black());
}

/// Renders one tool round: any assistant commentary, then each invocation
/// with its output.
pub fn print_round(round: &Round) {
    if let Some(text) = round.assistant_text.as_deref() {
        if !text.is_empty() {
            println!("{} {}", "> Assistant:".bright_green(), text);
        }
    }
    for invocation in &round.invocations {
        println!(
            "{} {}({})",
            "-> tool".bright_cyan(),
            invocation.name.bold(),
            invocation.arguments
        );
        for line in pretty(&invocation.output).lines() {
            println!("   {}", line.bright_black());
        }
    }
}

pub fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Answer(text) => {
            println!("{} {}", "> Assistant:".bright_green(), text);
        }
        RunOutcome::NoAnswer => {
            println!("{}", "No final response received.".bright_yellow());
        }
    }
}

/// Tool outputs are supposed to be JSON but nothing guarantees it; fall back
/// to the raw text when they are not.
fn pretty(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}
