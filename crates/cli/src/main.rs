use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use spinners::{Spinner, Spinners};
use std::io::{self, Write};
use std::sync::Arc;

use toolfab::chat::ToolChoice;
use toolfab::orchestrator::{DEFAULT_MAX_ROUNDS, Orchestrator};
use toolfab::provider::groq::{DEFAULT_MODEL, Groq};
use toolfab::synthetic;

mod render;
use render::{print_outcome, print_round, print_separator};

/// Function-calling demo: the model may call synthetic tools (weather, time,
/// news, sums, jokes, quotes) before answering.
#[derive(Parser)]
#[command(name = "toolfab", version, about)]
struct Cli {
    /// Prompt to run once; omit to start an interactive session
    prompt: Option<String>,

    /// Model identifier used for every request
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum model rounds per prompt
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut client = Groq::from_env().context("set GROQ_API_KEY to run the demo")?;
    client.model = cli.model;

    let registry = synthetic::default_registry(&client);
    // The loop itself samples deterministically with a small output budget;
    // the synthetic tools carry their own settings.
    let loop_client = Arc::new(
        client
            .with_sampling(0.0, 300)
            .with_tool_choice(ToolChoice::Auto),
    );
    let orchestrator = Orchestrator::new(loop_client, registry).with_max_rounds(cli.max_rounds);

    match cli.prompt {
        Some(prompt) => run_once(&orchestrator, &prompt).await,
        None => interactive_loop(&orchestrator).await,
    }
}

async fn run_once(orchestrator: &Orchestrator, prompt: &str) -> Result<()> {
    let mut spinner = Some(thinking_spinner());
    let report = orchestrator
        .run_observed(prompt, |round| {
            // Tool rounds are rendered as they complete; the final text
            // round is rendered from the outcome below.
            if round.invocations.is_empty() {
                return;
            }
            stop_spinner(&mut spinner);
            print_round(round);
            spinner = Some(thinking_spinner());
        })
        .await;
    stop_spinner(&mut spinner);

    let report = report?;
    log::debug!("run finished after {} round(s)", report.rounds.len());
    print_outcome(&report.outcome);
    print_separator();
    Ok(())
}

fn thinking_spinner() -> Spinner {
    Spinner::new(Spinners::Dots12, "Thinking...".bright_magenta().to_string())
}

/// Stops the spinner and clears its line. stdout is line buffered, so the
/// clear escape has to be flushed or the remnant stays visible until the
/// next newline.
fn stop_spinner(spinner: &mut Option<Spinner>) {
    if let Some(mut sp) = spinner.take() {
        sp.stop();
        print!("\r\x1B[K");
        let _ = io::stdout().flush();
    }
}

/// Interactive REPL loop. Each prompt starts a fresh conversation; the core
/// keeps no state between runs.
async fn interactive_loop(orchestrator: &Orchestrator) -> Result<()> {
    println!("{}", "toolfab - Function Calling Demo".bright_blue());
    println!(
        "{}",
        "Each prompt starts a fresh conversation. Type 'exit' to quit"
            .bright_black()
    );
    print_separator();

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(":: ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("exit") {
                    break;
                }
                let _ = rl.add_history_entry(trimmed);
                run_once(orchestrator, trimmed).await?;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    println!("{}", "Goodbye!".bright_blue());
    Ok(())
}
