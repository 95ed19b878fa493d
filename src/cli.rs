//! Terminal front end: argument parsing and the chat loop.

use crate::config::Config;
use crate::provider::{ChatClient, StreamEvent};
use crate::session::{Conversation, SendOutcome};
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "bookchat", version, about = "Streaming bookstore chat assistant")]
pub struct Cli {
    /// Ask a single question and exit instead of starting the chat loop.
    pub prompt: Option<String>,

    /// Path to config.toml (default: user config dir).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured model.
    #[arg(long)]
    pub model: Option<String>,

    /// Log debug output to stderr.
    #[arg(long, short)]
    pub verbose: bool,
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.verbose || std::env::var("BOOKCHAT_LOG").is_ok() {
        let filter = tracing_subscriber::EnvFilter::try_from_env("BOOKCHAT_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bookchat=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    let client = ChatClient::new(&config)?;
    let mut conversation = Conversation::new(client, &config);

    if let Some(prompt) = cli.prompt {
        let outcome = stream_turn(&mut conversation, &prompt).await?;
        return Ok(match outcome {
            SendOutcome::Completed => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        });
    }

    chat_loop(&mut conversation, &config).await?;
    Ok(ExitCode::SUCCESS)
}

/// Interactive loop: greeting, suggestions, then read-send-print until EOF.
async fn chat_loop(conversation: &mut Conversation, config: &Config) -> Result<()> {
    println!("{}", config.greeting);
    if !config.suggestions.is_empty() {
        println!("\nSuggestions:");
        for (i, s) in config.suggestions.iter().enumerate() {
            println!("  {}. {s}", i + 1);
        }
    }
    println!("\nType a question or a suggestion number. 'exit' to quit.");
    println!("Powered by OpenRouter, model: {}\n", config.model);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let input = resolve_suggestion(input, &config.suggestions);
        stream_turn(conversation, &input).await?;
    }

    Ok(())
}

/// Send one turn, printing fragments to stdout as they arrive.
async fn stream_turn(conversation: &mut Conversation, input: &str) -> Result<SendOutcome> {
    let (tx, mut rx) = mpsc::channel::<StreamEvent>(64);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::TextDelta(text) => {
                    print!("{text}");
                    let _ = std::io::stdout().flush();
                }
                StreamEvent::Done => println!(),
            }
        }
    });

    let outcome = conversation.send(input, &tx).await;
    drop(tx);
    printer.await?;

    if outcome == SendOutcome::Failed {
        // The decode loop ended without a Done event; finish the line and
        // surface the recorded diagnostic.
        println!();
        if let Some(last) = conversation.messages().last() {
            eprintln!("{}", last.content);
        }
    }

    Ok(outcome)
}

/// A bare number picks the corresponding suggestion; anything else is sent
/// verbatim.
fn resolve_suggestion(input: &str, suggestions: &[String]) -> String {
    if let Ok(n) = input.parse::<usize>()
        && (1..=suggestions.len()).contains(&n)
    {
        return suggestions[n - 1].clone();
    }
    input.to_string()
}
