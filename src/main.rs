//! Dhaqaale forex position calculator
//!
//! Sizes forex positions from balance, risk and stop loss, and offers a
//! chat assistant backed by a hosted model with streamed replies.

mod api;
mod calculator;
mod chat;
mod config;
mod display;
mod models;

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::api::{GeminiClient, TextGenerator};
use crate::calculator::{CalculatorForm, RiskInputMode};
use crate::chat::{render_message, ChatSession};
use crate::config::AppConfig;
use crate::display::{format_currency, print_message, typing_tick, ResultsCard};

/// Forex position calculator with an AI chat assistant.
#[derive(Parser)]
#[command(name = "dhaqaale")]
#[command(about = "Currency trading position calculator", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Gemini API key (falls back to API_KEY)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "DHAQAALE_MODEL", default_value = api::DEFAULT_MODEL, global = true)]
    model: String,

    /// Wait for the whole reply instead of streaming it
    #[arg(long, global = true)]
    no_stream: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a position from flags
    Calc {
        /// Account balance, e.g. 10,000.00
        #[arg(short, long)]
        balance: String,

        /// Risk as a percentage of the balance
        #[arg(short = 'p', long, conflicts_with = "risk_amount")]
        risk_percent: Option<String>,

        /// Risk as an absolute amount
        #[arg(short = 'a', long)]
        risk_amount: Option<String>,

        /// Stop-loss distance in pips
        #[arg(short, long)]
        stop_loss: String,

        /// Target risk:reward, e.g. 1:2 or 3
        #[arg(short, long, default_value = "")]
        target_rr: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive calculator with live percent/amount sync
    Form,

    /// Interactive chat with Dhaqaale AI
    Chat,

    /// Ask Dhaqaale AI a single question
    Ask {
        /// The question
        #[arg(required = true)]
        prompt: Vec<String>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed flags.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    let config = AppConfig {
        api_key: AppConfig::resolve_api_key(cli.api_key.clone()),
        model: cli.model.clone(),
        streaming: !cli.no_stream,
        ..Default::default()
    };

    match cli.command {
        Commands::Calc {
            balance,
            risk_percent,
            risk_amount,
            stop_loss,
            target_rr,
            json,
        } => {
            let mut form = CalculatorForm::new(config.calculator.clone());
            if !form.set_balance(&balance) {
                warn!(balance = %balance, "Balance ignored: digits with at most two decimals only");
            }
            match (risk_percent, risk_amount) {
                (Some(p), _) => form.set_risk_percent(&p),
                (None, Some(a)) => form.set_risk_amount(&a),
                (None, None) => {}
            }
            form.set_stop_loss(&stop_loss);
            form.set_target_rr(&target_rr);

            // Nothing is printed for inputs that cannot be sized.
            if let Some(result) = form.submit() {
                if json {
                    println!("{}", serde_json::to_string_pretty(result)?);
                } else {
                    print!("{}", ResultsCard(result));
                }
            }
        }

        Commands::Form => run_form(&config).await?,

        Commands::Chat => {
            let client = config.gemini_client()?;
            run_chat(&config, &client).await?;
        }

        Commands::Ask { prompt } => {
            let client = config.gemini_client()?;
            let mut session = ChatSession::new(config.chat.clone());
            let prompt = prompt.join(" ");
            ask(&mut session, &client, &prompt).await?;
        }

        Commands::Config => {
            let client = config.gemini_client()?;

            println!("\n=== Chat ===\n");
            println!("  Provider:         {}", client.name());
            println!("  Model:            {}", client.model());
            println!("  API Base:         {}", config.api_base_url);
            println!(
                "  API Key:          {}{}",
                config.masked_api_key(),
                if client.has_api_key() { "" } else { " (replies will be apologies)" }
            );
            println!("  Streaming:        {}", client.is_streaming());
            println!("  Reveal Step:      {}ms", config.chat.reveal_step_ms);

            println!("\n=== Calculator ===\n");
            println!("  Pip Value / Lot:  ${}", format_currency(config.calculator.pip_value_per_lot));
            println!("  Risk Precision:   {} decimals", config.calculator.risk_precision);
            println!("  Balance Decimals: {}", config.calculator.balance_max_fraction_digits);
        }
    }

    Ok(())
}

/// Print a prompt marker and read one line; `None` at end of input.
async fn read_line<R>(lines: &mut tokio::io::Lines<R>, marker: &str) -> Result<Option<String>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    print!("{}", marker);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    lines.next_line().await.context("Failed to read from stdin")
}

async fn run_form(config: &AppConfig) -> Result<()> {
    let mut form = CalculatorForm::new(config.calculator.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("\n=== DHAQAALE Currency Trading Calculator ===");
    print_form_help();

    while let Some(line) = read_line(&mut lines, "calc> ").await? {
        let line = line.trim();
        let (command, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let value = value.trim();

        match command.to_lowercase().as_str() {
            "" => continue,
            "balance" | "b" => {
                if !form.set_balance(value) {
                    println!("  Balance takes digits with at most two decimals.");
                }
            }
            "percent" | "p" => form.set_risk_percent(value),
            "amount" | "a" => form.set_risk_amount(value),
            "focus" => match value {
                "percent" | "p" => form.focus_risk(RiskInputMode::Percent),
                "amount" | "a" => form.focus_risk(RiskInputMode::Amount),
                _ => println!("  focus takes 'percent' or 'amount'"),
            },
            "sl" | "stop" => form.set_stop_loss(value),
            "rr" => form.set_target_rr(value),
            "calc" | "c" => {
                if let Some(result) = form.submit() {
                    print!("{}", ResultsCard(result));
                }
                continue;
            }
            "show" => {
                if let Some(result) = form.result() {
                    print!("{}", ResultsCard(result));
                }
            }
            "help" | "?" => print_form_help(),
            "quit" | "exit" | "q" => break,
            other => println!("  Unknown command '{}'. Type 'help'.", other),
        }

        print_form_state(&form);
    }

    Ok(())
}

fn print_form_help() {
    println!("  balance <amount>   set account balance");
    println!("  percent <pct>      set risk percent (amount follows)");
    println!("  amount <amount>    set risk amount (percent follows)");
    println!("  focus percent|amount");
    println!("  sl <pips>          set stop loss");
    println!("  rr <ratio>         set target R:R, e.g. 1:2");
    println!("  calc | show | help | quit\n");
}

fn print_form_state(form: &CalculatorForm) {
    let blank = || "-".to_string();
    println!(
        "  Balance: ${} | Risk: {}% / ${} [{}] | SL: {} pips | R:R: {}",
        if form.formatted_balance().is_empty() { blank() } else { form.formatted_balance() },
        form.risk_percent().map(|p| p.to_string()).unwrap_or_else(blank),
        form.risk_amount().map(format_currency).unwrap_or_else(blank),
        form.risk_mode(),
        if form.stop_loss().is_empty() { "-" } else { form.stop_loss() },
        if form.target_rr().is_empty() { "-" } else { form.target_rr() },
    );
}

async fn run_chat(config: &AppConfig, client: &GeminiClient) -> Result<()> {
    let mut session = ChatSession::new(config.chat.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(
        model = client.model(),
        streaming = client.is_streaming(),
        has_key = client.has_api_key(),
        "Chat session started"
    );

    println!("\n=== Chat with DHAQAALE AI === (type /quit to leave)\n");
    show_new_messages(&mut session, 0).await?;

    while let Some(line) = read_line(&mut lines, "you> ").await? {
        let line = line.trim_end_matches(['\r', '\n']);
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }
        ask(&mut session, client, line).await?;
    }

    info!(messages = session.messages().len(), "Chat session ended");
    Ok(())
}

/// Submit one prompt and print the assistant reply.
async fn ask(session: &mut ChatSession, generator: &dyn TextGenerator, prompt: &str) -> Result<()> {
    let before = session.messages().len();

    print!("Dhaqaale AI is typing");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let accepted = session
        .submit(prompt, generator, |_| typing_tick(&mut std::io::stdout()))
        .await
        .is_some();

    // Clear the typing line.
    print!("\r\x1b[2K");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    if accepted {
        // Skip the user's own line; it is already on screen.
        show_new_messages(session, before + 1).await?;
    }
    Ok(())
}

/// Print messages from index `from` onwards, revealing unseen ones.
async fn show_new_messages(session: &mut ChatSession, from: usize) -> Result<()> {
    let step = session.config().reveal_step();
    let pending: Vec<_> = session.messages()[from..].to_vec();

    for message in pending {
        let animate = session.should_reveal(message.id) && message.is_assistant();
        let tokens = render_message(&message.text, animate, step);
        print_message(&message, &tokens).await?;
    }
    Ok(())
}
