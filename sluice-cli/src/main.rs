//! sluice CLI entry point: output rows -> validate -> request -> coordinator.

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use is_terminal::IsTerminal;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use sluice_core::{
    format_droplets_as_coins, prepare_request, AgentError, OutputMode, RawInputSpec, SluiceError,
    TransactionRequest,
};

use client::{submit, HttpSubmissionClient};
use render::{
    confirm_or_abort, human_header, render_issues_table, render_outputs_table, spinner,
};

const DEFAULT_NODE_URL: &str = "http://localhost:8081";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Auto,
    Json,
    Human,
}

#[derive(Debug, Parser)]
#[command(name = "sluice", version)]
#[command(about = "Send a coinjoin transaction to the coinjoin coordinator")]
#[command(after_help = "Note: coin amounts are in coins; 1 coin = 1,000,000 droplets.")]
struct Cli {
    /// Wallet file or path. The default wallet path is used when omitted.
    #[arg(short = 'f', value_name = "WALLET")]
    wallet: Option<PathBuf>,

    /// Sender address.
    #[arg(short = 'a', long = "address")]
    address: Option<String>,

    /// Comma separated list of unspents to use.
    #[arg(short = 'u', long = "unspents")]
    unspents: Option<String>,

    /// Send to many: JSON array of {"addr", "coins", "hours"} objects.
    #[arg(short = 'm', value_name = "JSON")]
    many: Option<String>,

    /// Send to many: CSV file of address,coins,hours rows (no header).
    #[arg(long = "csv", value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Coinjoin coordinator URL.
    #[arg(
        short = 'n',
        long = "node-url",
        alias = "nodeURL",
        env = "COINJOIN_API",
        default_value = DEFAULT_NODE_URL
    )]
    node_url: String,

    /// Output format: auto (tty=human, pipe=agent), json (agent), human (operator).
    #[arg(long, value_enum, default_value = "auto")]
    output: OutputFormat,

    /// Bypass confirmation prompts (required for agent mode).
    #[arg(long)]
    force: bool,

    /// Validate and print the transaction request without submitting it.
    #[arg(long)]
    dry_run: bool,

    /// [to address] [coin amount] [hours amount]
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    ValidationError = 1,
    ConfirmationRequired = 2,
    SubmissionError = 3,
    ConfigError = 4,
}

impl ExitCode {
    const fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Detect output mode based on CLI flags and TTY detection.
fn detect_output_mode(output: OutputFormat) -> OutputMode {
    match output {
        OutputFormat::Human => OutputMode::Human,
        OutputFormat::Json => OutputMode::Agent,
        OutputFormat::Auto => {
            if std::io::stdout().is_terminal() {
                OutputMode::Human
            } else {
                OutputMode::Agent
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn emit_agent_error(err: &AgentError) -> Result<()> {
    let json = serde_json::to_string(err).context("failed to serialize agent error")?;
    eprintln!("{json}");
    Ok(())
}

fn fail(mode: OutputMode, err: AgentError, code: ExitCode) -> Result<()> {
    match mode {
        OutputMode::Human => {
            println!("{} {}", "✗".red(), err.message.red());
        }
        OutputMode::Agent => emit_agent_error(&err)?,
    }
    std::process::exit(code.as_i32());
}

fn report_rejection(mode: OutputMode, err: &SluiceError) -> Result<()> {
    let code = if err.is_validation() {
        ExitCode::ValidationError
    } else {
        ExitCode::ConfigError
    };

    match mode {
        OutputMode::Human => {
            human_header("SLUICE: Outputs Rejected");
            println!(
                "{} {}",
                "✗".red(),
                "Validation failed. Nothing was submitted.".red()
            );
            println!();
            match err.row_issues() {
                Some(issues) => println!("{}", render_issues_table(issues)),
                None => println!("{}", err.to_string().red()),
            }
            println!();
            println!("{}", "Fix the errors above and re-run.".yellow());
        }
        OutputMode::Agent => emit_agent_error(&err.to_agent_error())?,
    }
    std::process::exit(code.as_i32());
}

fn print_review(request: &TransactionRequest) {
    human_header("SLUICE: Coinjoin Review");
    println!(
        "{} {}",
        "From:".bright_white().bold(),
        request.from_address.as_str().bright_white()
    );
    println!(
        "{} {}",
        "Unspents:".bright_white().bold(),
        request.ux_outs.len().to_string().bright_white()
    );
    println!("{}", render_outputs_table(&request.outs));
    println!();
    let total = request
        .total_coins()
        .map(format_droplets_as_coins)
        .unwrap_or_else(|| "overflow".to_string());
    println!(
        "{} {}",
        "Total coins:".bright_white().bold(),
        total.bright_white().bold()
    );
    println!();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mode = detect_output_mode(cli.output);

    if cli.node_url.trim().is_empty() {
        let err = AgentError {
            error: "MISSING_NODE_URL".to_string(),
            code: 2001,
            message: "missing node url".to_string(),
            details: None,
        };
        return fail(mode, err, ExitCode::ConfigError);
    }

    // Agent mode is non-interactive; submission needs an explicit --force.
    if mode == OutputMode::Agent && !cli.force && !cli.dry_run {
        let err = AgentError {
            error: "CONFIRMATION_REQUIRED".to_string(),
            code: 2002,
            message: "agent mode requires --force to submit".to_string(),
            details: None,
        };
        return fail(mode, err, ExitCode::ConfirmationRequired);
    }

    if let Some(wallet) = &cli.wallet {
        tracing::debug!(wallet = %wallet.display(), "wallet file accepted; not read by this command");
    }

    let spec = RawInputSpec {
        json: cli.many.clone(),
        csv: cli.csv.clone(),
        args: cli.args.clone(),
    };
    let sender = cli.address.as_deref().unwrap_or_default();
    let unspents = cli.unspents.as_deref().unwrap_or_default();

    let pb = spinner(mode, "Validating outputs…");
    let prepared = prepare_request(sender, unspents, &spec);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let request = match prepared {
        Ok(request) => request,
        Err(err) => return report_rejection(mode, &err),
    };

    if cli.dry_run {
        match mode {
            OutputMode::Human => {
                print_review(&request);
                println!("{}", "Dry run: nothing was submitted.".yellow());
                let json = serde_json::to_string_pretty(&request)
                    .context("failed to serialize request")?;
                println!("{json}");
            }
            OutputMode::Agent => {
                let json =
                    serde_json::to_string(&request).context("failed to serialize request")?;
                print!("{json}");
            }
        }
        return Ok(());
    }

    if mode == OutputMode::Human {
        print_review(&request);
        if !confirm_or_abort(cli.force)? {
            println!("{}", "Aborted. Nothing was submitted.".yellow());
            return Ok(());
        }
    }

    let client = HttpSubmissionClient::new(&cli.node_url);
    let pb = spinner(mode, "Submitting to coordinator…");
    let submitted = submit(&client, &request);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match submitted {
        Ok(txid) => match mode {
            OutputMode::Human => println!("txid:{txid}"),
            OutputMode::Agent => print!("{}", json!({ "txid": txid })),
        },
        Err(err) => {
            tracing::debug!(error = %err, "submission failed");
            let err = AgentError {
                error: "SUBMISSION_FAILED".to_string(),
                code: 4001,
                message: format!("{err:#}"),
                details: None,
            };
            return fail(mode, err, ExitCode::SubmissionError);
        }
    }

    Ok(())
}
