//! Credential-gated intake wizard CLI.
//!
//! Verifies a credential against the configured backend, keeps the session
//! token in `.intake/token.json`, and walks the three-step wizard from an
//! answer patch file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intake::context::{IntakeContext, IntakeError};
use intake::exit_codes;
use intake::fill::{StepReport, fill_and_submit, preview};
use intake::io::config::load_config;
use intake::io::patch_file::load_patches;
use intake::io::submitter::LogSubmitter;
use intake::session::Session;

#[derive(Parser)]
#[command(name = "intake", version, about = "Credential-gated intake wizard")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "intake.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a credential from the identity provider and persist the session.
    Login {
        /// Opaque credential string; empty values are ignored.
        #[arg(long)]
        credential: String,
    },
    /// Restore the persisted session and print its state.
    Status,
    /// Forget the persisted session token.
    Logout,
    /// Walk the wizard with the given answers and submit them.
    Fill {
        /// TOML file with `[[patch]]` entries.
        #[arg(long)]
        answers: PathBuf,

        /// Log the submission instead of writing it to the outbox.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the fields each step would show for the given answers.
    Fields {
        #[arg(long)]
        answers: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    intake::logging::init();
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Login { credential } => cmd_login(&cli.config, &credential).await,
        Command::Status => cmd_status(&cli.config).await,
        Command::Logout => cmd_logout(&cli.config),
        Command::Fill { answers, dry_run } => cmd_fill(&cli.config, &answers, dry_run).await,
        Command::Fields { answers } => cmd_fields(&answers),
    }
}

fn build_context(config_path: &Path) -> Result<IntakeContext> {
    let cfg = load_config(config_path).context("load config")?;
    IntakeContext::from_config(&cfg)
}

async fn cmd_login(config_path: &Path, credential: &str) -> Result<i32> {
    let ctx = build_context(config_path)?;
    let session = ctx.login_with_credential(Some(credential)).await;
    Ok(print_session("login", &session))
}

async fn cmd_status(config_path: &Path) -> Result<i32> {
    let ctx = build_context(config_path)?;
    let session = ctx.restore_session().await;
    Ok(print_session("status", &session))
}

fn cmd_logout(config_path: &Path) -> Result<i32> {
    let ctx = build_context(config_path)?;
    ctx.logout().context("logout")?;
    println!("logout: ok");
    Ok(exit_codes::OK)
}

async fn cmd_fill(config_path: &Path, answers: &Path, dry_run: bool) -> Result<i32> {
    let patches = load_patches(answers)?;
    let ctx = if dry_run {
        let cfg = load_config(config_path).context("load config")?;
        IntakeContext::with_submitter(&cfg, LogSubmitter)?
    } else {
        build_context(config_path)?
    };
    let session = ctx.restore_session().await;
    if !session.authenticated {
        eprintln!("fill: not authenticated (run `intake login` first)");
        return Ok(exit_codes::UNAUTHENTICATED);
    }
    match fill_and_submit(&ctx, &patches) {
        Ok(outcome) => {
            print_steps("fill", &outcome.steps);
            println!("fill: submitted_at={}", outcome.submission.submitted_at);
            Ok(exit_codes::OK)
        }
        Err(IntakeError::NotAuthenticated) => {
            eprintln!("fill: session lost");
            Ok(exit_codes::UNAUTHENTICATED)
        }
        Err(err) => Err(err).context("fill wizard"),
    }
}

fn cmd_fields(answers: &Path) -> Result<i32> {
    let patches = load_patches(answers)?;
    print_steps("fields", &preview(&patches));
    Ok(exit_codes::OK)
}

fn print_session(label: &str, session: &Session) -> i32 {
    if session.authenticated {
        println!(
            "{label}: authenticated names={}",
            session.known_names.join(",")
        );
        exit_codes::OK
    } else {
        println!("{label}: unauthenticated");
        exit_codes::UNAUTHENTICATED
    }
}

fn print_steps(label: &str, steps: &[StepReport]) {
    for report in steps {
        let active: Vec<&str> = report.active.iter().map(|field| field.as_str()).collect();
        println!("{label}: step={} active={}", report.step, active.join(","));
    }
}
