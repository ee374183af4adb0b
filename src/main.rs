use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use recast::banner::print_session_summary;
use recast::config::Config;
use recast::engine::rewrite::RewriteEngine;
use recast::generator::gemini::GeminiGenerator;
use recast::session::{Session, Status};
use recast::spinner::Spinner;

#[derive(Parser)]
#[command(
    name = "recast",
    version,
    about = "Turn robotic AI scripts into captivating voiceover copy."
)]
struct Cli {
    /// Gemini model name
    #[arg(short, long)]
    model: Option<String>,

    /// Rewrite this text, print the result, and exit (non-interactive)
    #[arg(short, long, conflicts_with = "stdin")]
    run: Option<String>,

    /// Read the text to rewrite from stdin (non-interactive)
    #[arg(long, default_value_t = false)]
    stdin: bool,

    /// Write logs to this file (the interactive UI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let one_shot = match (&cli.run, cli.stdin) {
        (Some(text), _) => Some(text.clone()),
        (None, true) => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Some(text)
        }
        (None, false) => None,
    };

    init_logging(cli.log_file.as_deref(), one_shot.is_some())?;

    // No credential, no rewriter: fail before any UI comes up.
    let config = Config::from_env(cli.model)?;
    tracing::info!(model = %config.model, "starting");

    let generator = Arc::new(GeminiGenerator::new(config.api_key, config.model));
    let engine = Arc::new(RewriteEngine::new(generator));

    match one_shot {
        Some(text) => run_once(&engine, text).await?,
        None => recast::tui::run(engine.clone()).await?,
    }

    print_session_summary(engine.session_usage());
    Ok(())
}

/// Rewrite a single text through the same session flow the UI uses.
async fn run_once(engine: &RewriteEngine, text: String) -> Result<()> {
    let mut session = Session::new();
    if !session.set_input(text) {
        bail!(
            "input is longer than the {} character limit",
            session.max_len()
        );
    }

    if !session.can_rewrite() {
        bail!("nothing to rewrite: input is blank");
    }

    let spinner = Spinner::start("Rewriting...");
    session.rewrite(engine).await;
    spinner.stop().await;

    match session.status() {
        Status::Success(text) => {
            println!("{text}");
            Ok(())
        }
        Status::Error(message) => bail!("{message}"),
        status => bail!("rewrite ended in unexpected state: {}", status.label()),
    }
}

fn init_logging(log_file: Option<&std::path::Path>, one_shot: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None if one_shot => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
        // Interactive without a log file: the alternate screen has no room for logs.
        None => {}
    }
    Ok(())
}
