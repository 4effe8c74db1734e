//! TextGuard - AI text detection and humanization
//!
//! A CLI tool that scores text for AI-vs-human markers through the Gemini
//! API, rewrites it in a chosen tone, and keeps an on-device history.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (service, extraction, config, unknown record, etc.)

mod analysis;
mod cli;
mod config;
mod extract;
mod gemini;
mod models;
mod report;
mod session;
mod storage;

use anyhow::{bail, Context, Result};
use cli::{Args, Command, InputSource, OutputFormat};
use config::{Config, CONFIG_FILE};
use extract::ExtractError;
use gemini::{GeminiClient, TextService};
use indicatif::{ProgressBar, ProgressStyle};
use models::{AppView, Tone};
use report::ViewPayload;
use session::Session;
use std::path::Path;
use std::time::Duration;
use storage::{HistoryStore, ProgressTracker};
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ANALYZE_FAILED: &str = "Failed to analyze text. Please try again.";
const HUMANIZE_FAILED: &str = "Failed to humanize text.";
const UNSUPPORTED_FILE: &str = "Unsupported file format. Please upload PDF, DOCX, or TXT.";
const READ_FAILED: &str = "Failed to read file content.";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("TextGuard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command: {:?}", args.command);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .textguard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize model, data directory, and default tone.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` takes precedence.
fn init_logging(args: &Args) {
    let level = args.log_level().as_str().to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("textguard={}", level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one command against a fresh session.
async fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_dir = config.data_dir();
    debug!("Data directory: {}", data_dir.display());

    let client = GeminiClient::new(config.gemini_config(args.api_key.clone()))?;
    let mut session = Session::new(
        client,
        HistoryStore::open(&data_dir),
        ProgressTracker::open(&data_dir),
    );

    match &args.command {
        Command::Analyze { .. } => {
            load_input(&mut session, args.input_source(), &config, args.quiet).await?;
            run_analysis(&mut session, args.quiet).await?;
        }
        Command::Humanize { tone, .. } => {
            let tone = tone.unwrap_or(config.humanize.default_tone);
            let source = args.input_source();
            let from_record = matches!(source, Some(InputSource::Record(_)));

            load_input(&mut session, source, &config, args.quiet).await?;
            if !from_record {
                run_analysis(&mut session, args.quiet).await?;
            }
            run_humanize(&mut session, tone, args.quiet).await?;
        }
        Command::History => session.navigate(AppView::History)?,
        Command::Show { id } => {
            session.select_record(id)?;
        }
        Command::Delete { id } => {
            let removed = session.delete_record(id)?;
            println!(
                "🗑️  Deleted {} record {} ({} remaining)",
                removed.kind_label(),
                removed.id,
                session.history().len()
            );
            if session.history().is_empty() {
                println!("   History is now empty.");
            }
            return Ok(());
        }
        Command::Progress => {
            let output = match config.general.format {
                OutputFormat::Json => report::to_json(session.progress().protocols())?,
                OutputFormat::Markdown => report::render_progress_markdown(session.progress()),
            };
            return emit(&output, args.output.as_deref(), args.quiet);
        }
        Command::InitConfig => return handle_init_config(),
    }

    debug!("Rendering {} view", session.view());
    let output = render_view(&session, config.general.format)?;
    emit(&output, args.output.as_deref(), args.quiet)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Put the command's input text into the session.
async fn load_input<S: TextService>(
    session: &mut Session<S>,
    source: Option<InputSource>,
    config: &Config,
    quiet: bool,
) -> Result<()> {
    match source {
        Some(InputSource::Inline(text)) => session.set_input(text, false),
        Some(InputSource::Stdin) => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read text from stdin")?;
            debug!("Read {} bytes from stdin", text.len());
            session.set_input(text, false);
        }
        Some(InputSource::File(path)) => {
            let max_bytes = config.extract.max_file_size;
            let progress = spinner(quiet, format!("Reading {}...", path.display()));

            let outcome =
                tokio::task::spawn_blocking(move || extract::extract_text(&path, max_bytes))
                    .await
                    .context("Document extraction task panicked")?;
            finish(progress);

            let document = outcome.map_err(extraction_failure)?;
            info!(
                "Loaded {} characters of {}",
                document.text.chars().count(),
                document.kind.mime_type()
            );
            session.set_input(document.text, true);
        }
        Some(InputSource::Record(id)) => {
            session.select_record(&id)?;
        }
        None => bail!("No input text given"),
    }
    Ok(())
}

async fn run_analysis<S: TextService>(session: &mut Session<S>, quiet: bool) -> Result<()> {
    let progress = spinner(quiet, "Analyzing text...".to_string());
    let outcome = session.analyze().await;
    finish(progress);

    let analysis = outcome.context(ANALYZE_FAILED)?;
    if !quiet {
        eprintln!(
            "✅ Analysis complete: {}% human ({})",
            analysis.human_percentage, analysis.verdict
        );
    }
    Ok(())
}

async fn run_humanize<S: TextService>(
    session: &mut Session<S>,
    tone: Tone,
    quiet: bool,
) -> Result<()> {
    let progress = spinner(quiet, format!("Humanizing ({})...", tone));
    let outcome = session.humanize(tone).await;
    finish(progress);

    let humanized = outcome.context(HUMANIZE_FAILED)?;
    if !quiet {
        eprintln!(
            "✅ Humanized ({}): score {}%",
            tone, humanized.humanization_score
        );
    }
    Ok(())
}

/// Render the session's current view in the requested format.
fn render_view<S: TextService>(session: &Session<S>, format: OutputFormat) -> Result<String> {
    if session.view() == AppView::History {
        let records = session.history().newest_first();
        return match format {
            OutputFormat::Json => report::to_json(&records),
            OutputFormat::Markdown => Ok(report::render_history_markdown(&records)),
        };
    }

    let analysis = session.analysis().context("No analysis to show")?;
    let text = session.input_text();

    match format {
        OutputFormat::Json => report::to_json(&ViewPayload {
            view: session.view(),
            original_text: text,
            analysis,
            humanized: session.humanized(),
            tone: session.tone(),
        }),
        OutputFormat::Markdown if session.view() == AppView::Results => Ok(
            report::render_results_markdown(text, analysis, session.humanized(), session.tone()),
        ),
        OutputFormat::Markdown => Ok(report::render_analysis_markdown(text, analysis)),
    }
}

/// Write the rendered view to `--output` or stdout.
fn emit(content: &str, output: Option<&Path>, quiet: bool) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                eprintln!("📄 Saved to: {}", path.display());
            }
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Map an extraction error to the message shown to the user.
fn extraction_failure(e: ExtractError) -> anyhow::Error {
    let message = match &e {
        ExtractError::Unsupported(_) => UNSUPPORTED_FILE,
        _ => READ_FAILED,
    };
    anyhow::Error::new(e).context(message)
}

fn spinner(quiet: bool, message: String) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn finish(progress: Option<ProgressBar>) {
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
}
