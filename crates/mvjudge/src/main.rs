mod gemini;
mod logging;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::debug;

use mvjudge_core::analyzer::{Analyzer, ReplayAnalyzer};
use mvjudge_core::config::{Config, CONFIG_FILE};
use mvjudge_core::history::HistoryStore;
use mvjudge_core::radar::RadarGeometry;
use mvjudge_core::review::ReviewSession;
use mvjudge_core::storage::FileStore;
use mvjudge_core::types::ReviewResult;
use mvjudge_core::upload::VideoUpload;
use mvjudge_core::ReviewError;

use mvjudge_report::{csv_export, json, markdown, svg, text};

use gemini::GeminiAnalyzer;

#[derive(Parser)]
#[command(name = "mvjudge")]
#[command(about = "Score AIGC music videos against a fixed rubric and keep a review history")]
#[command(version)]
struct Cli {
    /// Config file path (defaults to .mvjudge.toml in the working directory or an ancestor)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the review history (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a video file and add the result to history
    Review {
        /// Path to the video file
        video: PathBuf,
        /// Replay a saved analyzer response instead of calling the analysis service
        #[arg(long)]
        response: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Inspect or edit the review history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Export the review history as CSV
    Export {
        /// Output directory (defaults to export.output_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render a review as an SVG radar chart
    Radar {
        /// Record id, or "latest"
        id: String,
        /// Output file (prints to stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Create a default .mvjudge.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List reviews, newest first
    List {
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show one review
    Show {
        /// Record id, or "latest"
        id: String,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Delete one review
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every review
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { force } = cli.command {
        return cmd_init(force);
    }

    let config = load_config(cli.config.as_deref())?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_dir.clone());
    let history = HistoryStore::load(FileStore::new(&data_dir));
    debug!(data_dir = %data_dir.display(), records = history.len(), "opened history");

    match cli.command {
        Commands::Review {
            video,
            response,
            format,
        } => cmd_review(history, &config, &video, response.as_deref(), format),
        Commands::History { action } => match action {
            HistoryAction::List { format } => cmd_list(&history, format),
            HistoryAction::Show { id, format } => cmd_show(&history, &id, format),
            HistoryAction::Delete { id, yes } => cmd_delete(history, &id, yes),
            HistoryAction::Clear { yes } => cmd_clear(history, yes),
        },
        Commands::Export { out } => {
            let dir = out.unwrap_or_else(|| config.export.output_dir.clone());
            cmd_export(&history, &dir)
        }
        Commands::Radar { id, out } => cmd_radar(&history, &config, &id, out.as_deref()),
        Commands::Init { .. } => unreachable!("handled above"),
    }
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => {
            let cwd = std::env::current_dir().context("failed to read working directory")?;
            Ok(Config::load_or_default(&cwd))
        }
    }
}

fn cmd_review(
    history: HistoryStore<FileStore>,
    config: &Config,
    video: &Path,
    response: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let analyzer: Box<dyn Analyzer> = match response {
        Some(path) => Box::new(ReplayAnalyzer::new(path)),
        None => Box::new(GeminiAnalyzer::from_config(&config.analyzer)?),
    };

    let mut session = ReviewSession::new(history);
    let outcome = VideoUpload::read(video, config.upload.max_bytes)
        .and_then(|upload| session.submit(analyzer.as_ref(), &upload));

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) if e.is_analysis_flow() => report_review_failure(e),
        Err(e) => return Err(e.into()),
    };

    print_record(&outcome.record, format);
    if let Some(e) = outcome.persistence_error {
        report_review_failure(e);
    }
    eprintln!(
        "Saved review {} ({} in history)",
        outcome.record.id,
        session.history().len()
    );
    Ok(())
}

// Prints the user-facing message and exits with status 1.
fn report_review_failure(e: ReviewError) -> ! {
    let _ = std::io::stdout().flush();
    debug!(error = ?e, "review failed");
    eprintln!("{}", e.user_message().red());
    process::exit(1);
}

fn cmd_list(history: &HistoryStore<FileStore>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::format_history(history.records(), false)),
        OutputFormat::Text | OutputFormat::Markdown => {
            print!("{}", text::format_history(history.records()))
        }
    }
    Ok(())
}

fn cmd_show(history: &HistoryStore<FileStore>, id: &str, format: OutputFormat) -> Result<()> {
    let record = find_record(history, id)?;
    print_record(record, format);
    Ok(())
}

fn cmd_delete(mut history: HistoryStore<FileStore>, id: &str, yes: bool) -> Result<()> {
    let Some(record) = history.get(id) else {
        println!("No review with id '{id}'.");
        return Ok(());
    };
    if !yes && !confirm(&format!("Delete review of '{}'?", record.file_name))? {
        println!("Aborted.");
        return Ok(());
    }
    history.delete_by_id(id)?;
    println!("Deleted review {id}.");
    Ok(())
}

fn cmd_clear(mut history: HistoryStore<FileStore>, yes: bool) -> Result<()> {
    if history.is_empty() {
        println!("History is already empty.");
        return Ok(());
    }
    if !yes
        && !confirm(&format!(
            "Delete all {} reviews? This cannot be undone.",
            history.len()
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }
    history.clear()?;
    println!("Review history cleared.");
    Ok(())
}

fn cmd_export(history: &HistoryStore<FileStore>, dir: &Path) -> Result<()> {
    let Some(export) = csv_export::export_history(history.records())? else {
        println!("Nothing to export: history is empty.");
        return Ok(());
    };
    let path = export.write_to(dir)?;
    println!("Exported {} reviews to {}", history.len(), path.display());
    Ok(())
}

fn cmd_radar(
    history: &HistoryStore<FileStore>,
    config: &Config,
    id: &str,
    out: Option<&Path>,
) -> Result<()> {
    let record = find_record(history, id)?;
    let svg = svg::render_radar(&record.scores, &RadarGeometry::new(config.radar.size));
    match out {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote radar chart to {}", path.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(CONFIG_FILE);
    if target.exists() && !force {
        anyhow::bail!("{CONFIG_FILE} already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())?;
    println!("Created {CONFIG_FILE} with default configuration.");
    Ok(())
}

fn find_record<'a>(history: &'a HistoryStore<FileStore>, id: &str) -> Result<&'a ReviewResult> {
    let record = if id == "latest" {
        history.latest()
    } else {
        history.get(id)
    };
    record.with_context(|| format!("no review with id '{id}'"))
}

fn print_record(record: &ReviewResult, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", text::format_report(record)),
        OutputFormat::Json => println!("{}", json::format_detailed(record, false)),
        OutputFormat::Markdown => print!("{}", markdown::format_report(record)),
    }
}

/// Ask a y/N question on stdin. EOF counts as no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
