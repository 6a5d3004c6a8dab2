#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use persona_matrix::{
    load_config_from_path, render_content_markdown, render_report_markdown, AnswerSelection,
    Audience, Category, ContentLibrary, Engine, EngineConfig, OptionCatalog, PersonaCode,
    ReportRequest, ScoringOption, Submission,
};

#[derive(Parser)]
#[command(name = "persona", version, about = "Persona matrix scoring and content CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an answer list against an option catalog
    Score {
        #[arg(long)]
        answers: PathBuf,
        #[arg(long)]
        options: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resolve a persona code or legacy identifier
    Code {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List all matrix cells with display names
    Matrix {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Resolve content for one persona from a library file
    Content {
        #[arg(long)]
        code: String,
        #[arg(long)]
        library: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "md")]
        format: String,
    },
    /// Score a submission and assemble its report
    Report {
        #[arg(long)]
        submission: PathBuf,
        #[arg(long)]
        options: PathBuf,
        #[arg(long)]
        library: PathBuf,
        #[arg(long)]
        audience: Audience,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "md")]
        format: String,
    },
}

#[derive(Serialize)]
struct MatrixCell {
    code: PersonaCode,
    personality: &'static str,
    mindset: &'static str,
    name: String,
}

#[derive(Serialize)]
struct ErrorOutput {
    error: &'static str,
    message: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("persona_matrix=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Score {
            answers,
            options,
            config,
            out,
        } => {
            let engine = load_engine(config.as_ref())?;
            let answers: Vec<AnswerSelection> = read_json(&answers)?;
            let catalog = load_catalog(&options)?;
            let scorecard = engine.score(&answers, &catalog);
            emit(out.as_ref(), &serde_json::to_string_pretty(&scorecard)?)?;
        }
        Commands::Code { identifier, config } => {
            let engine = load_engine(config.as_ref())?;
            match engine.resolve_identifier(&identifier) {
                Ok(resolution) => emit(None, &serde_json::to_string_pretty(&resolution)?)?,
                Err(err) => {
                    let payload = ErrorOutput {
                        error: err.code(),
                        message: err.to_string(),
                    };
                    emit(None, &serde_json::to_string_pretty(&payload)?)?;
                    return Err(err.into());
                }
            }
        }
        Commands::Matrix { config } => {
            let engine = load_engine(config.as_ref())?;
            let cells: Vec<MatrixCell> = PersonaCode::all()
                .map(|code| MatrixCell {
                    code,
                    personality: code.personality().name(),
                    mindset: code.mindset().name(),
                    name: engine
                        .names()
                        .get(code)
                        .map(str::to_string)
                        .unwrap_or_else(|| code.display_name()),
                })
                .collect();
            emit(None, &serde_json::to_string_pretty(&cells)?)?;
        }
        Commands::Content {
            code,
            library,
            config,
            out,
            format,
        } => {
            let engine = load_engine(config.as_ref())?;
            let separator = engine.config().legacy_separator;
            let library = ContentLibrary::load_from_path(&library, separator)?;
            let resolution = engine.resolve_identifier(&code)?;
            let record = engine.content_for(resolution.persona_code, &library)?;
            if format == "json" {
                emit(out.as_ref(), &serde_json::to_string_pretty(&record)?)?;
            } else {
                emit(out.as_ref(), &render_content_markdown(&record))?;
            }
        }
        Commands::Report {
            submission,
            options,
            library,
            audience,
            config,
            out,
            format,
        } => {
            let engine = load_engine(config.as_ref())?;
            let submission: Submission = read_json(&submission)?;
            let catalog = load_catalog(&options)?;
            let library =
                ContentLibrary::load_from_path(&library, engine.config().legacy_separator)?;
            let request = ReportRequest { audience };
            let report = engine.report(&request, &submission, &catalog, &library)?;
            if format == "json" {
                emit(out.as_ref(), &serde_json::to_string_pretty(&report)?)?;
            } else {
                emit(out.as_ref(), &render_report_markdown(&report))?;
            }
        }
    }

    Ok(())
}

fn load_engine(path: Option<&PathBuf>) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => load_config_from_path(path)?,
        None => EngineConfig::default(),
    };
    Ok(Engine::new(config)?)
}

fn load_catalog(path: &PathBuf) -> Result<OptionCatalog, Box<dyn std::error::Error>> {
    let options: Vec<ScoringOption> = read_json(path)?;
    Ok(OptionCatalog::new(options))
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &PathBuf,
) -> Result<T, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write to `out` when given, otherwise stdout.
fn emit(out: Option<&PathBuf>, text: &str) -> Result<(), io::Error> {
    match out {
        Some(path) => std::fs::write(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")
        }
    }
}
