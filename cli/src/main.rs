//! CLI entrypoint for Helix Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use helix_application::{
    ConsensusProgress, ConversationLogger, LocalEngine, NoConversationLogger, NoProgress,
    PatternErrorClassifier, RunConsensusError, RunConsensusUseCase, classify_logged,
};
use helix_domain::{OutputFormat, Task};
use helix_infrastructure::{
    ConfigLoader, FileConfig, JsonlTranscriptLogger, OllamaRuntime, build_backends,
};
use helix_presentation::{
    ChatRepl, ChatSession, Cli, ConsoleFormatter, OutputConfig, OutputFormatter,
    ProgressReporter, ReplConfig, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit status after a user interrupt
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        match ConfigLoader::load(cli.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref());
    info!("Starting Helix Council");

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("Configuration error: {}", issue);
        }
        return Ok(ExitCode::FAILURE);
    }

    let output = OutputConfig::resolve(cli.output, config.output.format, config.output.color);
    output.apply_color();

    // === Dependency Injection ===
    let classifier = Arc::new(PatternErrorClassifier::default());

    // Hosted backends; the API key is resolved here, before any request
    let backends = match build_backends(&config) {
        Ok(backends) => backends,
        Err(e) => {
            let error = classify_logged(classifier.as_ref(), &e, "startup");
            print!("{}", ConsoleFormatter::format_error(&error));
            return Ok(ExitCode::FAILURE);
        }
    };

    let use_local = config.local.enabled && !cli.no_local;
    let local = Arc::new(LocalEngine::new(Arc::new(OllamaRuntime::from_config(
        &config.local,
    ))));

    let logger = transcript_logger(&config);
    let params = config.consensus_params().with_include_local(use_local);

    let use_case = RunConsensusUseCase::new(backends, local.clone())
        .with_classifier(classifier)
        .with_params(params)
        .with_conversation_logger(logger);

    // Chat mode
    if cli.chat {
        if use_local && config.local.auto_init {
            let engine = local.clone();
            tokio::spawn(async move {
                let state = engine
                    .init(&|progress: &str| debug!(progress, "Local model loading"))
                    .await;
                info!(%state, "Local model initialised in background");
            });
        }

        let session = ChatSession::new(cli.mode).with_language(cli.lang.clone());
        let repl_config = ReplConfig {
            show_progress: !cli.quiet && config.repl.show_progress,
            history_file: config.repl.history_file.as_ref().map(PathBuf::from),
        };
        let mut repl = ChatRepl::new(Arc::new(use_case), session).with_config(repl_config);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single task mode - task is required
    let Some(content) = cli.task else {
        bail!("A task is required. Use --chat for interactive mode.");
    };
    let mut task = Task::new(content, cli.mode).context("invalid task")?;
    if let Some(lang) = cli.lang {
        task = task.with_language(lang);
    }

    let progress = progress_for(cli.quiet);

    if use_local && config.local.auto_init {
        let state = local
            .init(&|p: &str| progress.on_local_load_progress(p))
            .await;
        if !state.is_ready() {
            warn!(%state, "Local model unavailable; continuing without it");
        }
    }

    // Ctrl-C stops the run
    let cancel = CancellationToken::new();
    let use_case = use_case.with_cancellation(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    if !cli.quiet && output.format != OutputFormat::Json {
        eprintln!("Mode: {}", task.mode().display_name());
        eprintln!("Local model: {}", local.state());
        eprintln!();
    }

    let outcome = match use_case
        .execute_with_progress(&task, progress.as_ref())
        .await
    {
        Ok(outcome) => outcome,
        Err(RunConsensusError::Cancelled) => {
            eprintln!("Cancelled.");
            return Ok(ExitCode::from(EXIT_CANCELLED));
        }
    };

    print!("{}", ConsoleFormatter.render(&outcome, output.format));
    if output.format == OutputFormat::Json {
        println!();
    }

    Ok(if outcome.overall_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initialize tracing: stderr by default, or the configured log file.
///
/// The returned guard must stay alive for buffered file output to be written.
fn init_logging(verbose: u8, file: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_writer = file.and_then(|path| {
        let path = Path::new(path);
        let name = path.file_name()?;
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).ok()?;
        Some(tracing_appender::non_blocking(
            tracing_appender::rolling::never(dir, name),
        ))
    });

    match file_writer {
        Some((writer, guard)) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

fn transcript_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    match config
        .logging
        .transcript
        .as_deref()
        .and_then(JsonlTranscriptLogger::open)
    {
        Some(logger) => {
            info!(path = %logger.path().display(), "Writing run transcript");
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

fn progress_for(quiet: bool) -> Box<dyn ConsensusProgress> {
    if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress::new())
    }
}

fn print_config_sources(explicit: Option<&Path>) {
    println!("Configuration sources (in priority order):");
    for source in ConfigLoader::sources(explicit) {
        let mark = if source.found { "FOUND" } else { "     " };
        println!("  [{}] {:<8} {}", mark, format!("{}:", source.label), source.path.display());
    }
    println!("  [     ] Default: built-in defaults");
}
