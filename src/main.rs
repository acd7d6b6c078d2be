// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::PathBuf;

use aquarelle::app_config::{Config, LogLevel};
use aquarelle::app_controller::{Controller, RunOptions};
use aquarelle::glossary::Glossary;
use aquarelle::phase::PhaseLexicon;
use aquarelle::providers::Anthropic;
use aquarelle::translation::batch::BatchTranslator;
use aquarelle::translation::service::{RetryPolicy, TranslationService};

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for aquarelle
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Aquarelle - phase-aware subtitle translation for watercolor lessons
///
/// Translates Chinese watercolor-lesson SRT subtitles into English,
/// detecting the sketch-to-paint phase boundary so the polysemous verb
/// 画 is rendered correctly in each phase.
#[derive(Parser, Debug)]
#[command(name = "aquarelle")]
#[command(version = "1.0.0")]
#[command(about = "Phase-aware subtitle translation for watercolor lessons")]
#[command(long_about = "Aquarelle translates Chinese watercolor-lesson subtitles into English.
It locates the sketch-to-paint phase boundary first, so the verb 画 is rendered
as \"sketch\"/\"draw\" before the boundary and \"paint\" after it, and flags the
cues a human should review.

EXAMPLES:
    aquarelle lesson.srt                          # Translate one file
    aquarelle lesson.srt -o lesson_en.srt         # Explicit output path
    aquarelle lesson.srt -g terms.csv             # Enforce a glossary
    aquarelle /lessons/                           # Translate a whole directory
    aquarelle /lessons/ --force                   # Re-translate existing outputs
    aquarelle /lessons/ --reprocess lesson3.srt   # Redo one file in a directory
    aquarelle lesson.srt --dry-run --review-log review.txt  # Plan + flags only
    aquarelle completions bash > aquarelle.bash   # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json by default (override with --config).
    The API key comes from the config file or the ANTHROPIC_API_KEY
    environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file path (single-file runs only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Glossary CSV file enforcing terminology
    #[arg(short, long)]
    glossary: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Cues per translation window
    #[arg(long)]
    batch_size: Option<usize>,

    /// Context cues carried from the preceding window
    #[arg(long)]
    overlap: Option<usize>,

    /// Write the human review log to this path
    #[arg(long)]
    review_log: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: String,

    /// Detect, flag, and plan without translating or writing output
    #[arg(long)]
    dry_run: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force: bool,

    /// Restrict a directory run to the named file (implies overwrite)
    #[arg(long, value_name = "NAME")]
    reprocess: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }

    fn tag_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::tag_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the level is adjusted once config and CLI are merged
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "aquarelle", &mut std::io::stdout());
        return Ok(());
    }

    run_translate(cli).await
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input = options
        .input
        .clone()
        .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

    let mut config =
        Config::from_file_or_default(&options.config).context("Failed to load configuration")?;

    // CLI overrides on top of the file values
    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }
    if let Some(batch_size) = options.batch_size {
        config.translation.batch_size = batch_size;
    }
    if let Some(overlap) = options.overlap {
        config.translation.overlap = overlap;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if options.output.is_some() && input.is_dir() {
        return Err(anyhow!("--output only applies to single-file runs"));
    }

    let glossary = match &options.glossary {
        Some(path) => Glossary::load(path)
            .with_context(|| format!("Failed to load glossary {}", path.display()))?,
        None => Glossary::new(),
    };

    let lexicon = match &config.lexicon_path {
        Some(path) => PhaseLexicon::load(path)?,
        None => PhaseLexicon::default(),
    };

    let translator = if options.dry_run {
        None
    } else {
        let api_key = config.resolve_api_key();
        if api_key.is_empty() {
            return Err(anyhow!(
                "No API key configured; set provider.api_key or the ANTHROPIC_API_KEY environment variable"
            ));
        }
        let provider = Anthropic::new(
            api_key,
            config.provider.endpoint.clone(),
            config.provider.model.clone(),
            config.provider.timeout_secs,
            config.provider.temperature,
        );
        let service = TranslationService::new(
            provider,
            RetryPolicy {
                retry_count: config.translation.retry_count,
                retry_backoff_ms: config.translation.retry_backoff_ms,
            },
        );
        Some(BatchTranslator::new(
            service,
            config.translation.concurrent_requests,
        ))
    };

    let run_options = RunOptions {
        output: options.output.clone(),
        review_log: options.review_log.clone(),
        dry_run: options.dry_run,
        force: options.force,
        reprocess: options.reprocess.clone(),
    };

    let controller = Controller::new(config, glossary, lexicon, translator);
    let report = controller.run(&input, &run_options).await?;

    if !report.is_clean() {
        for (file, reason) in &report.failed_documents {
            warn!("Document failed: {}: {}", file.display(), reason);
        }
        std::process::exit(1);
    }

    Ok(())
}
