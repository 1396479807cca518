// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use subkit::analysis::{Analyzer, Filter, Severity};
use subkit::app_config::{self, Config, ConfigRepository, JsonFileConfigRepository};
use subkit::file_utils::{self, FileManager};
use subkit::split::{self, RangeSelection, SplitStrategy};
use subkit::subtitle_processor::{self, SubtitleCollection, TextField};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for TextField to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTextField {
    Original,
    Translated,
}

impl From<CliTextField> for TextField {
    fn from(field: CliTextField) -> Self {
        match field {
            CliTextField::Original => TextField::Original,
            CliTextField::Translated => TextField::Translated,
        }
    }
}

/// Severity filter for the analyze listing
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFilter {
    All,
    Safe,
    Warning,
    Critical,
}

impl From<CliFilter> for Filter {
    fn from(filter: CliFilter) -> Self {
        match filter {
            CliFilter::All => Filter::All,
            CliFilter::Safe => Filter::BySeverity(Severity::Safe),
            CliFilter::Warning => Filter::BySeverity(Severity::Warning),
            CliFilter::Critical => Filter::BySeverity(Severity::Critical),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report reading speed and line shape problems
    Analyze(AnalyzeArgs),

    /// Split a file into several SRT files
    Split(SplitArgs),

    /// Save a new revision as SRT or project file
    Export(ExportArgs),

    /// Generate shell completions for subkit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// SRT or project file
    #[arg(value_name = "FILE")]
    input_path: PathBuf,

    /// Track to analyze
    #[arg(long, value_enum)]
    field: Option<CliTextField>,

    /// CPS at or above which a segment is a warning
    #[arg(long)]
    safe_max: Option<f64>,

    /// CPS above which a segment is critical
    #[arg(long)]
    warning_max: Option<f64>,

    /// List the segments matching this severity
    #[arg(long, value_enum)]
    filter: Option<CliFilter>,

    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
#[group(id = "strategy", required = true, multiple = false)]
struct SplitStrategyArgs {
    /// Segments per file
    #[arg(long, value_name = "N")]
    by_count: Option<usize>,

    /// Minutes per file
    #[arg(long, value_name = "MINUTES")]
    by_duration: Option<f64>,

    /// Cut timestamp (HH:MM:SS[,mmm]); repeat for several cuts
    #[arg(long = "marker", value_name = "TIMESTAMP")]
    markers: Vec<String>,

    /// File with one cut timestamp per line
    #[arg(long, value_name = "PATH")]
    markers_file: Option<PathBuf>,

    /// Explicit 1-based inclusive range, e.g. 31-60
    #[arg(long, value_name = "A-B")]
    range: Option<String>,

    /// Segments 1..=N
    #[arg(long, value_name = "N")]
    first: Option<usize>,

    /// Segments N..=end
    #[arg(long, value_name = "N")]
    from: Option<usize>,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// SRT or project file
    #[arg(value_name = "FILE")]
    input_path: PathBuf,

    #[command(flatten)]
    strategy: SplitStrategyArgs,

    /// Track written to the split files
    #[arg(long, value_enum)]
    field: Option<CliTextField>,

    /// Directory for the split files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not write the metadata header
    #[arg(long)]
    no_metadata: bool,

    /// Only print how many files would be written
    #[arg(long)]
    preview: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// SRT or project file
    #[arg(value_name = "FILE")]
    input_path: PathBuf,

    /// Track written to the SRT file
    #[arg(long, value_enum)]
    field: Option<CliTextField>,

    /// Write a project file instead of SRT
    #[arg(long)]
    project: bool,

    /// Directory for the exported file (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// subkit - subtitle analysis, splitting and project toolkit
#[derive(Parser, Debug)]
#[command(name = "subkit")]
#[command(version)]
#[command(about = "Subtitle readability analysis, splitting and revision export")]
#[command(long_about = "subkit checks bilingual SRT files for reading speed and line length problems,
splits them into smaller files and exports numbered revisions.

EXAMPLES:
    subkit analyze movie.srt                          # Summary for the translated track
    subkit analyze movie.srt --filter critical        # List critical segments
    subkit split movie.srt --by-count 200             # 200 segments per file
    subkit split movie.srt --by-duration 10           # 10-minute windows
    subkit split movie.srt --marker 00:20:00          # Cut at 20 minutes
    subkit split movie.srt --range 31-60              # One file with segments 31..60
    subkit export movie.srt                           # Writes [Edited]movie.srt
    subkit export [Edited]movie.srt --project         # Writes [Edited2]movie.skt.json
    subkit completions bash > subkit.bash             # Generate bash completions

CONFIGURATION:
    Configuration is read from <config dir>/subkit/conf.json by default. You can
    specify a different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with trace level; the effective level is
    // lowered with set_max_level once the configuration is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subkit", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(cli.config_path.as_deref(), cli.log_level.clone())?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Analyze(args) => run_analyze(args, &config),
        Commands::Split(args) => run_split(args, &config),
        Commands::Export(args) => run_export(args, &config),
        Commands::Completions { .. } => Ok(()),
    }
}

// Load or create configuration, then apply command line overrides
fn load_config(config_path: Option<&Path>, log_level: Option<CliLogLevel>) -> Result<Config> {
    let repository = match config_path {
        Some(path) => JsonFileConfigRepository::new(path),
        None => JsonFileConfigRepository::default(),
    };

    let mut config = if repository.exists() {
        repository
            .load()
            .with_context(|| format!("Failed to load config file: {}", repository.path().display()))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            repository.path().display()
        );
        let config = Config::default();
        repository
            .save(&config)
            .with_context(|| format!("Failed to write default config to file: {}", repository.path().display()))?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

// Load a subtitle file, applying the local fix when configured
fn load_collection(path: &Path, config: &Config, field: TextField) -> Result<SubtitleCollection> {
    if !FileManager::file_exists(path) {
        return Err(anyhow!("Input file does not exist: {:?}", path));
    }

    let mut collection = SubtitleCollection::load(path)?;
    if collection.skipped_blocks > 0 {
        warn!("Skipped {} malformed block(s) in {:?}", collection.skipped_blocks, path);
    }

    if config.auto_fix_on_upload {
        collection.segments = subtitle_processor::apply_local_fix(&collection.segments, field);
        let fixed = collection.segments.iter().filter(|s| s.is_modified).count();
        info!("Local fix changed {} segment(s)", fixed);
    }

    Ok(collection)
}

fn output_dir_for(input_path: &Path, output_dir: Option<PathBuf>) -> PathBuf {
    output_dir.unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf())
}

fn run_analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let mut analysis_config = config.analysis.clone();
    if let Some(field) = args.field {
        analysis_config.text_field = field.into();
    }
    if let Some(safe_max) = args.safe_max {
        analysis_config.safe_max = safe_max;
    }
    if let Some(warning_max) = args.warning_max {
        analysis_config.warning_max = warning_max;
    }
    if !(analysis_config.safe_max > 0.0 && analysis_config.safe_max < analysis_config.warning_max) {
        return Err(anyhow!(
            "--safe-max ({}) must be positive and below --warning-max ({})",
            analysis_config.safe_max,
            analysis_config.warning_max
        ));
    }

    let collection = load_collection(&args.input_path, config, analysis_config.text_field)?;
    let analysis = Analyzer::with_config(analysis_config).analyze(&collection.segments);
    let result = &analysis.result;

    if args.json {
        let json = serde_json::to_string_pretty(result).context("Failed to serialize analysis")?;
        println!("{}", json);
    } else {
        println!("{}", collection.source_name);
        println!("  Segments:        {}", result.total_lines);
        println!(
            "  Safe / Warning / Critical: {} / {} / {}",
            result.cps_groups.safe, result.cps_groups.warning, result.cps_groups.critical
        );
        println!("  Too long:        {}", result.too_long_lines);
        println!("  Too fast:        {}", result.too_fast_lines);
        println!(
            "  CPS min/median/avg/max: {:.1} / {:.1} / {:.1} / {:.1}",
            result.min_cps, result.median_cps, result.avg_cps, result.max_cps
        );
        for bucket in &result.cps_histogram {
            println!("  {:>6} | {:<40} {} ({}%)", bucket.label, "#".repeat(bucket.percentage as usize * 40 / 100), bucket.count, bucket.percentage);
        }
    }

    if let Some(filter) = args.filter {
        let filter: Filter = filter.into();
        for item in filter.apply(&analysis.segments) {
            println!(
                "#{:<5} {} --> {}  {:>5.1} CPS  {:<8} {}",
                item.segment.id,
                item.segment.start_time,
                item.segment.end_time,
                item.metrics.cps,
                item.metrics.severity,
                item.metrics.messages().join("; ")
            );
        }
    }

    Ok(())
}

fn split_strategy(args: &SplitStrategyArgs) -> Result<SplitStrategy> {
    if let Some(count) = args.by_count {
        return Ok(SplitStrategy::ByCount(count));
    }
    if let Some(minutes) = args.by_duration {
        return Ok(SplitStrategy::ByDuration { minutes });
    }
    if !args.markers.is_empty() {
        return Ok(SplitStrategy::ByMarkers(args.markers.clone()));
    }
    if let Some(path) = &args.markers_file {
        let text = FileManager::read_to_string(path)?;
        return Ok(SplitStrategy::markers_from_text(&text));
    }
    if let Some(range) = &args.range {
        let (start, end) = range
            .split_once('-')
            .and_then(|(a, b)| Some((a.trim().parse::<usize>().ok()?, b.trim().parse::<usize>().ok()?)))
            .ok_or_else(|| anyhow!("Invalid range '{}', expected A-B", range))?;
        return Ok(SplitStrategy::ByRange(RangeSelection::AToB(start, end)));
    }
    if let Some(n) = args.first {
        return Ok(SplitStrategy::ByRange(RangeSelection::StartToN(n)));
    }
    if let Some(n) = args.from {
        return Ok(SplitStrategy::ByRange(RangeSelection::NToEnd(n)));
    }
    Err(anyhow!("No split strategy given"))
}

fn run_split(args: SplitArgs, config: &Config) -> Result<()> {
    let field: TextField = args.field.map(Into::into).unwrap_or(config.analysis.text_field);
    let strategy = split_strategy(&args.strategy)?;
    let collection = load_collection(&args.input_path, config, field)?;

    if args.preview {
        let count = strategy.preview_count(&collection.segments)?;
        println!("{} file(s) {}", count, strategy);
        return Ok(());
    }

    let include_metadata = config.split.include_metadata && !args.no_metadata;
    let results = split::split(&collection.segments, &collection.source_name, &strategy, include_metadata)?;

    let output_dir = output_dir_for(&args.input_path, args.output_dir);
    for result in &results {
        let path = output_dir.join(&result.file_name);
        FileManager::write_to_file(&path, &result.to_srt(field))?;
        info!("Wrote {} segment(s) to {:?}", result.segments.len(), path);
    }

    info!("Split {} into {} file(s)", collection.source_name, results.len());
    Ok(())
}

fn run_export(args: ExportArgs, config: &Config) -> Result<()> {
    let field: TextField = args.field.map(Into::into).unwrap_or(config.analysis.text_field);
    let collection = load_collection(&args.input_path, config, field)?;
    let info = &collection.file_info;
    let output_dir = output_dir_for(&args.input_path, args.output_dir);

    let (file_name, content) = if args.project {
        let json = collection.to_project_json()?;
        (file_utils::generate_export_file_name(&info.base_name, info.edited_count, "skt.json"), json)
    } else {
        let srt = subtitle_processor::generate_srt(&collection.segments, field, None);
        (file_utils::generate_export_file_name(&info.base_name, info.edited_count, "srt"), srt)
    };

    let path = output_dir.join(file_name);
    FileManager::write_to_file(&path, &content)?;
    info!("Success: {:?}", path);
    Ok(())
}
