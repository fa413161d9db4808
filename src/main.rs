// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use srtsmith::app_config::{self, Config, ParamOverride, DEFAULT_CONFIG_FILE};
use srtsmith::app_controller::Controller;
use srtsmith::diff::{DiffKind, DiffSegment};
use srtsmith::plugins::{all_plugins, ParamKind};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// Options shared by every command that loads the configuration
#[derive(clap::Args, Debug, Clone)]
struct ConfigArgs {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Enable a plugin for this run (repeatable)
    #[arg(long, value_name = "PLUGIN_ID", global = true)]
    enable: Vec<String>,

    /// Disable a plugin for this run (repeatable)
    #[arg(long, value_name = "PLUGIN_ID", global = true)]
    disable: Vec<String>,

    /// Override a plugin parameter, e.g. `cps.maxCps=20` (repeatable)
    #[arg(long, value_name = "PLUGIN.PARAM=VALUE", global = true)]
    param: Vec<ParamOverride>,
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Write outputs here instead of next to the inputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the enabled plugins and write changed files (default command)
    Process(ProcessArgs),

    /// Show statistics of a file before and after processing
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show a line diff between a file and its processed version
    Diff {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print every line, not only changed ones
        #[arg(short, long)]
        all: bool,
    },

    /// List plugins with their current settings
    Plugins,

    /// Generate shell completions for srtsmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtsmith - SRT subtitle cleanup and conversion
///
/// Fixes reading speed, durations, gaps and long lines in SRT files,
/// converts Serbian Latin subtitles to Cyrillic and normalises encodings.
#[derive(Parser, Debug)]
#[command(name = "srtsmith")]
#[command(version)]
#[command(about = "SRT subtitle cleanup and conversion tool")]
#[command(long_about = "srtsmith runs an ordered chain of plugins over SRT subtitle files.

EXAMPLES:
    srtsmith movie.srt                          # Process using the config file
    srtsmith -f movie.srt                       # Force overwrite existing output
    srtsmith --enable cyrillization movie.srt   # Also convert to Cyrillic
    srtsmith --param cps.maxCps=20 /subs/       # Process a whole directory
    srtsmith info movie.srt                     # Statistics before and after
    srtsmith diff movie.srt                     # What processing would change
    srtsmith plugins                            # Plugin list with settings
    srtsmith completions bash > srtsmith.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in srtsmith.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: ConfigArgs,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Write outputs here instead of next to the inputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
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
        // The logger itself lets everything through; log::max_level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
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

    // @returns: ANSI colour for log level
    fn get_colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
                Self::get_colour_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
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
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtsmith", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => {
            let config = load_config(&cli.config)?;
            run_process(config, args).await
        }
        Some(Commands::Info { file }) => {
            let config = load_config(&cli.config)?;
            run_info(config, &file).await
        }
        Some(Commands::Diff { file, all }) => {
            let config = load_config(&cli.config)?;
            run_diff(config, &file, all).await
        }
        Some(Commands::Plugins) => {
            let config = load_config(&cli.config)?;
            print_plugins(&config);
            Ok(())
        }
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            let config = load_config(&cli.config)?;
            let args = ProcessArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                output_dir: cli.output_dir,
            };
            run_process(config, args).await
        }
    }
}

/// Load or create the config file, then apply command line overrides
fn load_config(args: &ConfigArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = args.log_level {
        let level: app_config::LogLevel = level.into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&args.config_path)?;

    if let Some(level) = args.log_level {
        config.log_level = level.into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.apply_overrides(&args.enable, &args.disable, &args.param)?;
    config.validate()?;
    Ok(config)
}

async fn run_process(config: Config, args: ProcessArgs) -> Result<()> {
    let controller = Controller::with_config(config)?;

    let summary = if args.input_path.is_file() {
        controller
            .run(args.input_path.clone(), args.output_dir, args.force_overwrite)
            .await?
    } else if args.input_path.is_dir() {
        controller
            .run_folder(args.input_path.clone(), args.output_dir, args.force_overwrite)
            .await?
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    };

    if summary.errors > 0 {
        return Err(anyhow!("{} file(s) failed to process", summary.errors));
    }
    Ok(())
}

async fn run_info(config: Config, file: &Path) -> Result<()> {
    let controller = Controller::with_config(config)?;
    let comparison = controller.info(file).await?;

    println!("== Original ==");
    print!("{}", comparison.original);
    println!();
    println!("== Processed ==");
    print!("{}", comparison.processed);
    if !comparison.report.is_empty() {
        println!();
        println!("== Changes ==");
        for line in comparison.report.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn render_segments(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.changed {
                format!("\x1B[7m{}\x1B[0m", segment.text)
            } else {
                segment.text.clone()
            }
        })
        .collect()
}

async fn run_diff(config: Config, file: &Path, all: bool) -> Result<()> {
    let controller = Controller::with_config(config)?;
    let rows = controller.diff(file).await?;

    let changed = rows.iter().filter(|row| row.is_change()).count();
    for row in rows.iter().filter(|row| all || row.is_change()) {
        match row.kind {
            DiffKind::Equal => println!("  {}", row.left.as_deref().unwrap_or_default()),
            DiffKind::Removed => println!("\x1B[31m- {}\x1B[0m", render_segments(&row.left_segments)),
            DiffKind::Added => println!("\x1B[32m+ {}\x1B[0m", render_segments(&row.right_segments)),
            DiffKind::Modified => {
                println!("\x1B[31m- \x1B[0m{}", render_segments(&row.left_segments));
                println!("\x1B[32m+ \x1B[0m{}", render_segments(&row.right_segments));
            }
        }
    }
    info!("{} changed line(s)", changed);
    Ok(())
}

fn print_plugins(config: &Config) {
    for plugin in all_plugins() {
        let enabled = config.plugins.is_enabled(plugin.id());
        println!(
            "[{}] {} ({})",
            if enabled { "x" } else { " " },
            plugin.name(),
            plugin.id()
        );
        println!("    {}", plugin.description());
        for param in plugin.params() {
            let value = config
                .plugins
                .param(plugin.id(), param.key)
                .unwrap_or(param.default_value);
            let shown = match param.kind {
                ParamKind::Options(options) => options
                    .iter()
                    .find(|(option, _)| *option == value)
                    .map(|(_, label)| label.to_string())
                    .unwrap_or_else(|| value.to_string()),
                ParamKind::Range { .. } => value.to_string(),
            };
            println!("    {}.{} = {} ({})", plugin.id(), param.key, shown, param.label);
        }
    }
}
