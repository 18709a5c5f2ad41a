// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use subtran::app_config::{self, ApiTier, Config, TranslationProvider};
use subtran::app_controller::Controller;
use subtran::providers::Backend;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "libretranslate")]
    LibreTranslate,
    #[value(name = "deepl")]
    DeepL,
    #[value(name = "google")]
    Google,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::LibreTranslate => TranslationProvider::LibreTranslate,
            CliTranslationProvider::DeepL => TranslationProvider::DeepL,
            CliTranslationProvider::Google => TranslationProvider::Google,
        }
    }
}

/// CLI Wrapper for ApiTier to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliApiTier {
    Free,
    Paid,
}

impl From<CliApiTier> for ApiTier {
    fn from(cli_tier: CliApiTier) -> Self {
        match cli_tier {
            CliApiTier::Free => ApiTier::Free,
            CliApiTier::Paid => ApiTier::Paid,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle file or every .srt file in a directory (default command)
    Translate {
        /// Input subtitle file or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        options: TranslateOptions,
    },

    /// Generate shell completions for subtran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateOptions {
    /// Output file (single input file only; default: <name>.<target>.srt)
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Source language code (e.g., 'en', 'es', or 'auto')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Override the endpoint of the selected provider
    #[arg(short, long)]
    endpoint: Option<String>,

    /// API key for the selected provider
    #[arg(short = 'k', long, env = "SUBTRAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// DeepL account tier
    #[arg(long, value_enum)]
    deepl_tier: Option<CliApiTier>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subtran - Subtitle Translator
///
/// Translates subtitle files with LibreTranslate, DeepL or Google Translate,
/// keeping block numbers and timings untouched.
#[derive(Parser, Debug)]
#[command(name = "subtran")]
#[command(version)]
#[command(about = "Machine translation for subtitle files")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subtran translates the caption text of subtitle files and keeps index and timing lines as they are.

EXAMPLES:
    subtran movie.srt                              # Translate using default config
    subtran -f movie.srt                           # Force overwrite existing output
    subtran -p deepl -k $DEEPL_KEY -t de movie.srt # Use DeepL, translate to German
    subtran -s auto -t es -o out.srt movie.srt     # Detect source, write to out.srt
    subtran -p libretranslate -e http://localhost:5000 movie.srt
    subtran --log-level debug /subtitles/          # Process entire directory
    subtran completions bash > subtran.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    libretranslate - LibreTranslate server (default: https://libretranslate.com)
    deepl          - DeepL API (requires API key; --deepl-tier free|paid)
    google         - Google Translate web endpoint (builds with the `google` feature)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Colored stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
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
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let (input_path, options) = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtran", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Translate { input_path, options }) => (input_path, options),
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            (input_path, cli.options)
        }
    };

    if let Err(e) = run_translate(input_path, options).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_translate(input_path: PathBuf, options: TranslateOptions) -> Result<()> {
    if let Some(level) = options.log_level {
        log::set_max_level(app_config::LogLevel::from(level).into());
    }

    let (mut config, config_exists) = load_config(&options.config_path)?;
    let default_config = config.clone();
    apply_overrides(&mut config, &options);

    config.validate()
        .map_err(|e| anyhow!("Configuration validation failed: {:#}", e))?;

    // Report an unavailable backend before anything is written
    Backend::from_config(&config.translation)?;

    if !config_exists {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        default_config.save(&options.config_path)?;
    }

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let controller = Controller::with_config(config)?;
    controller.run(input_path, options.output, options.force_overwrite).await
}

// @loads: Configuration file, or the defaults when it does not exist yet
fn load_config(config_path: &str) -> Result<(Config, bool)> {
    if Path::new(config_path).exists() {
        return Ok((Config::load(config_path)?, true));
    }

    Ok((Config::default(), false))
}

// @applies: Command line values on top of the file configuration
fn apply_overrides(config: &mut Config, options: &TranslateOptions) {
    if let Some(provider) = options.provider {
        config.translation.provider = provider.into();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }

    let provider = config.translation.provider;
    let provider_config = config.translation.provider_config_mut(provider);

    if let Some(endpoint) = &options.endpoint {
        provider_config.endpoint = endpoint.clone();
    }

    if let Some(api_key) = &options.api_key {
        provider_config.api_key = api_key.clone();
    }

    if let Some(tier) = options.deepl_tier {
        provider_config.tier = tier.into();
    }
}
