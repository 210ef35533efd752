pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use visor_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use visor_core::errors::ApplicationError;
use visor_core::labels::{LabelCatalog, Locale};

#[derive(Debug, Parser)]
#[command(
    name = "visor",
    about = "Visor Urbano procedure workflow CLI",
    long_about = "Classify procedure records into workflow steps, tally the director dashboard, and inspect configuration.",
    after_help = "Examples:\n  visor classify --procedure tramite.json --json\n  visor dashboard --procedures tramites.json\n  visor templates"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a visor.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Display locale for labels and messages (es|en)")]
    locale: Option<String>,
    #[arg(long, global = true, help = "Log level written to stderr (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Log format written to stderr (compact|pretty|json)")]
    log_format: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Classify one procedure record into its workflow view")]
    Classify {
        #[arg(long, help = "JSON file holding the procedure record")]
        procedure: PathBuf,
        #[arg(long, help = "JSON file holding the workflow status record")]
        workflow_status: Option<PathBuf>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Tally a JSON array of procedure records for the director dashboard")]
    Dashboard {
        #[arg(long, help = "JSON file holding an array of procedure records")]
        procedures: PathBuf,
    },
    #[command(about = "List the step template of every procedure category")]
    Templates,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = dispatch(cli);

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Runs one parsed invocation and returns its stdout payload and exit code.
pub fn dispatch(cli: Cli) -> commands::CommandResult {
    let Cli { config: config_path, locale, log_level, log_format, command } = cli;

    let loaded = cli_overrides(locale.as_deref(), log_level, log_format.as_deref())
        .and_then(|overrides| load_config(config_path.clone(), overrides));
    let (config, overrides) = match loaded {
        Ok(loaded) => loaded,
        Err(error) => {
            return commands::CommandResult::from_error(command_name(&command), &error);
        }
    };
    init_logging(&config);

    match command {
        Command::Classify { procedure, workflow_status, json } => {
            commands::classify::run(&procedure, workflow_status.as_deref(), json, &config)
        }
        Command::Dashboard { procedures } => commands::dashboard::run(&procedures, &config),
        Command::Templates => commands::CommandResult::rendered(commands::templates::run(
            LabelCatalog::for_locale(config.display.locale),
        )),
        Command::Config => commands::config::run(&config, config_path.as_deref(), &overrides),
    }
}

fn cli_overrides(
    locale: Option<&str>,
    log_level: Option<String>,
    log_format: Option<&str>,
) -> Result<ConfigOverrides, ApplicationError> {
    Ok(ConfigOverrides {
        locale: locale.map(str::parse::<Locale>).transpose()?,
        log_level,
        log_format: log_format.map(str::parse::<LogFormat>).transpose()?,
    })
}

/// Effective config plus the overrides that shaped it, for source attribution.
fn load_config(
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<(AppConfig, ConfigOverrides), ApplicationError> {
    let options = LoadOptions {
        require_file: config_path.is_some(),
        config_path,
        overrides: overrides.clone(),
    };
    Ok((AppConfig::load(options)?, overrides))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Classify { .. } => "classify",
        Command::Dashboard { .. } => "dashboard",
        Command::Templates => "templates",
        Command::Config => "config",
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when commands run in-process.
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
