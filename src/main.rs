use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Debug, Parser)]
#[command(name = "slashdeck")]
#[command(version, about = "Plugin discovery and slash command registry", long_about = None)]
struct Cli {
    /// Plugins root directory (overrides config and SLASHDECK_PLUGINS_DIR)
    #[arg(long, global = true)]
    plugins_dir: Option<PathBuf>,

    /// Persisted registry file (overrides config and SLASHDECK_REGISTRY_PATH)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// List installed plugins
    List,
    /// List commands of enabled plugins
    Commands,
    /// Show registry statistics
    Stats,
    /// Enable a plugin
    Enable {
        /// Plugin id
        id: String,
    },
    /// Disable a plugin
    Disable {
        /// Plugin id
        id: String,
    },
    /// Show plugin details
    Info {
        /// Plugin id
        id: String,
    },
    /// Render a command prompt with positional arguments
    Exec {
        /// Command key (plugin:command)
        key: String,
        /// Positional arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Parse command-line arguments.
///
/// An unknown subcommand is reported on stderr and yields `Ok(None)` so the
/// caller can print usage and exit successfully.
fn parse_cli<I, T>(args: I) -> Result<Option<Cli>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => {
            let _ = e.print();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = match parse_cli(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    init_logging(cli.log_format);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = cli::load_config(cli.plugins_dir, cli.registry)?;
    let mut market = cli::open_marketplace(&config)?;

    match command {
        Commands::List => cli::cmd_list(&market),
        Commands::Commands => cli::cmd_commands(&market),
        Commands::Stats => cli::cmd_stats(&market),
        Commands::Enable { id } => cli::cmd_set_enabled(&mut market, &id, true),
        Commands::Disable { id } => cli::cmd_set_enabled(&mut market, &id, false),
        Commands::Info { id } => cli::cmd_info(&market, &id),
        Commands::Exec { key, args } => cli::cmd_exec(&market, &key, &args),
    }
}
