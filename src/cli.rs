use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "aoai-gateway-deploy",
    version,
    about = "Provision an API Management gateway in front of Azure OpenAI backends"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "deploy.toml", global = true)]
    pub config: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn", env = "AOAI_DEPLOY_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the resource group, deploy the template and print its outputs (default)
    Deploy,

    /// Render the deployment parameters document without calling az
    Params {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the signed-in az account
    Account,

    /// Print the outputs of an existing deployment
    Outputs,

    /// Delete, purge and remove everything in the deployment's resource group
    Cleanup {
        /// Skip purging soft-deleted Cognitive Services and APIM resources
        #[arg(long)]
        no_purge: bool,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Deploy if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Deploy)
    }
}
