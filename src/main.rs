use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use aoai_gateway_deploy::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    init_tracing(&args.log_level, args.log_format == cli::LogFormat::Json);

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Deploy => commands::deploy::execute(&args.config).await?,
        cli::Commands::Params { output } => commands::params::execute(&args.config, output)?,
        cli::Commands::Account => commands::account::execute(&args.config).await?,
        cli::Commands::Outputs => commands::outputs::execute(&args.config).await?,
        cli::Commands::Cleanup { no_purge } => {
            commands::cleanup::execute(&args.config, !no_purge).await?
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("AOAI Gateway Deploy v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
