use anyhow::Result;
use aoai_gateway_deploy::{
    az::AzCli,
    config,
    console,
    error::DeployError,
    pipeline::{self, DeploymentReport, StepStatus},
};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the deploy command
///
/// This will:
/// 1. Read the current az account
/// 2. Ensure the resource group exists
/// 3. Write the parameters file
/// 4. Deploy the template
/// 5. Fetch and print the deployment outputs
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let az = AzCli::new(cfg.az.program.clone());

    console::print_ok("Configuration loaded", None);
    info!(deployment = %cfg.deployment.name, "Deploy command started");

    let report = pipeline::deploy(&az, &cfg).await?;
    print_summary(&report);

    if let Some(step) = report.first_failure() {
        return Err(DeployError::StepFailed { step }.into());
    }

    Ok(())
}

fn print_summary(report: &DeploymentReport) {
    println!();
    println!("{}", "Deployment Summary:".bold());
    for (step, status) in &report.steps {
        let status = match status {
            StepStatus::Succeeded => "succeeded".green(),
            StepStatus::Failed => "failed".red(),
            StepStatus::Skipped => "skipped".dimmed(),
        };
        println!("  {}: {}", step.as_str().cyan(), status);
    }
}
