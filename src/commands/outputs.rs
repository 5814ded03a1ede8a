use anyhow::{bail, Result};
use aoai_gateway_deploy::{az::AzCli, config, pipeline};
use std::path::Path;

/// Execute the outputs command
///
/// Reads back the gateway outputs of a deployment made earlier
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let az = AzCli::new(cfg.az.program.clone());

    match pipeline::fetch_outputs(&az, &cfg).await? {
        Some(outputs) if outputs.is_complete() => Ok(()),
        Some(_) => bail!("Deployment '{}' is missing outputs", cfg.deployment.name),
        None => bail!("Deployment '{}' could not be read", cfg.deployment.name),
    }
}
