use anyhow::{bail, Result};
use aoai_gateway_deploy::{az::AzCli, config};
use std::path::Path;

/// Execute the account command
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let az = AzCli::new(cfg.az.program.clone());

    if !az.account_show().await?.success {
        bail!("No usable az account; run 'az login' first");
    }

    Ok(())
}
