use anyhow::{bail, Result};
use aoai_gateway_deploy::{
    az::AzCli,
    cleanup::{self, CleanupOptions},
    config, console,
};
use std::path::Path;

/// Execute the cleanup command
pub async fn execute(config_path: &Path, purge: bool) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let az = AzCli::new(cfg.az.program.clone());

    let report = cleanup::cleanup(&az, &cfg, CleanupOptions { purge }).await?;
    if !report.succeeded() {
        bail!("Cleanup finished with {} failure(s)", report.failures);
    }

    console::print_ok("Cleanup completed", None);
    Ok(())
}
