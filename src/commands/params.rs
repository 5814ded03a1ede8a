use anyhow::Result;
use aoai_gateway_deploy::{config, console, parameters::DeploymentParameters};
use std::path::{Path, PathBuf};

/// Execute the params command
///
/// Renders the parameters document to stdout, or to `output` when given
pub fn execute(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let params = DeploymentParameters::from_config(&cfg);

    match output {
        Some(path) => {
            params.write_to(&path)?;
            console::print_ok(
                &format!("Parameters written to '{}'", path.display()),
                None,
            );
        }
        None => println!("{}", params.to_json_pretty()?),
    }

    Ok(())
}
