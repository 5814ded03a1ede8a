use anyhow::Result;
use aoai_gateway_deploy::config::{self, priority_tiers, DeployConfig};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration after defaults, file and environment are merged
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    // Serialize to TOML format
    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
///
/// Validates the configuration file
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}", "Deployment".cyan(), cfg.deployment.name);
    println!(
        "  {}: {} ({})",
        "Resource Group".cyan(),
        cfg.deployment.resource_group_name(),
        cfg.deployment.location
    );
    println!("  {}: {}", "APIM SKU".cyan(), cfg.apim.sku);
    println!(
        "  {}: {} {} x{} ({})",
        "Model".cyan(),
        cfg.model.name,
        cfg.model.version,
        cfg.model.capacity,
        cfg.model.sku
    );
    println!();

    println!("  {}: {}", "OpenAI Backends".cyan(), cfg.openai_resources.len());
    for line in tier_lines(&cfg) {
        println!("    {}", line);
    }

    info!("Configuration validation successful");
    Ok(())
}

/// One line per backend, grouped by priority tier
fn tier_lines(cfg: &DeployConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for (priority, members) in priority_tiers(&cfg.openai_resources) {
        for resource in members {
            let weight = resource
                .weight
                .map(|w| format!(", weight {}", w))
                .unwrap_or_default();
            lines.push(format!(
                "priority {}: {} ({}{})",
                priority, resource.name, resource.location, weight
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoai_gateway_deploy::config::OpenAIResource;

    #[test]
    fn test_tier_lines_default() {
        let cfg = DeployConfig::default();
        assert_eq!(
            tier_lines(&cfg),
            vec![
                "priority 1: openai1 (canadaeast)".to_string(),
                "priority 2: openai2 (uksouth, weight 50)".to_string(),
                "priority 2: openai3 (spaincentral, weight 50)".to_string(),
            ]
        );
    }

    #[test]
    fn test_tier_lines_sorted_by_priority() {
        let mut cfg = DeployConfig::default();
        cfg.openai_resources = vec![
            OpenAIResource::new("fallback", "westus", 3, None),
            OpenAIResource::new("primary", "eastus", 1, None),
        ];

        let lines = tier_lines(&cfg);
        assert!(lines[0].contains("primary"));
        assert!(lines[1].contains("fallback"));
    }

    #[test]
    fn test_default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&DeployConfig::default()).unwrap();
        assert!(rendered.contains("[[openai_resources]]"));
        assert!(rendered.contains("name = \"openai1\""));
    }
}
