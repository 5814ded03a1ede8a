use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `AOAI_DEPLOY__APIM__SKU=Developer`
pub const ENV_PREFIX: &str = "AOAI_DEPLOY";

/// On Windows `az` is a batch shim that `CreateProcess` only finds by full name
#[cfg(windows)]
pub const DEFAULT_AZ_PROGRAM: &str = "az.cmd";
#[cfg(not(windows))]
pub const DEFAULT_AZ_PROGRAM: &str = "az";

/// APIM backend pools accept priorities 1..=5 and weights 1..=1000
const MAX_PRIORITY: u32 = 5;
const MAX_WEIGHT: u32 = 1000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeployConfig {
    pub deployment: DeploymentConfig,
    pub apim: ApimConfig,
    pub model: ModelConfig,
    pub openai_resources: Vec<OpenAIResource>,
    pub az: AzConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeploymentConfig {
    pub name: String,
    /// Derived as `lab-<name>` when not set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    pub location: String,
    pub template_file: PathBuf,
    pub parameters_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApimConfig {
    pub sku: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub deployment_name: String,
    pub name: String,
    pub version: String,
    pub capacity: u32,
    pub sku: String,
    pub api_version: String,
}

/// One OpenAI backend behind the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OpenAIResource {
    pub name: String,
    pub location: String,
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzConfig {
    pub program: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            deployment: DeploymentConfig {
                name: "aoai-gateway-02".to_string(),
                resource_group: None,
                location: "eastasia".to_string(),
                template_file: PathBuf::from("main.bicep"),
                parameters_file: PathBuf::from("params.json"),
            },
            apim: ApimConfig {
                sku: "Basicv2".to_string(),
            },
            model: ModelConfig {
                deployment_name: "gpt-4.1-api".to_string(),
                name: "gpt-4.1".to_string(),
                version: "2025-04-14".to_string(),
                capacity: 500,
                sku: "GlobalStandard".to_string(),
                api_version: "2024-10-21".to_string(),
            },
            // PTU-like primary until exhaustion, then an even split across the fallbacks
            openai_resources: vec![
                OpenAIResource::new("openai1", "canadaeast", 1, None),
                OpenAIResource::new("openai2", "uksouth", 2, Some(50)),
                OpenAIResource::new("openai3", "spaincentral", 2, Some(50)),
            ],
            az: AzConfig {
                program: DEFAULT_AZ_PROGRAM.to_string(),
            },
        }
    }
}

impl OpenAIResource {
    pub fn new(name: &str, location: &str, priority: u32, weight: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            priority,
            weight,
        }
    }
}

impl DeploymentConfig {
    pub fn resource_group_name(&self) -> String {
        self.resource_group
            .clone()
            .unwrap_or_else(|| format!("lab-{}", self.name))
    }
}

/// Load configuration: built-in defaults, then the optional TOML file, then environment
pub fn load_config(path: &Path) -> Result<DeployConfig> {
    let defaults = config::Config::try_from(&DeployConfig::default())?;

    let config = config::Config::builder()
        .add_source(defaults)
        .add_source(
            config::File::new(&path.to_string_lossy(), config::FileFormat::Toml).required(false),
        )
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: DeployConfig = config.try_deserialize()?;
    validate_config(&cfg)?;

    tracing::debug!(
        path = %path.display(),
        deployment = %cfg.deployment.name,
        resources = cfg.openai_resources.len(),
        "Configuration loaded"
    );

    Ok(cfg)
}

pub fn validate_config(cfg: &DeployConfig) -> Result<()> {
    if cfg.deployment.name.trim().is_empty() {
        return Err(invalid("Deployment name cannot be empty"));
    }
    if cfg.deployment.resource_group_name().trim().is_empty() {
        return Err(invalid("Resource group name cannot be empty"));
    }
    if cfg.deployment.location.trim().is_empty() {
        return Err(invalid("Resource group location cannot be empty"));
    }
    if cfg.model.capacity == 0 {
        return Err(invalid("Model capacity must be greater than zero"));
    }

    if cfg.openai_resources.is_empty() {
        return Err(invalid("At least one OpenAI resource must be configured"));
    }

    let mut names = HashSet::new();
    for resource in &cfg.openai_resources {
        if resource.name.trim().is_empty() {
            return Err(invalid("OpenAI resource name cannot be empty"));
        }
        if !names.insert(resource.name.as_str()) {
            return Err(invalid(format!(
                "Duplicate OpenAI resource name '{}'",
                resource.name
            )));
        }
        if resource.location.trim().is_empty() {
            return Err(invalid(format!(
                "OpenAI resource '{}' has no location",
                resource.name
            )));
        }
        if resource.priority == 0 || resource.priority > MAX_PRIORITY {
            return Err(invalid(format!(
                "OpenAI resource '{}' priority must be between 1 and {}",
                resource.name, MAX_PRIORITY
            )));
        }
        if let Some(weight) = resource.weight {
            if weight == 0 || weight > MAX_WEIGHT {
                return Err(invalid(format!(
                    "OpenAI resource '{}' weight must be between 1 and {}",
                    resource.name, MAX_WEIGHT
                )));
            }
        }
    }

    for (priority, members) in priority_tiers(&cfg.openai_resources) {
        if members.len() > 1 {
            if let Some(unweighted) = members.iter().find(|r| r.weight.is_none()) {
                return Err(invalid(format!(
                    "OpenAI resource '{}' shares priority {} with other resources but has no weight",
                    unweighted.name, priority
                )));
            }
        }
    }

    Ok(())
}

/// Group resources by priority tier, lowest (preferred) tier first
pub fn priority_tiers(resources: &[OpenAIResource]) -> BTreeMap<u32, Vec<&OpenAIResource>> {
    let mut tiers: BTreeMap<u32, Vec<&OpenAIResource>> = BTreeMap::new();
    for resource in resources {
        tiers.entry(resource.priority).or_default().push(resource);
    }
    tiers
}

fn invalid(msg: impl Into<String>) -> DeployError {
    DeployError::Config(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = DeployConfig::default();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.deployment.resource_group_name(), "lab-aoai-gateway-02");
        assert_eq!(cfg.openai_resources.len(), 3);
    }

    #[test]
    fn test_default_az_program_matches_platform() {
        let cfg = DeployConfig::default();
        if cfg!(windows) {
            assert_eq!(cfg.az.program, "az.cmd");
        } else {
            assert_eq!(cfg.az.program, "az");
        }
    }

    #[test]
    fn test_explicit_resource_group_wins() {
        let mut cfg = DeployConfig::default();
        cfg.deployment.resource_group = Some("rg-custom".to_string());
        assert_eq!(cfg.deployment.resource_group_name(), "rg-custom");
    }

    #[test]
    fn test_validate_config_requires_resources() {
        let mut cfg = DeployConfig::default();
        cfg.openai_resources.clear();

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("At least one OpenAI resource must be configured"));
    }

    #[test]
    fn test_validate_config_rejects_duplicate_names() {
        let mut cfg = DeployConfig::default();
        cfg.openai_resources[2].name = "openai2".to_string();

        let err = validate_config(&cfg).unwrap_err().to_string();
        assert!(err.contains("Duplicate OpenAI resource name 'openai2'"));
    }

    #[test]
    fn test_validate_config_priority_range() {
        let mut cfg = DeployConfig::default();
        cfg.openai_resources[0].priority = 0;
        assert!(validate_config(&cfg).is_err());

        cfg.openai_resources[0].priority = 6;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_config_weight_range() {
        let mut cfg = DeployConfig::default();
        cfg.openai_resources[1].weight = Some(1001);
        assert!(validate_config(&cfg).is_err());

        cfg.openai_resources[1].weight = Some(0);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_shared_tier_requires_weights() {
        let mut cfg = DeployConfig::default();
        cfg.openai_resources[2].weight = None;

        let err = validate_config(&cfg).unwrap_err().to_string();
        assert!(err.contains("'openai3' shares priority 2"));
    }

    #[test]
    fn test_single_member_tier_may_omit_weight() {
        let cfg = DeployConfig::default();
        let tiers = priority_tiers(&cfg.openai_resources);

        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[&1].len(), 1);
        assert!(tiers[&1][0].weight.is_none());
        assert_eq!(tiers[&2].len(), 2);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut cfg = DeployConfig::default();
        cfg.model.capacity = 0;
        assert!(validate_config(&cfg).is_err());
    }
}
