//! ARM deployment parameters document handed to `az deployment group create`

use crate::config::{DeployConfig, OpenAIResource};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PARAMETERS_SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentParameters.json#";
pub const CONTENT_VERSION: &str = "1.0.0.0";

/// ARM wraps every parameter as `{ "value": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue<T> {
    pub value: T,
}

impl<T> From<T> for ParameterValue<T> {
    fn from(value: T) -> Self {
        Self { value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentParameters {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub parameters: TemplateParameters,
}

/// Parameter names as declared by the Bicep template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameters {
    #[serde(rename = "apimSku")]
    pub apim_sku: ParameterValue<String>,
    #[serde(rename = "openAIConfig")]
    pub openai_config: ParameterValue<Vec<OpenAIResource>>,
    #[serde(rename = "openAIDeploymentName")]
    pub openai_deployment_name: ParameterValue<String>,
    #[serde(rename = "openAIModelName")]
    pub openai_model_name: ParameterValue<String>,
    #[serde(rename = "openAIModelVersion")]
    pub openai_model_version: ParameterValue<String>,
    #[serde(rename = "openAIModelCapacity")]
    pub openai_model_capacity: ParameterValue<u32>,
    #[serde(rename = "openAIModelSKU")]
    pub openai_model_sku: ParameterValue<String>,
    #[serde(rename = "openAIAPIVersion")]
    pub openai_api_version: ParameterValue<String>,
}

impl DeploymentParameters {
    pub fn from_config(cfg: &DeployConfig) -> Self {
        let model = &cfg.model;

        Self {
            schema: PARAMETERS_SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters: TemplateParameters {
                apim_sku: cfg.apim.sku.clone().into(),
                openai_config: cfg.openai_resources.clone().into(),
                openai_deployment_name: model.deployment_name.clone().into(),
                openai_model_name: model.name.clone().into(),
                openai_model_version: model.version.clone().into(),
                openai_model_capacity: model.capacity.into(),
                openai_model_sku: model.sku.clone().into(),
                openai_api_version: model.api_version.clone().into(),
            },
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, replacing any previous file
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;

        tracing::debug!(path = %path.display(), "Deployment parameters written");
        Ok(())
    }
}
