//! Tear-down of a lab deployment
//!
//! Cognitive Services accounts and APIM services are soft-deleted by Azure, so they
//! are deleted and purged one by one before the resource group goes away. Otherwise
//! a redeploy with the same names fails.

use crate::az::{AzCli, CommandRunner};
use crate::config::DeployConfig;
use crate::console;
use crate::error::Result;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct CleanupOptions {
    pub purge: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self { purge: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub provisioning_state: Option<String>,
    pub deleted: Vec<String>,
    pub purged: Vec<String>,
    pub failures: usize,
    pub group_deleted: bool,
}

impl CleanupReport {
    pub fn succeeded(&self) -> bool {
        self.failures == 0 && self.group_deleted
    }
}

/// Name and location of a listed resource
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListedResource {
    name: String,
    location: String,
}

fn listed_resources(json: Option<&Value>) -> Vec<ListedResource> {
    json.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(ListedResource {
                        name: item.get("name")?.as_str()?.to_string(),
                        location: item.get("location")?.as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub async fn cleanup<R: CommandRunner>(
    az: &AzCli<R>,
    cfg: &DeployConfig,
    options: CleanupOptions,
) -> Result<CleanupReport> {
    let deployment = &cfg.deployment.name;
    let resource_group = cfg.deployment.resource_group_name();
    let mut report = CleanupReport::default();

    info!(deployment = %deployment, resource_group = %resource_group, purge = options.purge, "Starting cleanup");

    let shown = az.deployment_show(deployment, &resource_group).await?;
    if !shown.success {
        report.failures += 1;
        return Ok(report);
    }

    report.provisioning_state = shown
        .json_data
        .as_ref()
        .and_then(|json| json.pointer("/properties/provisioningState"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(state) = &report.provisioning_state {
        console::print_info(&format!("Deployment provisioning state: {}", state));
    }

    let accounts = az.cognitive_services_list(&resource_group).await?;
    if accounts.success {
        for resource in listed_resources(accounts.json_data.as_ref()) {
            console::print_info(&format!(
                "Deleting and purging Cognitive Service Account '{}' in resource group '{}'...",
                resource.name, resource_group
            ));
            let deleted = az
                .cognitive_services_delete(&resource.name, &resource_group)
                .await?;
            if !deleted.success {
                report.failures += 1;
                continue;
            }
            report.deleted.push(resource.name.clone());

            if options.purge {
                let purged = az
                    .cognitive_services_purge(&resource.name, &resource_group, &resource.location)
                    .await?;
                if purged.success {
                    report.purged.push(resource.name);
                } else {
                    report.failures += 1;
                }
            }
        }
    } else {
        report.failures += 1;
    }

    let services = az.apim_list(&resource_group).await?;
    if services.success {
        for resource in listed_resources(services.json_data.as_ref()) {
            console::print_info(&format!(
                "Deleting and purging API Management '{}' in resource group '{}'...",
                resource.name, resource_group
            ));
            let deleted = az.apim_delete(&resource.name, &resource_group).await?;
            if !deleted.success {
                report.failures += 1;
                continue;
            }
            report.deleted.push(resource.name.clone());

            if options.purge {
                let purged = az.apim_purge(&resource.name, &resource.location).await?;
                if purged.success {
                    report.purged.push(resource.name);
                } else {
                    report.failures += 1;
                }
            }
        }
    } else {
        report.failures += 1;
    }

    console::print_info(&format!("Deleting resource group '{}'...", resource_group));
    let group = az.group_delete(&resource_group).await?;
    report.group_deleted = group.success;
    if !group.success {
        report.failures += 1;
    }

    info!(
        deleted = report.deleted.len(),
        purged = report.purged.len(),
        failures = report.failures,
        "Cleanup finished"
    );

    Ok(report)
}
