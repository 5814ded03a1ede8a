//! The provisioning flow
//!
//! account → resource group → parameters file → deployment create → deployment show
//! → outputs. Every step runs only if the one before it succeeded; the rest are
//! recorded as skipped.

use crate::az::{AccountInfo, AzCli, CommandRunner, RunOutput};
use crate::config::DeployConfig;
use crate::console;
use crate::error::{Result, Step};
use crate::outputs::DeploymentOutputs;
use crate::parameters::DeploymentParameters;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Default)]
pub struct DeploymentReport {
    pub steps: Vec<(Step, StepStatus)>,
    pub account: Option<AccountInfo>,
    pub outputs: Option<DeploymentOutputs>,
}

impl DeploymentReport {
    pub fn status(&self, step: Step) -> Option<StepStatus> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, status)| *status)
    }

    pub fn succeeded(&self) -> bool {
        !self.steps.is_empty()
            && self
                .steps
                .iter()
                .all(|(_, status)| *status == StepStatus::Succeeded)
    }

    /// First step that did not succeed
    pub fn first_failure(&self) -> Option<Step> {
        self.steps
            .iter()
            .find(|(_, status)| *status == StepStatus::Failed)
            .map(|(step, _)| *step)
    }
}

/// Tracks whether later steps may still run
struct Progress {
    report: DeploymentReport,
    proceed: bool,
}

impl Progress {
    fn new() -> Self {
        Self {
            report: DeploymentReport::default(),
            proceed: true,
        }
    }

    fn record(&mut self, step: Step, ok: bool) {
        let status = if ok {
            StepStatus::Succeeded
        } else {
            error!(step = %step, "Step failed, skipping dependent steps");
            self.proceed = false;
            StepStatus::Failed
        };
        info!(step = %step, status = ?status, "Step finished");
        self.report.steps.push((step, status));
    }

    fn skip(&mut self, step: Step) {
        info!(step = %step, "Step skipped");
        self.report.steps.push((step, StepStatus::Skipped));
    }
}

/// Run the full provisioning flow
///
/// Step failures are captured in the report. Only a failure to launch `az` at all
/// is returned as an error.
pub async fn deploy<R: CommandRunner>(
    az: &AzCli<R>,
    cfg: &DeployConfig,
) -> Result<DeploymentReport> {
    let deployment = &cfg.deployment;
    let resource_group = deployment.resource_group_name();
    let mut progress = Progress::new();

    info!(
        deployment = %deployment.name,
        resource_group = %resource_group,
        location = %deployment.location,
        "Starting deployment"
    );

    let shown_account = az.account_show().await?;
    progress.record(Step::Account, shown_account.success);
    progress.report.account = shown_account.account;

    if progress.proceed {
        let ok = az
            .create_resource_group(&resource_group, &deployment.location)
            .await?;
        progress.record(Step::ResourceGroup, ok);
    } else {
        progress.skip(Step::ResourceGroup);
    }

    if progress.proceed {
        let params = DeploymentParameters::from_config(cfg);
        match params.write_to(&deployment.parameters_file) {
            Ok(()) => progress.record(Step::Parameters, true),
            Err(e) => {
                console::print_error(
                    &format!(
                        "Failed to write parameters to '{}'",
                        deployment.parameters_file.display()
                    ),
                    &e.to_string(),
                    None,
                );
                progress.record(Step::Parameters, false);
            }
        }
    } else {
        progress.skip(Step::Parameters);
    }

    if progress.proceed {
        let created = az
            .deployment_create(
                &deployment.name,
                &resource_group,
                &deployment.template_file,
                &deployment.parameters_file,
            )
            .await?;
        progress.record(Step::DeploymentCreate, created.success);
    } else {
        progress.skip(Step::DeploymentCreate);
    }

    let mut shown: Option<RunOutput> = None;
    if progress.proceed {
        let output = az.deployment_show(&deployment.name, &resource_group).await?;
        progress.record(Step::DeploymentShow, output.success);
        shown = Some(output);
    } else {
        progress.skip(Step::DeploymentShow);
    }

    match shown {
        Some(output) if progress.proceed && output.json_data.is_some() => {
            let outputs = DeploymentOutputs::extract(&output);
            progress.record(Step::Outputs, outputs.is_complete());
            progress.report.outputs = Some(outputs);
        }
        Some(_) if progress.proceed => progress.record(Step::Outputs, false),
        _ => progress.skip(Step::Outputs),
    }

    Ok(progress.report)
}

/// Read the outputs of an existing deployment
pub async fn fetch_outputs<R: CommandRunner>(
    az: &AzCli<R>,
    cfg: &DeployConfig,
) -> Result<Option<DeploymentOutputs>> {
    let resource_group = cfg.deployment.resource_group_name();
    let output = az
        .deployment_show(&cfg.deployment.name, &resource_group)
        .await?;

    if !output.success || output.json_data.is_none() {
        return Ok(None);
    }

    Ok(Some(DeploymentOutputs::extract(&output)))
}
