//! Azure CLI invocation
//!
//! All cloud interaction goes through `az` as a child process. The process launch
//! sits behind [`CommandRunner`] so the provisioning flow can be exercised without
//! a logged-in CLI.

use crate::console;
use crate::error::{DeployError, Result};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Raw result of a finished child process
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Launches external programs
pub trait CommandRunner {
    fn execute(
        &self,
        program: &str,
        args: &[String],
    ) -> impl Future<Output = std::io::Result<ProcessOutput>> + Send;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl CommandRunner for TokioRunner {
    async fn execute(&self, program: &str, args: &[String]) -> std::io::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(ProcessOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Outcome of one CLI call
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub success: bool,
    /// stdout on success; stderr (or stdout if stderr was empty) on failure
    pub text: String,
    pub json_data: Option<Value>,
    pub elapsed: Duration,
}

impl RunOutput {
    pub fn from_process(output: ProcessOutput, elapsed: Duration) -> Self {
        let json_data = if output.success {
            parse_json(&output.stdout)
        } else {
            None
        };

        let text = if output.success || output.stderr.trim().is_empty() {
            output.stdout
        } else {
            output.stderr
        };

        Self {
            success: output.success,
            text,
            json_data,
            elapsed,
        }
    }
}

/// Parse CLI output as JSON, tolerating leading noise such as warnings
pub fn parse_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    // Warnings may themselves contain brackets, e.g. "[Preview]"
    text.match_indices(['{', '['])
        .find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&text[start..])
                .into_iter::<Value>()
                .next()
                .and_then(|value| value.ok())
        })
}

/// Identity of the signed-in `az` account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub user_name: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

impl AccountInfo {
    pub fn from_json(value: &Value) -> Option<Self> {
        Some(Self {
            user_name: value.pointer("/user/name")?.as_str()?.to_string(),
            tenant_id: value.get("tenantId")?.as_str()?.to_string(),
            subscription_id: value.get("id")?.as_str()?.to_string(),
        })
    }
}

/// Result of `az account show`
///
/// `account` is `None` when the call succeeded but the payload lacked an expected field.
#[derive(Debug, Clone, Default)]
pub struct AccountShow {
    pub success: bool,
    pub account: Option<AccountInfo>,
}

/// Typed wrapper over the `az` commands this tool issues
pub struct AzCli<R: CommandRunner> {
    runner: R,
    program: String,
}

impl AzCli<TokioRunner> {
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(TokioRunner, program)
    }
}

impl<R: CommandRunner> AzCli<R> {
    pub fn with_runner(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run one `az` command, echoing it and reporting the outcome
    ///
    /// A non-zero exit is reported through `RunOutput::success`; only a failure to
    /// launch the program at all is an `Err`.
    pub async fn run(
        &self,
        args: &[&str],
        ok_message: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<RunOutput> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let command_line = format!("{} {}", self.program, args.join(" "));

        console::print_command(&command_line);
        debug!(command = %command_line, "Launching az");

        let start = Instant::now();
        let process = self
            .runner
            .execute(&self.program, &args)
            .await
            .map_err(|source| DeployError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let output = RunOutput::from_process(process, start.elapsed());

        info!(
            command = %command_line,
            success = output.success,
            elapsed_ms = output.elapsed.as_millis() as u64,
            "az command finished"
        );

        if output.success {
            if let Some(msg) = ok_message {
                console::print_ok(msg, Some(output.elapsed));
            }
        } else if let Some(msg) = error_message {
            console::print_error(msg, &output.text, Some(output.elapsed));
        }

        Ok(output)
    }

    /// `az account show`
    ///
    /// Success follows the exit status; a payload missing fields only skips printing.
    pub async fn account_show(&self) -> Result<AccountShow> {
        let output = self
            .run(
                &["account", "show"],
                Some("Retrieved az account"),
                Some("Failed to get the current az account"),
            )
            .await?;

        if !output.success {
            return Ok(AccountShow::default());
        }

        let account = output.json_data.as_ref().and_then(AccountInfo::from_json);
        match &account {
            Some(account) => {
                console::print_info(&format!("Current user: {}", account.user_name));
                console::print_info(&format!("Tenant ID: {}", account.tenant_id));
                console::print_info(&format!("Subscription ID: {}", account.subscription_id));
            }
            None => {
                warn!("az account show returned an unexpected payload");
                console::print_warning("Unexpected output from 'az account show'");
            }
        }

        Ok(AccountShow {
            success: true,
            account,
        })
    }

    /// Ensure the resource group exists, creating it when `az group show` fails
    pub async fn create_resource_group(&self, name: &str, location: &str) -> Result<bool> {
        let existing = self.run(&["group", "show", "--name", name], None, None).await?;
        if existing.success {
            console::print_info(&format!("Using existing resource group '{}'", name));
            return Ok(true);
        }

        let created = self
            .run(
                &[
                    "group",
                    "create",
                    "--name",
                    name,
                    "--location",
                    location,
                    "--tags",
                    "source=ai-gateway",
                ],
                Some(&format!("Resource group '{}' created", name)),
                Some(&format!("Failed to create the resource group '{}'", name)),
            )
            .await?;

        Ok(created.success)
    }

    pub async fn deployment_create(
        &self,
        name: &str,
        resource_group: &str,
        template_file: &Path,
        parameters_file: &Path,
    ) -> Result<RunOutput> {
        let template = template_file.to_string_lossy();
        let parameters = parameters_file.to_string_lossy();
        let args = [
            "deployment",
            "group",
            "create",
            "--name",
            name,
            "--resource-group",
            resource_group,
            "--template-file",
            &*template,
            "--parameters",
            &*parameters,
        ];

        let output = self
            .run(
                &args,
                Some(&format!("Deployment '{}' succeeded", name)),
                Some(&format!("Deployment '{}' failed", name)),
            )
            .await?;

        Ok(output)
    }

    pub async fn deployment_show(&self, name: &str, resource_group: &str) -> Result<RunOutput> {
        self.run(
            &["deployment", "group", "show", "--name", name, "-g", resource_group],
            Some(&format!("Retrieved deployment: {}", name)),
            Some(&format!("Failed to retrieve deployment: {}", name)),
        )
        .await
    }

    pub async fn cognitive_services_list(&self, resource_group: &str) -> Result<RunOutput> {
        self.run(
            &["cognitiveservices", "account", "list", "-g", resource_group],
            Some("Listed Cognitive Services accounts"),
            Some("Failed to list Cognitive Services accounts"),
        )
        .await
    }

    pub async fn cognitive_services_delete(
        &self,
        name: &str,
        resource_group: &str,
    ) -> Result<RunOutput> {
        self.run(
            &["cognitiveservices", "account", "delete", "-g", resource_group, "-n", name],
            Some(&format!("Cognitive Services '{}' deleted", name)),
            Some(&format!("Failed to delete Cognitive Services '{}'", name)),
        )
        .await
    }

    pub async fn cognitive_services_purge(
        &self,
        name: &str,
        resource_group: &str,
        location: &str,
    ) -> Result<RunOutput> {
        self.run(
            &[
                "cognitiveservices",
                "account",
                "purge",
                "-g",
                resource_group,
                "-n",
                name,
                "-l",
                location,
            ],
            Some(&format!("Cognitive Services '{}' purged", name)),
            Some(&format!("Failed to purge Cognitive Services '{}'", name)),
        )
        .await
    }

    pub async fn apim_list(&self, resource_group: &str) -> Result<RunOutput> {
        self.run(
            &["apim", "list", "-g", resource_group],
            Some("Listed APIM resources"),
            Some("Failed to list APIM resources"),
        )
        .await
    }

    pub async fn apim_delete(&self, name: &str, resource_group: &str) -> Result<RunOutput> {
        self.run(
            &["apim", "delete", "-n", name, "-g", resource_group, "-y"],
            Some(&format!("API Management '{}' deleted", name)),
            Some(&format!("Failed to delete API Management '{}'", name)),
        )
        .await
    }

    pub async fn apim_purge(&self, name: &str, location: &str) -> Result<RunOutput> {
        self.run(
            &[
                "apim",
                "deletedservice",
                "purge",
                "--service-name",
                name,
                "--location",
                location,
            ],
            Some(&format!("API Management '{}' purged", name)),
            Some(&format!("Failed to purge API Management '{}'", name)),
        )
        .await
    }

    pub async fn group_delete(&self, resource_group: &str) -> Result<RunOutput> {
        self.run(
            &["group", "delete", "--name", resource_group, "-y"],
            Some(&format!("Resource group '{}' deleted", resource_group)),
            Some(&format!("Failed to delete resource group '{}'", resource_group)),
        )
        .await
    }
}
