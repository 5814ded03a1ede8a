//! Scripted stand-in for the `az` CLI
#![allow(dead_code)]

use aoai_gateway_deploy::az::{CommandRunner, ProcessOutput};
use aoai_gateway_deploy::config::DeployConfig;
use std::path::PathBuf;
use std::sync::Mutex;

pub struct ScriptedRunner {
    responses: Vec<(Vec<&'static str>, ProcessOutput)>,
    calls: Mutex<Vec<Vec<String>>>,
    spawn_fails: bool,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            calls: Mutex::new(Vec::new()),
            spawn_fails: false,
        }
    }

    pub fn unlaunchable() -> Self {
        Self {
            spawn_fails: true,
            ..Self::new()
        }
    }

    /// Answer any command whose arguments start with `prefix`
    pub fn on(mut self, prefix: &[&'static str], success: bool, stdout: &str) -> Self {
        self.responses.push((
            prefix.to_vec(),
            ProcessOutput {
                success,
                stdout: stdout.to_string(),
                stderr: if success {
                    String::new()
                } else {
                    format!("ERROR: {} failed", prefix.join(" "))
                },
            },
        ));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Up to three leading arguments of every call, e.g. "group show --name"
    pub fn call_heads(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|args| args.iter().take(3).cloned().collect::<Vec<_>>().join(" "))
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn execute(&self, _program: &str, args: &[String]) -> std::io::Result<ProcessOutput> {
        if self.spawn_fails {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "program not found",
            ));
        }

        self.calls.lock().unwrap().push(args.to_vec());

        let response = self.responses.iter().find(|(prefix, _)| {
            prefix.len() <= args.len() && prefix.iter().zip(args).all(|(p, a)| p == a)
        });

        Ok(match response {
            Some((_, output)) => output.clone(),
            None => ProcessOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("ERROR: unscripted command: {}", args.join(" ")),
            },
        })
    }
}

pub const ACCOUNT_JSON: &str = r#"{
  "id": "11111111-2222-3333-4444-555555555555",
  "tenantId": "tenant-abc",
  "user": { "name": "operator@contoso.com", "type": "user" }
}"#;

pub const DEPLOYMENT_JSON: &str = r#"{
  "name": "aoai-gateway-02",
  "properties": {
    "provisioningState": "Succeeded",
    "outputs": {
      "apimServiceId": { "type": "String", "value": "/subscriptions/s/resourceGroups/lab-aoai-gateway-02/providers/Microsoft.ApiManagement/service/apim-xyz" },
      "apimResourceGatewayURL": { "type": "String", "value": "https://apim-xyz.azure-api.net" },
      "apimSubscriptionKey": { "type": "SecureString", "value": "0123456789abcdef" }
    }
  }
}"#;

/// Default configuration writing its parameters file to a unique temp path
pub fn test_config() -> DeployConfig {
    let mut cfg = DeployConfig::default();
    cfg.deployment.parameters_file = temp_path("params.json");
    cfg
}

pub fn temp_path(suffix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("aoai-deploy-{}-{}", uuid::Uuid::new_v4(), suffix))
}
