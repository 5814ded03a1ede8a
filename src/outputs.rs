//! Reading values back from `az deployment group show`

use crate::az::RunOutput;
use crate::console;
use serde_json::Value;

pub const APIM_SERVICE_ID: &str = "apimServiceId";
pub const APIM_GATEWAY_URL: &str = "apimResourceGatewayURL";
pub const APIM_SUBSCRIPTION_KEY: &str = "apimSubscriptionKey";

/// Gateway coordinates published by the template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentOutputs {
    pub apim_service_id: Option<String>,
    pub apim_gateway_url: Option<String>,
    pub apim_subscription_key: Option<String>,
}

impl DeploymentOutputs {
    /// Extract and print the gateway outputs; the subscription key is always masked
    pub fn extract(output: &RunOutput) -> Self {
        Self {
            apim_service_id: get_deployment_output(output, APIM_SERVICE_ID, "APIM Service Id", false),
            apim_gateway_url: get_deployment_output(
                output,
                APIM_GATEWAY_URL,
                "APIM API Gateway URL",
                false,
            ),
            apim_subscription_key: get_deployment_output(
                output,
                APIM_SUBSCRIPTION_KEY,
                "APIM Subscription Key (masked)",
                true,
            ),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.apim_service_id.is_some()
            && self.apim_gateway_url.is_some()
            && self.apim_subscription_key.is_some()
    }
}

/// Look up `properties.outputs.<name>.value`
pub fn lookup_output(json: &Value, name: &str) -> Option<String> {
    let value = json.get("properties")?.get("outputs")?.get(name)?.get("value")?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Read one deployment output and print it under `label`
///
/// An empty label suppresses printing. With `secure` set only the last four
/// characters are shown.
pub fn get_deployment_output(
    output: &RunOutput,
    name: &str,
    label: &str,
    secure: bool,
) -> Option<String> {
    let value = output
        .json_data
        .as_ref()
        .and_then(|json| lookup_output(json, name));

    match &value {
        Some(v) if !label.is_empty() => {
            let shown = if secure {
                console::mask_secret(v)
            } else {
                v.clone()
            };
            console::print_info(&format!("{}: {}", label, shown));
        }
        Some(_) => {}
        None => {
            tracing::warn!(output = name, "Deployment output missing");
            console::print_error(
                &format!("Failed to retrieve output property: '{}'", name),
                "",
                None,
            );
        }
    }

    value
}
