use std::fmt;
use thiserror::Error;

/// Pipeline step identifiers, used in reports and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Account,
    ResourceGroup,
    Parameters,
    DeploymentCreate,
    DeploymentShow,
    Outputs,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::ResourceGroup => "resource_group",
            Self::Parameters => "parameters",
            Self::DeploymentCreate => "deployment_create",
            Self::DeploymentShow => "deployment_show",
            Self::Outputs => "outputs",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external CLI could not be launched at all
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A step reported failure through its exit status
    #[error("Step '{step}' failed")]
    StepFailed { step: Step },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for DeployError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DeployError::StepFailed {
            step: Step::DeploymentCreate,
        };
        assert_eq!(error.to_string(), "Step 'deployment_create' failed");

        let error = DeployError::Config("no resources".to_string());
        assert_eq!(error.to_string(), "Configuration error: no resources");
    }

    #[test]
    fn test_spawn_error_names_program() {
        let error = DeployError::Spawn {
            program: "az".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(error.to_string().starts_with("Failed to launch 'az'"));
    }
}
