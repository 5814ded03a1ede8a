/// Integration tests for tearing down a lab deployment
mod common;

use aoai_gateway_deploy::{
    az::AzCli,
    cleanup::{self, CleanupOptions},
    config::DeployConfig,
};
use common::{ScriptedRunner, DEPLOYMENT_JSON};

const ACCOUNTS_JSON: &str = r#"[
  { "name": "openai1-abc", "location": "canadaeast", "kind": "OpenAI" },
  { "name": "openai2-abc", "location": "uksouth", "kind": "OpenAI" }
]"#;

const APIM_JSON: &str = r#"[ { "name": "apim-abc", "location": "eastasia" } ]"#;

fn full_script() -> ScriptedRunner {
    ScriptedRunner::new()
        .on(&["deployment", "group", "show"], true, DEPLOYMENT_JSON)
        .on(&["cognitiveservices", "account", "list"], true, ACCOUNTS_JSON)
        .on(&["cognitiveservices", "account", "delete"], true, "")
        .on(&["cognitiveservices", "account", "purge"], true, "")
        .on(&["apim", "list"], true, APIM_JSON)
        .on(&["apim", "delete"], true, "")
        .on(&["apim", "deletedservice", "purge"], true, "")
        .on(&["group", "delete"], true, "")
}

#[tokio::test]
async fn test_cleanup_deletes_and_purges_everything() {
    let az = AzCli::with_runner(full_script(), "az");

    let report = cleanup::cleanup(&az, &DeployConfig::default(), CleanupOptions::default())
        .await
        .unwrap();

    assert!(report.succeeded());
    assert_eq!(report.provisioning_state.as_deref(), Some("Succeeded"));
    assert_eq!(report.deleted, vec!["openai1-abc", "openai2-abc", "apim-abc"]);
    assert_eq!(report.purged, report.deleted);

    let calls = az.runner().calls();
    let purge = calls
        .iter()
        .find(|args| args[0] == "apim" && args[1] == "deletedservice")
        .unwrap();
    assert_eq!(
        purge,
        &vec!["apim", "deletedservice", "purge", "--service-name", "apim-abc", "--location", "eastasia"]
    );
    assert_eq!(
        calls.last().unwrap(),
        &vec!["group", "delete", "--name", "lab-aoai-gateway-02", "-y"]
    );
}

#[tokio::test]
async fn test_cleanup_without_purge() {
    let az = AzCli::with_runner(full_script(), "az");

    let report = cleanup::cleanup(&az, &DeployConfig::default(), CleanupOptions { purge: false })
        .await
        .unwrap();

    assert!(report.succeeded());
    assert_eq!(report.deleted.len(), 3);
    assert!(report.purged.is_empty());
    assert!(!az
        .runner()
        .calls()
        .iter()
        .any(|args| args.iter().any(|a| a == "purge")));
}

#[tokio::test]
async fn test_cleanup_stops_when_deployment_missing() {
    let runner = ScriptedRunner::new().on(&["deployment", "group", "show"], false, "");
    let az = AzCli::with_runner(runner, "az");

    let report = cleanup::cleanup(&az, &DeployConfig::default(), CleanupOptions::default())
        .await
        .unwrap();

    assert!(!report.succeeded());
    assert_eq!(report.failures, 1);
    assert!(!report.group_deleted);
    assert_eq!(az.runner().calls().len(), 1);
}

#[tokio::test]
async fn test_failed_delete_is_not_purged() {
    let runner = ScriptedRunner::new()
        .on(&["deployment", "group", "show"], true, DEPLOYMENT_JSON)
        .on(&["cognitiveservices", "account", "list"], true, ACCOUNTS_JSON)
        .on(&["cognitiveservices", "account", "delete"], false, "")
        .on(&["apim", "list"], true, "[]")
        .on(&["group", "delete"], true, "");
    let az = AzCli::with_runner(runner, "az");

    let report = cleanup::cleanup(&az, &DeployConfig::default(), CleanupOptions::default())
        .await
        .unwrap();

    assert_eq!(report.failures, 2);
    assert!(report.deleted.is_empty());
    assert!(report.group_deleted);
    assert!(!report.succeeded());
}
