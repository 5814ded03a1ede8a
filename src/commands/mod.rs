//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - deploy: Provision the gateway end to end
//! - params: Render the deployment parameters document
//! - account: Show the signed-in az account
//! - outputs: Print outputs of an existing deployment
//! - cleanup: Tear down the lab resource group
//! - config: Configuration display and validation

pub mod account;
pub mod cleanup;
pub mod config;
pub mod deploy;
pub mod outputs;
pub mod params;
