use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::sync::Arc;

use crate::engine::EngineKind;
use crate::permission::{PermissionGate, PromptPermissionGate, StaticPermissionGate};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub engine: EngineConfig,
    pub permission: PermissionConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Native library loaded once per process
    pub library: String,
    #[serde(default)]
    pub kind: EngineKind,
}

/// How permission requests are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Already granted
    Granted,
    /// Not granted; requests answered with `auto_response`
    Denied,
    /// Not granted; requests wait for an operator
    Prompt,
}

#[derive(Debug, Deserialize)]
pub struct PermissionConfig {
    pub mode: PermissionMode,
    /// Answer given to requests in `denied` mode
    #[serde(default)]
    pub auto_response: Option<bool>,
}

/// Gate built from configuration
///
/// The prompt gate is kept by its concrete type so it can be answered.
#[derive(Debug, Clone)]
pub enum ConfiguredGate {
    Static(Arc<StaticPermissionGate>),
    Prompt(Arc<PromptPermissionGate>),
}

impl ConfiguredGate {
    pub fn gate(&self) -> Arc<dyn PermissionGate> {
        match self {
            Self::Static(gate) => gate.clone(),
            Self::Prompt(gate) => gate.clone(),
        }
    }

    pub fn prompt(&self) -> Option<Arc<PromptPermissionGate>> {
        match self {
            Self::Static(_) => None,
            Self::Prompt(gate) => Some(gate.clone()),
        }
    }
}

impl PermissionConfig {
    pub fn build_gate(&self) -> Result<ConfiguredGate> {
        match (self.mode, self.auto_response) {
            (PermissionMode::Granted, _) => {
                Ok(ConfiguredGate::Static(Arc::new(StaticPermissionGate::granted())))
            }
            (PermissionMode::Denied, Some(answer)) => Ok(ConfiguredGate::Static(Arc::new(
                StaticPermissionGate::not_granted(answer),
            ))),
            (PermissionMode::Denied, None) => {
                bail!("permission.auto_response is required when permission.mode = \"denied\"")
            }
            (PermissionMode::Prompt, Some(_)) => {
                bail!("permission.auto_response cannot be combined with permission.mode = \"prompt\"")
            }
            (PermissionMode::Prompt, None) => {
                Ok(ConfiguredGate::Prompt(Arc::new(PromptPermissionGate::new())))
            }
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config {}", path))
    }
}
