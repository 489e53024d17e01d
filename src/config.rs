//! Configuration for scoring policies.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (EDITSCORE_TOKEN_EQUALITY, EDITSCORE_ENTITY_EQUALITY,
//!    EDITSCORE_AGGREGATION)
//! 3. Config file (.editscore/config.yaml)
//! 4. Defaults (strict tokens, entities by id, summed heatmap scores)
//!
//! Config file discovery:
//! - Searches current directory and parents for .editscore/config.yaml
//! - Falls back to ~/.editscore/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::ScoreAggregation;
use crate::domain::{EntityEquality, EqualityPolicy, TokenEquality};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const ENV_TOKEN_EQUALITY: &str = "EDITSCORE_TOKEN_EQUALITY";
pub const ENV_ENTITY_EQUALITY: &str = "EDITSCORE_ENTITY_EQUALITY";
pub const ENV_AGGREGATION: &str = "EDITSCORE_AGGREGATION";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub equality: EqualityConfig,
    #[serde(default)]
    pub heatmap: Option<HeatmapConfig>,
    #[serde(default)]
    pub f1: Option<F1Config>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EqualityConfig {
    pub token: Option<TokenEquality>,
    pub entity: Option<EntityEquality>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapConfig {
    pub aggregation: Option<ScoreAggregation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct F1Config {
    pub include_entities: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Equality rules for all engines
    pub policy: EqualityPolicy,
    /// Heatmap score aggregation
    pub aggregation: ScoreAggregation,
    /// Whether F1 results include entity scores
    pub include_entities: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            policy: EqualityPolicy::default(),
            aggregation: ScoreAggregation::default(),
            include_entities: true,
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents, then home
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".editscore").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(".editscore").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse a policy value from an environment variable
///
/// Accepts the CLI spelling (`pair-mean`) and the config spelling
/// (`pair_mean`), case-insensitively.
fn parse_env_value<T: ValueEnum>(name: &str, value: &str) -> Result<T> {
    <T as ValueEnum>::from_str(&value.trim().replace('_', "-"), true)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e))
}

fn env_override<T: ValueEnum>(
    env: &dyn Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>> {
    env(name)
        .map(|value| parse_env_value(name, &value))
        .transpose()
}

/// Merge a config file (if any) and environment overrides over defaults
fn resolve_config(
    config_file: Option<(PathBuf, ConfigFile)>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    if let Some((path, config)) = config_file {
        if let Some(token) = config.equality.token {
            resolved.policy.token = token;
        }
        if let Some(entity) = config.equality.entity {
            resolved.policy.entity = entity;
        }
        if let Some(aggregation) = config.heatmap.and_then(|h| h.aggregation) {
            resolved.aggregation = aggregation;
        }
        if let Some(include) = config.f1.and_then(|f| f.include_entities) {
            resolved.include_entities = include;
        }
        resolved.config_file = Some(path);
    }

    if let Some(token) = env_override(env, ENV_TOKEN_EQUALITY)? {
        resolved.policy.token = token;
    }
    if let Some(entity) = env_override(env, ENV_ENTITY_EQUALITY)? {
        resolved.policy.entity = entity;
    }
    if let Some(aggregation) = env_override(env, ENV_AGGREGATION)? {
        resolved.aggregation = aggregation;
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    resolve_config(config_file, &|name: &str| std::env::var(name).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
