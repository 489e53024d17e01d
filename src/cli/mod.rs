//! Command-line interface for editscore.
//!
//! Provides commands for building token heatmaps, F1 scores, Jaccard
//! indices and tag similarity from JSON requests, and for showing the
//! resolved configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::config::{self, ResolvedConfig};
use crate::core::ScoreAggregation;
use crate::domain::{EntityEquality, TokenEquality};

pub mod handlers;

/// editscore - Agreement and quality scores for annotated document edits
#[derive(Parser, Debug)]
#[command(name = "editscore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configured scoring policies
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// How tokens are compared
    #[arg(long, value_enum, global = true)]
    pub token_equality: Option<TokenEquality>,

    /// How entities are compared
    #[arg(long, value_enum, global = true)]
    pub entity_equality: Option<EntityEquality>,

    /// How heatmap contributions are folded into a token score
    #[arg(long, value_enum, global = true)]
    pub aggregation: Option<ScoreAggregation>,
}

impl PolicyArgs {
    /// Apply flags on top of a resolved configuration
    pub fn apply(&self, mut config: ResolvedConfig) -> ResolvedConfig {
        if let Some(token) = self.token_equality {
            config.policy.token = token;
        }
        if let Some(entity) = self.entity_equality {
            config.policy.entity = entity;
        }
        if let Some(aggregation) = self.aggregation {
            config.aggregation = aggregation;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score each token by how differently the edits annotate it
    Heatmap {
        /// JSON array of edits (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// F1 scores of a predicted edit against a reference edit
    F1 {
        /// JSON object {"actual": ..., "predicted": ...} (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Leave out entity-level scores
        #[arg(long)]
        no_entities: bool,
    },

    /// Jaccard indices across two or more edits
    Jaccard {
        /// JSON array of edits (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Overlap of the mention tags used by two edits
    Similarity {
        /// JSON object {"doc_edit1": ..., "doc_edit2": ...} (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Heatmap { .. } => "heatmap",
            Commands::F1 { .. } => "f1",
            Commands::Jaccard { .. } => "jaccard",
            Commands::Similarity { .. } => "similarity",
            Commands::Config => "config",
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = self.policy.apply(config::config()?.clone());
        let span = info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            command = self.command.name()
        );

        self.run(config).instrument(span).await
    }

    async fn run(self, mut config: ResolvedConfig) -> Result<()> {
        let pretty = self.pretty;

        match self.command {
            Commands::Heatmap { input } => {
                let body = read_input(input).await?;
                print_json(&handlers::heatmap(&body, &config)?, pretty)
            }
            Commands::F1 { input, no_entities } => {
                if no_entities {
                    config.include_entities = false;
                }
                let body = read_input(input).await?;
                print_json(&handlers::f1(&body, &config)?, pretty)
            }
            Commands::Jaccard { input } => {
                let body = read_input(input).await?;
                print_json(&handlers::jaccard(&body, &config)?, pretty)
            }
            Commands::Similarity { input } => {
                let body = read_input(input).await?;
                print_json(&handlers::similarity(&body, &config)?, pretty)
            }
            Commands::Config => show_config(&config),
        }
    }
}

/// Read a request body from a file, or from stdin
async fn read_input(input: Option<PathBuf>) -> Result<String> {
    let body = if let Some(path) = input {
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read from stdin")?;
        buffer
    };

    if body.trim().is_empty() {
        anyhow::bail!("Input is empty");
    }

    Ok(body)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize result")?;

    println!("{}", json);
    Ok(())
}

/// Show the resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("editscore Configuration");
    println!("=======================");
    println!();
    match &config.config_file {
        Some(path) => println!("Config file:      {}", path.display()),
        None => println!("Config file:      (none, using defaults)"),
    }
    println!("Token equality:   {:?}", config.policy.token);
    println!("Entity equality:  {:?}", config.policy.entity);
    println!("Aggregation:      {:?}", config.aggregation);
    println!("F1 entity scores: {}", config.include_entities);
    Ok(())
}
