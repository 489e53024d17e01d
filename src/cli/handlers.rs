//! Request handlers behind the CLI commands.
//!
//! Each handler takes a raw JSON request body, resolves it into typed
//! edits, runs one engine and returns its plain result value. Printing is
//! left to the caller.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::core::{
    tag_similarity, F1Engine, Heatmap, HeatmapEngine, JaccardEngine, JaccardResult, ScoreResult,
    SimilarityResult,
};
use crate::domain::{resolve_edits, EditRecord, F1Request, SimilarityRequest};
use crate::error::ComparisonError;

/// Attach the error kind so callers can tell rejections apart
fn rejected(err: ComparisonError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("Comparison rejected ({})", kind))
}

fn parse<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).with_context(|| format!("Failed to parse {} request", what))
}

/// Token heatmap over a JSON array of edits
pub fn heatmap(body: &str, config: &ResolvedConfig) -> Result<Heatmap> {
    let records: Vec<EditRecord> = parse(body, "heatmap")?;
    let edits = resolve_edits(records, config.policy).map_err(rejected)?;

    let heatmap = HeatmapEngine::new(config.policy, config.aggregation)
        .create_heatmap(&edits)
        .map_err(rejected)?;

    info!(
        edits = edits.len(),
        divergent_tokens = heatmap.divergent().count(),
        "Heatmap computed"
    );
    Ok(heatmap)
}

/// F1 scores for an `{actual, predicted}` request
pub fn f1(body: &str, config: &ResolvedConfig) -> Result<ScoreResult> {
    let request: F1Request = parse(body, "f1")?;
    let (actual, predicted) = request.resolve(config.policy).map_err(rejected)?;

    let score = F1Engine::new(config.policy, config.include_entities)
        .calc_score(&actual, &predicted)
        .map_err(rejected)?;

    info!(mention_score = score.mention_score, "F1 computed");
    Ok(score)
}

/// Jaccard indices over a JSON array of edits
pub fn jaccard(body: &str, config: &ResolvedConfig) -> Result<JaccardResult> {
    let records: Vec<EditRecord> = parse(body, "jaccard")?;
    let edits = resolve_edits(records, config.policy).map_err(rejected)?;

    let result = JaccardEngine::new(config.policy)
        .calculate(&edits)
        .map_err(rejected)?;

    info!(
        edits = edits.len(),
        combined_index = result.combined.combined_index,
        "Jaccard computed"
    );
    Ok(result)
}

/// Tag vocabulary similarity for a `{doc_edit1, doc_edit2}` request
pub fn similarity(body: &str, config: &ResolvedConfig) -> Result<SimilarityResult> {
    let request: SimilarityRequest = parse(body, "similarity")?;
    let (a, b) = request.resolve(config.policy).map_err(rejected)?;
    Ok(tag_similarity(&a, &b))
}
