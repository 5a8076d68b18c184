use std::collections::BTreeMap;
use std::io::Cursor;

use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::analysis::domain::ScoredEntity;
use crate::analysis::framework::ScoringFramework;
use crate::analysis::ingest::MetricTableImporter;
use crate::analysis::report::views::{AnalysisInsights, AnalysisSummary};
use crate::analysis::report::AnalysisReport;
use crate::analysis::scoring::{NoEstimator, ScoringEngine};
use crate::analysis::taxonomy::Taxonomy;
use crate::error::AppError;

/// Router builder exposing the scoring endpoint. Stateless, so it mounts
/// into any application router.
pub fn analysis_router() -> Router {
    Router::new().route("/api/v1/analysis/score", post(score_handler))
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// Long-format metric table, same shape as the CLI's `--metrics` file.
    pub metrics_csv: String,
    /// Framework override; omitted requests score against the standard one.
    #[serde(default)]
    pub framework: Option<ScoringFramework>,
    /// Dish-to-cuisine rollup override as a plain name map.
    #[serde(default)]
    pub taxonomy: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub include_entities: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub schema_version: u32,
    pub summary: AnalysisSummary,
    pub insights: AnalysisInsights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<ScoredEntity>>,
}

pub async fn score_handler(
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoreRequest {
        metrics_csv,
        framework,
        taxonomy,
        include_entities,
    } = payload;

    let framework = framework.unwrap_or_else(ScoringFramework::standard);
    let taxonomy = taxonomy.map(Taxonomy::new).unwrap_or_else(Taxonomy::standard);

    let entities =
        MetricTableImporter::from_reader(Cursor::new(metrics_csv.into_bytes()), &taxonomy)?;
    let engine = ScoringEngine::new(framework)?;
    let run = engine.score_all(&entities, &NoEstimator)?;

    let report = AnalysisReport::new(run);
    let summary = report.summary();
    let insights = summary.insights();
    let entities = include_entities.then(|| report.run().scored.clone());

    Ok(Json(ScoreResponse {
        schema_version: engine.framework().schema_version,
        summary,
        insights,
        entities,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: &str = "Entity,Kind,Metric,Value,Source,Extracted On\n\
Katsu Curry,dish,Orders Per Zone,50,snowflake,2026-07-01\n\
Katsu Curry,dish,Latent Demand,90,survey,2026-06-12\n\
Pad Thai,dish,Orders Per Zone,30,snowflake,2026-07-01\n\
Pad Thai,dish,Latent Demand,70,survey,2026-06-12\n";

    #[tokio::test]
    async fn score_endpoint_returns_a_summary_without_entities_by_default() {
        let request = ScoreRequest {
            metrics_csv: METRICS.to_string(),
            framework: None,
            taxonomy: None,
            include_entities: false,
        };

        let Json(body) = score_handler(Json(request)).await.expect("run scores");

        assert_eq!(body.schema_version, 3);
        assert_eq!(body.summary.total_scored, 2);
        assert!(body.entities.is_none());
        assert_eq!(body.summary.rankings[0].entity, "katsu curry");
    }

    #[tokio::test]
    async fn score_endpoint_can_include_full_records() {
        let request = ScoreRequest {
            metrics_csv: METRICS.to_string(),
            framework: None,
            taxonomy: None,
            include_entities: true,
        };

        let Json(body) = score_handler(Json(request)).await.expect("run scores");

        let entities = body.entities.expect("records included");
        assert_eq!(entities.len(), 2);
        assert!(entities.iter().all(|record| !record.partial));
    }

    #[tokio::test]
    async fn invalid_framework_overrides_are_rejected() {
        let mut framework = ScoringFramework::standard();
        framework.tracks[0].weight = 0.9;

        let request = ScoreRequest {
            metrics_csv: METRICS.to_string(),
            framework: Some(framework),
            taxonomy: None,
            include_entities: false,
        };

        assert!(score_handler(Json(request)).await.is_err());
    }
}
