use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use dinneroo_insights::analysis::framework::ScoringFramework;
use dinneroo_insights::analysis::ingest::MetricTableImporter;
use dinneroo_insights::analysis::report::views::{AnalysisInsights, AnalysisSummary};
use dinneroo_insights::analysis::report::AnalysisReport;
use dinneroo_insights::analysis::router::score_handler;
use dinneroo_insights::analysis::scoring::{NoEstimator, ScoringEngine};
use dinneroo_insights::analysis::taxonomy::Taxonomy;
use dinneroo_insights::analysis::ScoredEntity;
use dinneroo_insights::config::AppConfig;
use dinneroo_insights::error::AppError;
use dinneroo_insights::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Dinneroo Insights",
    about = "Score and rank dishes, zones, and cuisines for the Dinneroo analysis pipeline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run scoring analyses from the command line
    Analysis {
        #[command(subcommand)]
        command: AnalysisCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum AnalysisCommand {
    /// Score a metric table and render the ranked report
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Long-format metric table CSV (entity, kind, metric, value, source)
    #[arg(long)]
    metrics: PathBuf,
    /// Scoring framework JSON; falls back to APP_FRAMEWORK, then the
    /// built-in standard framework
    #[arg(long)]
    framework: Option<PathBuf>,
    /// Dish-to-cuisine taxonomy JSON; falls back to APP_TAXONOMY, then the
    /// built-in rollup
    #[arg(long)]
    taxonomy: Option<PathBuf>,
    /// Include the full per-entity factor breakdown in the output
    #[arg(long)]
    list_entities: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Analysis {
            command: AnalysisCommand::Score(args),
        } => run_score(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/analysis/score", post(score_handler))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "zone analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        metrics,
        framework,
        taxonomy,
        list_entities,
    } = args;

    let config = AppConfig::load()?;

    let framework = match framework.or(config.analysis.framework_path) {
        Some(path) => ScoringFramework::from_path(path)?,
        None => ScoringFramework::standard(),
    };
    let taxonomy = match taxonomy.or(config.analysis.taxonomy_path) {
        Some(path) => Taxonomy::from_path(path)?,
        None => Taxonomy::standard(),
    };

    let entities = MetricTableImporter::from_path(metrics, &taxonomy)?;
    let engine = ScoringEngine::new(framework)?;
    let run = engine.score_all(&entities, &NoEstimator)?;
    let report = AnalysisReport::new(run);

    let summary = report.summary();
    let insights = summary.insights();
    render_score_report(&summary, &insights);

    if list_entities {
        render_entity_breakdown(&report.run().scored);
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_score_report(summary: &AnalysisSummary, insights: &AnalysisInsights) {
    println!("Dinneroo zone analysis");
    println!(
        "Scored {} entities ({} skipped for missing data)",
        summary.total_scored, summary.skipped
    );

    println!("\nTier distribution");
    for entry in &summary.tier_distribution {
        println!("- {}: {} entities", entry.label, entry.count);
    }

    if !summary.quadrant_distribution.is_empty() {
        println!("\nQuadrant distribution");
        for entry in &summary.quadrant_distribution {
            println!("- {}: {} entities", entry.label, entry.count);
        }
    }

    println!("\nEvidence levels");
    for entry in &summary.evidence_distribution {
        println!("- {}: {} entities", entry.level_label, entry.count);
    }

    println!("\nRankings");
    for view in &summary.rankings {
        let quadrant_note = match &view.quadrant {
            Some(quadrant) => format!(", quadrant {quadrant}"),
            None => String::new(),
        };
        let partial_note = if view.partial { " (partial)" } else { "" };
        println!(
            "{:>3}. {} [{}] composite {:.2}, tier {}{}, evidence {}{}",
            view.rank,
            view.entity,
            view.kind_label,
            view.composite,
            view.tier,
            quadrant_note,
            view.evidence_label,
            partial_note
        );
    }

    if !insights.observations.is_empty() {
        println!("\nObservations");
        for line in &insights.observations {
            println!("- {line}");
        }
    }

    if !insights.recommended_actions.is_empty() {
        println!("\nRecommended actions");
        for line in &insights.recommended_actions {
            println!("- {line}");
        }
    }

    if !insights.watchlist.is_empty() {
        println!("\nWatchlist");
        for line in &insights.watchlist {
            println!("- {line}");
        }
    }
}

fn render_entity_breakdown(scored: &[ScoredEntity]) {
    println!("\nFactor breakdown by entity");
    for record in scored {
        let cuisine_note = match &record.cuisine {
            Some(cuisine) => format!(" ({cuisine})"),
            None => String::new(),
        };
        println!("- {}{}", record.entity.as_str(), cuisine_note);
        for factor in &record.factor_scores {
            let provenance = if factor.measured {
                factor.source.label().to_string()
            } else {
                format!("estimated, {}", factor.source.label())
            };
            println!(
                "    {} = {} (raw {:.2}, population {}, {})",
                factor.factor, factor.score, factor.raw, factor.population, provenance
            );
        }
        for (track, subtotal) in &record.track_breakdown {
            println!("    {track} subtotal {subtotal:.2}");
        }
    }
}
