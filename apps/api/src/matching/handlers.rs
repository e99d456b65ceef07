use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::breakdown::MatchBreakdown;
use crate::matching::engine::JobPosting;
use crate::matching::profile::CandidateProfile;
use crate::matching::ranking::{RankOptions, RankedJob};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub candidate: Option<CandidateProfile>,
    #[serde(default)]
    pub job: Option<JobPosting>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub candidate: CandidateProfile,
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub min_score: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub results: Vec<RankedJob>,
    pub auto_apply_threshold: u32,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchBreakdown>, AppError> {
    let breakdown = state
        .engine
        .compute_match(req.candidate.as_ref(), req.job.as_ref());
    info!(
        total = breakdown.total,
        matched = breakdown.matched_skills.len(),
        missing = breakdown.missing_skills.len(),
        "Computed match"
    );
    Ok(Json(breakdown))
}

/// POST /api/v1/match/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    if req.jobs.is_empty() {
        return Err(AppError::Validation("jobs must not be empty".to_string()));
    }
    let max = state.config.max_batch_size;
    if req.jobs.len() > max {
        return Err(AppError::Validation(format!(
            "at most {max} jobs can be ranked per request, got {}",
            req.jobs.len()
        )));
    }
    if req.min_score.is_some_and(|s| s > 100) {
        return Err(AppError::Validation(
            "min_score must be between 0 and 100".to_string(),
        ));
    }

    let options = RankOptions {
        min_score: req.min_score,
        auto_apply_threshold: state.config.auto_apply_threshold,
    };
    let job_count = req.jobs.len();
    let engine = state.engine.clone();
    // Scoring is CPU-bound; keep it off the async workers.
    let results = tokio::task::spawn_blocking(move || {
        engine.rank_jobs(&req.candidate, &req.jobs, &options)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("ranking task failed")))?;

    info!(
        jobs = job_count,
        returned = results.len(),
        auto_apply = results.iter().filter(|r| r.auto_apply).count(),
        "Ranked jobs"
    );
    Ok(Json(RankResponse {
        results,
        auto_apply_threshold: options.auto_apply_threshold,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::matching::{MatchConfig, MatchEngine};
    use crate::routes::build_router;
    use crate::state::AppState;

    fn state(max_batch_size: usize) -> AppState {
        AppState {
            config: Config {
                port: 0,
                rust_log: "info".to_string(),
                match_config_path: None,
                auto_apply_threshold: 70,
                max_batch_size,
            },
            engine: Arc::new(
                MatchEngine::new(MatchConfig {
                    reference_year: Some(2024),
                    ..MatchConfig::default()
                })
                .unwrap(),
            ),
        }
    }

    async fn post(state: AppState, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_match_endpoint_returns_breakdown() {
        let (status, body) = post(
            state(10),
            "/api/v1/match",
            json!({
                "candidate": {
                    "skills": "Python, SQL",
                    "experience": "Senior Software Engineer at Foo, 2015-2023"
                },
                "job": {
                    "title": "Senior Software Engineer",
                    "description": "Python and SQL. 5+ years."
                }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["titleMatch"], 20);
        assert_eq!(body["matchedSkills"], json!(["Python", "SQL"]));
        assert!(body["total"].as_u64().unwrap() <= 100);
    }

    #[tokio::test]
    async fn test_match_endpoint_accepts_experience_with_cv_alias() {
        let (status, body) = post(
            state(10),
            "/api/v1/match",
            json!({
                "candidate": {
                    "experience": "Senior Software Engineer at Foo",
                    "cv": "Pastry chef"
                },
                "job": { "title": "Senior Software Engineer", "description": "Python" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["titleMatch"], 20);
    }

    #[tokio::test]
    async fn test_match_endpoint_missing_job_scores_zero() {
        let (status, body) = post(
            state(10),
            "/api/v1/match",
            json!({ "candidate": { "skills": ["Rust"] } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["details"], json!([]));
    }

    #[tokio::test]
    async fn test_rank_endpoint_orders_results() {
        let (status, body) = post(
            state(10),
            "/api/v1/match/rank",
            json!({
                "candidate": {
                    "skills": ["Python", "Kubernetes"],
                    "experience": "Senior Software Engineer, 2015-2023. Python on Kubernetes."
                },
                "jobs": [
                    { "title": "Pastry Chef", "description": "Bread" },
                    { "title": "Senior Software Engineer", "description": "Python on Kubernetes" }
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["auto_apply_threshold"], 70);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["index"], 1);
        assert_eq!(results[0]["title"], "Senior Software Engineer");
        assert!(results[0]["gap_summary"].is_string());
    }

    #[tokio::test]
    async fn test_rank_endpoint_rejects_empty_jobs() {
        let (status, body) = post(
            state(10),
            "/api/v1/match/rank",
            json!({ "candidate": {}, "jobs": [] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_rank_endpoint_rejects_oversized_batch() {
        let jobs: Vec<Value> = (0..3).map(|_| json!({ "title": "Engineer" })).collect();
        let (status, body) = post(
            state(2),
            "/api/v1/match/rank",
            json!({ "candidate": {}, "jobs": jobs }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("at most 2"));
    }
}
