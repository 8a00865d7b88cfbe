use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DeveloperSummary, JobRequirement};
use super::error::AllocationError;
use super::proposal::ProposeMatch;
use super::service::{AllocationService, BulkProposalRequest, PoolQuery};
use super::source::{CandidateSource, SourceError};

/// Router builder exposing the pool browser contract over HTTP.
pub fn allocation_router<S, P>(service: Arc<AllocationService<S, P>>) -> Router
where
    S: CandidateSource + 'static,
    P: ProposeMatch + 'static,
{
    Router::new()
        .route("/api/v1/allocation/score", post(score_handler::<S, P>))
        .route("/api/v1/allocation/pool", post(pool_handler::<S, P>))
        .route("/api/v1/allocation/proposals", post(proposal_handler::<S, P>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) developer: DeveloperSummary,
    pub(crate) requirement: JobRequirement,
}

pub(crate) async fn score_handler<S, P>(
    State(service): State<Arc<AllocationService<S, P>>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    S: CandidateSource + 'static,
    P: ProposeMatch + 'static,
{
    let result = service.score(&request.developer, &request.requirement);
    let payload = json!({
        "developer_id": request.developer.id,
        "score": result.score,
        "tier": result.tier().label(),
        "matching_skills": result.matching_skills,
        "components": result.components,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn pool_handler<S, P>(
    State(service): State<Arc<AllocationService<S, P>>>,
    Json(query): Json<PoolQuery>,
) -> Response
where
    S: CandidateSource + 'static,
    P: ProposeMatch + 'static,
{
    match service.browse(query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn proposal_handler<S, P>(
    State(service): State<Arc<AllocationService<S, P>>>,
    Json(request): Json<BulkProposalRequest>,
) -> Response
where
    S: CandidateSource + 'static,
    P: ProposeMatch + 'static,
{
    match service.propose(request).await {
        Ok(report) => {
            let payload = json!({
                "requirement_id": report.requirement_id,
                "proposed": report.succeeded(),
                "failed": report.failed(),
                "results": report.results,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AllocationError) -> Response {
    let status = match &error {
        AllocationError::Source(SourceError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        AllocationError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        AllocationError::Schedule(_)
        | AllocationError::RateEdit(_)
        | AllocationError::EmptySelection
        | AllocationError::UnknownDeveloper(_)
        | AllocationError::RequirementMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
