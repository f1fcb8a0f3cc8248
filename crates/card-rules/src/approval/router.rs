use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::allowlist::ApprovedPhoneStore;
use super::domain::{Applicant, Status};
use super::risk::RiskScorer;
use super::service::ApprovalService;

/// Router builder exposing the decision endpoint.
pub fn approval_router<S, R>(service: Arc<ApprovalService<S, R>>) -> Router
where
    S: ApprovedPhoneStore + 'static,
    R: RiskScorer + 'static,
{
    Router::new()
        .route("/api/v1/applications/process", post(process_handler::<S, R>))
        .with_state(service)
}

pub(crate) async fn process_handler<S, R>(
    State(service): State<Arc<ApprovalService<S, R>>>,
    axum::Json(applicant): axum::Json<Applicant>,
) -> Response
where
    S: ApprovedPhoneStore + 'static,
    R: RiskScorer + 'static,
{
    // The exposure flag must be explicit; its absence is a request defect,
    // not a rule outcome.
    if applicant.politically_exposed.is_none() {
        let payload = json!({ "status": Status::Declined.label() });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    let decision = service.decide(&applicant).await;
    (StatusCode::OK, axum::Json(decision)).into_response()
}
