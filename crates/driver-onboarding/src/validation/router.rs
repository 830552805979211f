use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::coordinator::ValidationCoordinator;
use super::domain::{ApplicantPayload, RegistrationStep};
use super::registry::{ActivityReport, RegistryLookup};
use super::verdict::{RejectionReason, ValidatedField, ValidationVerdict};

/// Whether the caller wants the first violation or all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    #[default]
    First,
    All,
}

/// Body accepted by the applicant validation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantValidationRequest {
    pub step: u8,
    #[serde(default)]
    pub mode: ReportMode,
    #[serde(flatten)]
    pub payload: ApplicantPayload,
}

/// Router builder exposing the validator to the record-management service.
pub fn validation_router<L>(coordinator: Arc<ValidationCoordinator<L>>) -> Router
where
    L: RegistryLookup + 'static,
{
    Router::new()
        .route("/api/v1/validation/applicant", post(applicant_handler::<L>))
        .route("/api/validate-siret/:siret", get(siret_inquiry_handler::<L>))
        .with_state(coordinator)
}

/// Internal errors map to the server-error class, every other rejection to client error.
pub fn status_for(verdicts: &[ValidationVerdict]) -> StatusCode {
    if verdicts
        .iter()
        .any(|verdict| verdict.reason() == Some(RejectionReason::ValidationInternalError))
    {
        StatusCode::INTERNAL_SERVER_ERROR
    } else if verdicts.iter().any(|verdict| !verdict.is_accepted()) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

pub(crate) async fn applicant_handler<L>(
    State(coordinator): State<Arc<ValidationCoordinator<L>>>,
    axum::Json(request): axum::Json<ApplicantValidationRequest>,
) -> Response
where
    L: RegistryLookup + 'static,
{
    let step = match RegistrationStep::try_from(request.step) {
        Ok(step) => step,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let mode = request.mode;
    let payload = request.payload;
    let verdicts = tokio::task::spawn_blocking(move || match mode {
        ReportMode::First => vec![coordinator.validate_applicant(&payload, step)],
        ReportMode::All => coordinator.validate_all(&payload, step),
    })
    .await;

    let verdicts = match verdicts {
        Ok(verdicts) => verdicts,
        Err(err) => {
            error!(error = %err, "applicant validation task failed");
            let payload = json!({ "error": "validation task failed" });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    let status = status_for(&verdicts);
    match mode {
        ReportMode::First => {
            let verdict = verdicts
                .into_iter()
                .next()
                .unwrap_or(ValidationVerdict::Accepted);
            (status, axum::Json(verdict)).into_response()
        }
        ReportMode::All if verdicts.is_empty() => {
            (status, axum::Json(ValidationVerdict::Accepted)).into_response()
        }
        ReportMode::All => {
            let payload = json!({ "outcome": "rejected", "violations": verdicts });
            (status, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn siret_inquiry_handler<L>(
    State(coordinator): State<Arc<ValidationCoordinator<L>>>,
    Path(siret): Path<String>,
) -> Response
where
    L: RegistryLookup + 'static,
{
    let report = tokio::task::spawn_blocking(move || coordinator.lookup_activity(&siret)).await;

    match report {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => {
            error!(error = %err, "SIRET inquiry task failed");
            let report = ActivityReport {
                is_valid: false,
                is_active: false,
                message: RejectionReason::ValidationInternalError.message(ValidatedField::Siret),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(report)).into_response()
        }
    }
}
