use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::OfferSubmission;
use super::export::export_filename;
use super::ingest::{LeadImportError, REQUIRED_COLUMNS};
use super::intent::IntentModel;
use super::repository::QualificationStore;
use super::service::{QualificationService, QualificationServiceError};

/// Body accepted by the lead upload endpoint.
#[derive(Debug, Deserialize)]
pub struct LeadUploadRequest {
    #[serde(rename = "csvData", alias = "csv_data")]
    pub csv_data: String,
}

/// Router builder exposing offer intake, lead upload, scoring, and result export.
pub fn qualification_router<S, M>(service: Arc<QualificationService<S, M>>) -> Router
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    Router::new()
        .route("/api/v1/offer", post(create_offer_handler::<S, M>))
        .route("/api/v1/offers", get(list_offers_handler::<S, M>))
        .route("/api/v1/leads/upload", post(upload_leads_handler::<S, M>))
        .route("/api/v1/leads", get(list_leads_handler::<S, M>))
        .route("/api/v1/score", post(score_handler::<S, M>))
        .route("/api/v1/results", get(results_handler::<S, M>))
        .route("/api/v1/results/csv", get(export_csv_handler::<S, M>))
        .with_state(service)
}

const MISSING_CSV_DATA: &str =
    "Missing csvData field. Send CSV content as a string in the request body.";
const MISSING_OFFER_FIELDS: &str = "Missing required fields: name, value_props, ideal_use_cases";

fn rejection_response(message: &str, rejection: JsonRejection) -> Response {
    let payload = json!({ "error": message, "detail": rejection.body_text() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: QualificationServiceError) -> Response {
    let status = match &error {
        QualificationServiceError::Offer(_)
        | QualificationServiceError::Import(_)
        | QualificationServiceError::Scoring(_) => StatusCode::BAD_REQUEST,
        QualificationServiceError::NoResults => StatusCode::NOT_FOUND,
        QualificationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        QualificationServiceError::Import(LeadImportError::MissingColumns { found, .. }) => json!({
            "error": error.to_string(),
            "required_columns": REQUIRED_COLUMNS,
            "found_columns": found,
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_offer_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
    submission: Result<axum::Json<OfferSubmission>, JsonRejection>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    let axum::Json(submission) = match submission {
        Ok(submission) => submission,
        Err(rejection) => return rejection_response(MISSING_OFFER_FIELDS, rejection),
    };

    match service.create_offer(submission) {
        Ok(offer) => {
            let payload = json!({
                "message": "Offer created successfully",
                "offer": offer,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_offers_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    match service.offers() {
        Ok(offers) => (StatusCode::OK, axum::Json(json!({ "offers": offers }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_leads_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
    request: Result<axum::Json<LeadUploadRequest>, JsonRejection>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(MISSING_CSV_DATA, rejection),
    };

    match service.upload_leads(&request.csv_data) {
        Ok(leads) => {
            let payload = json!({
                "message": "CSV uploaded and parsed successfully",
                "leads_uploaded": leads.len(),
                "sample_lead": leads.first(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_leads_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    match service.leads() {
        Ok(leads) => {
            let payload = json!({
                "leads": leads.as_slice(),
                "total": leads.len(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    match service.score().await {
        Ok(results) => {
            let payload = json!({
                "message": "Scoring completed successfully",
                "total_leads_scored": results.len(),
                "results": results,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    match service.results() {
        Ok(results) => {
            let payload = json!({
                "results": results.as_slice(),
                "total_scored": results.len(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_csv_handler<S, M>(
    State(service): State<Arc<QualificationService<S, M>>>,
) -> Response
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    match service.export_csv() {
        Ok(csv) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_filename(Utc::now().date_naive())
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime::TEXT_CSV.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}
