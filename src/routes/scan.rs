use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::scan_dto::{RecordSummary, ScanRequest},
    error::Result,
    utils::validation::validate,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan merged into the attendance record", body = RecordSummary),
        (status = 400, description = "Malformed scan or participant id"),
        (status = 404, description = "Session not found or not scheduled"),
        (status = 503, description = "Attendance store unavailable, safe to retry")
    )
)]
#[axum::debug_handler]
pub async fn record_scan(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ScanRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    validate(&payload)?;
    let record = state.scan_service.record_scan(payload.into()).await?;
    Ok(Json(RecordSummary::from(record)))
}
