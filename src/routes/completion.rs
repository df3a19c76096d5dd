use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::completion_dto::{CompletionQuery, CompletionResponse, ReportQuery},
    error::Result,
    services::report_service::ReportPage,
    utils::validation,
    AppState,
};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 500;

#[utoipa::path(
    get,
    path = "/api/completion",
    params(
        ("participantId" = String, Query, description = "Participant identifier")
    ),
    responses(
        (status = 200, description = "Completion status of one participant", body = CompletionResponse),
        (status = 400, description = "Malformed participant id")
    )
)]
#[axum::debug_handler]
pub async fn get_completion(
    State(state): State<AppState>,
    query: std::result::Result<Query<CompletionQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let participant_id = validation::participant_id(&query.participant_id)?;
    let status = state
        .completion_service
        .compute_for_participant(&participant_id)
        .await?;
    Ok(Json(CompletionResponse {
        participant_id,
        status,
    }))
}

#[utoipa::path(
    get,
    path = "/api/completion/report",
    params(
        ("onlyFullyComplete" = Option<bool>, Query, description = "Keep only fully complete participants"),
        ("page" = Option<usize>, Query, description = "1-based page number"),
        ("pageSize" = Option<usize>, Query, description = "Rows per page")
    ),
    responses(
        (status = 200, description = "One page of the ordered completion report", body = ReportPage)
    )
)]
#[axum::debug_handler]
pub async fn get_report(
    State(state): State<AppState>,
    query: std::result::Result<Query<ReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let report = state.report_service.generate(query.filter()).await?;
    Ok(Json(report.page(page, page_size)))
}
