use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::attendance_dto::CatalogResponse,
    error::Result,
    models::session::{group_by_day, required_session_ids},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "Session catalog grouped by day", body = CatalogResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_sessions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sessions = state.completion_service.sessions().await?;
    Ok(Json(CatalogResponse {
        total_required_count: required_session_ids(&sessions).len(),
        days: group_by_day(&sessions),
    }))
}
