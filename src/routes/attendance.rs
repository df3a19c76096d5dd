use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        attendance_dto::{ParticipantAttendanceResponse, SessionAttendanceResponse},
        scan_dto::RecordSummary,
    },
    error::Result,
    models::attendance::RecordState,
    utils::validation,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/attendance/sessions/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Attendance records for the session", body = SessionAttendanceResponse),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn session_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse> {
    let (session, records) = state
        .completion_service
        .session_records(session_id.trim())
        .await?;

    let count = |wanted: RecordState| records.iter().filter(|r| r.state() == wanted).count();
    let complete = count(RecordState::Complete);
    let checked_in = count(RecordState::CheckedIn) + complete;
    let checked_out = count(RecordState::CheckedOut) + complete;

    Ok(Json(SessionAttendanceResponse {
        session,
        checked_in,
        checked_out,
        complete,
        records: records.into_iter().map(RecordSummary::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/participants/{participant_id}",
    params(
        ("participant_id" = String, Path, description = "Participant identifier")
    ),
    responses(
        (status = 200, description = "Records and completion of one participant", body = ParticipantAttendanceResponse),
        (status = 400, description = "Malformed participant id")
    )
)]
#[axum::debug_handler]
pub async fn participant_attendance(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Result<impl IntoResponse> {
    let participant_id = validation::participant_id(&participant_id)?;
    let (status, records) = state
        .completion_service
        .participant_records(&participant_id)
        .await?;

    Ok(Json(ParticipantAttendanceResponse {
        participant_id,
        status,
        records: records.into_iter().map(RecordSummary::from).collect(),
    }))
}
