use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::dto::{
    attendance_dto::{CatalogResponse, ParticipantAttendanceResponse, SessionAttendanceResponse},
    completion_dto::CompletionResponse,
    scan_dto::{RecordSummary, ScanRequest},
};
use crate::models::{
    attendance::{RecordState, ScanKind},
    completion::CompletionStatus,
    session::{ScheduleDay, SessionDefinition},
};
use crate::services::report_service::{ReportPage, ReportRow};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::scan::record_scan,
        crate::routes::completion::get_completion,
        crate::routes::completion::get_report,
        crate::routes::export::export_report,
        crate::routes::attendance::session_attendance,
        crate::routes::attendance::participant_attendance,
        crate::routes::catalog::list_sessions,
    ),
    components(schemas(
        ScanRequest,
        ScanKind,
        RecordSummary,
        RecordState,
        CompletionStatus,
        CompletionResponse,
        ReportRow,
        ReportPage,
        CatalogResponse,
        ScheduleDay,
        SessionDefinition,
        SessionAttendanceResponse,
        ParticipantAttendanceResponse,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
