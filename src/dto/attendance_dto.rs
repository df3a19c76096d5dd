use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::scan_dto::RecordSummary;
use crate::models::completion::CompletionStatus;
use crate::models::session::{ScheduleDay, SessionDefinition};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub total_required_count: usize,
    pub days: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttendanceResponse {
    pub session: SessionDefinition,
    pub checked_in: usize,
    pub checked_out: usize,
    pub complete: usize,
    pub records: Vec<RecordSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantAttendanceResponse {
    pub participant_id: String,
    pub status: CompletionStatus,
    pub records: Vec<RecordSummary>,
}
