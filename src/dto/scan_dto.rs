use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::attendance::{AttendanceRecord, RecordState, ScanKind};
use crate::models::participant::DisplayFields;
use crate::services::scan_service::ScanCommand;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    #[serde(alias = "participant_id")]
    #[validate(length(min = 1, max = 128))]
    pub participant_id: String,
    #[serde(alias = "session_id")]
    #[validate(length(min = 1, max = 128))]
    pub session_id: String,
    #[serde(alias = "scan_kind")]
    pub scan_kind: ScanKind,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    #[validate(length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub affiliation: Option<String>,
}

impl From<ScanRequest> for ScanCommand {
    fn from(value: ScanRequest) -> Self {
        Self {
            participant_id: value.participant_id,
            session_id: value.session_id,
            scan_kind: value.scan_kind,
            claimed: DisplayFields {
                full_name: value.full_name,
                email: value.email,
                affiliation: value.affiliation,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub record_id: Uuid,
    pub participant_id: String,
    pub session_id: String,
    pub participant_name: Option<String>,
    pub participant_email: Option<String>,
    pub participant_affiliation: Option<String>,
    pub session_title: Option<String>,
    pub session_day: Option<String>,
    pub session_time: Option<DateTime<Utc>>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub last_scan_time: DateTime<Utc>,
    pub state: RecordState,
    pub is_complete: bool,
}

impl From<AttendanceRecord> for RecordSummary {
    fn from(value: AttendanceRecord) -> Self {
        let state = value.state();
        let is_complete = value.is_complete();
        Self {
            record_id: value.id,
            participant_id: value.participant_id,
            session_id: value.session_id,
            participant_name: value.participant_name,
            participant_email: value.participant_email,
            participant_affiliation: value.participant_affiliation,
            session_title: value.session_title,
            session_day: value.session_day,
            session_time: value.session_time,
            check_in_time: value.check_in_time,
            check_out_time: value.check_out_time,
            last_scan_time: value.last_scan_time,
            state,
            is_complete,
        }
    }
}
