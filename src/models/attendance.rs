use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::participant::DisplayFields;

/// Which half of an attendance record a scan fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    #[serde(alias = "check_in", alias = "checkin")]
    Entry,
    #[serde(alias = "check_out", alias = "checkout")]
    Exit,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Entry => "entry",
            ScanKind::Exit => "exit",
        }
    }
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub participant_id: String,
    pub session_id: String,
}

impl RecordKey {
    pub fn new(participant_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Field-level changes carried by one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPatch {
    pub scan_kind: ScanKind,
    pub scanned_at: DateTime<Utc>,
    pub participant: DisplayFields,
    pub session_title: Option<String>,
    pub session_day: Option<String>,
    pub session_time: Option<DateTime<Utc>>,
}

impl RecordPatch {
    pub fn check_in_time(&self) -> Option<DateTime<Utc>> {
        (self.scan_kind == ScanKind::Entry).then_some(self.scanned_at)
    }

    pub fn check_out_time(&self) -> Option<DateTime<Utc>> {
        (self.scan_kind == ScanKind::Exit).then_some(self.scanned_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    CheckedIn,
    CheckedOut,
    Complete,
}

impl AttendanceRecord {
    /// Builds the record created by the first scan for `key`.
    pub fn from_first_scan(key: &RecordKey, patch: &RecordPatch) -> Self {
        let participant = patch.participant.clone().normalized();
        Self {
            id: Uuid::new_v4(),
            participant_id: key.participant_id.clone(),
            session_id: key.session_id.clone(),
            participant_name: participant.full_name,
            participant_email: participant.email,
            participant_affiliation: participant.affiliation,
            session_title: patch.session_title.clone(),
            session_day: patch.session_day.clone(),
            session_time: patch.session_time,
            check_in_time: patch.check_in_time(),
            check_out_time: patch.check_out_time(),
            last_scan_time: patch.scanned_at,
            created_at: patch.scanned_at,
        }
    }

    /// Field-level merge. Only the slot named by the scan kind moves, and it
    /// never moves backwards in time.
    pub fn apply(&mut self, patch: &RecordPatch) {
        let slot = match patch.scan_kind {
            ScanKind::Entry => &mut self.check_in_time,
            ScanKind::Exit => &mut self.check_out_time,
        };
        *slot = Some(slot.map_or(patch.scanned_at, |t| t.max(patch.scanned_at)));
        self.last_scan_time = self.last_scan_time.max(patch.scanned_at);

        let participant = patch.participant.clone().normalized();
        fill_blank(&mut self.participant_name, participant.full_name);
        fill_blank(&mut self.participant_email, participant.email);
        fill_blank(&mut self.participant_affiliation, participant.affiliation);

        if patch.session_title.is_some() {
            self.session_title = patch.session_title.clone();
        }
        if patch.session_day.is_some() {
            self.session_day = patch.session_day.clone();
        }
        if patch.session_time.is_some() {
            self.session_time = patch.session_time;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_some()
    }

    pub fn state(&self) -> RecordState {
        match (self.check_in_time, self.check_out_time) {
            (Some(_), Some(_)) => RecordState::Complete,
            (None, Some(_)) => RecordState::CheckedOut,
            _ => RecordState::CheckedIn,
        }
    }
}

fn fill_blank(existing: &mut Option<String>, incoming: Option<String>) {
    let is_blank = existing.as_deref().map_or(true, |v| v.trim().is_empty());
    if is_blank && incoming.is_some() {
        *existing = incoming;
    }
}
