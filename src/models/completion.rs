use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use utoipa::ToSchema;

use crate::models::attendance::AttendanceRecord;
use crate::models::participant::{display_name, Participant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub completed_required_count: usize,
    pub total_required_count: usize,
    pub is_fully_complete: bool,
}

impl CompletionStatus {
    pub fn new(completed_required_count: usize, total_required_count: usize) -> Self {
        // No required sessions means nobody has completed the program.
        let is_fully_complete =
            total_required_count > 0 && completed_required_count == total_required_count;
        Self {
            completed_required_count,
            total_required_count,
            is_fully_complete,
        }
    }

    /// Counts complete records whose session is required. Partial records
    /// (entry only, exit only) are valid and simply do not count.
    pub fn from_records<'a, I>(records: I, required: &BTreeSet<String>) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let completed: BTreeSet<&str> = records
            .into_iter()
            .filter(|r| r.is_complete() && required.contains(&r.session_id))
            .map(|r| r.session_id.as_str())
            .collect();
        Self::new(completed.len(), required.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub participant_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub affiliation: Option<String>,
}

impl ParticipantSummary {
    pub fn display_name(&self) -> &str {
        display_name(self.full_name.as_deref(), &self.participant_id)
    }
}

impl From<Participant> for ParticipantSummary {
    fn from(value: Participant) -> Self {
        let fields = value.display_fields();
        Self {
            participant_id: value.participant_id,
            full_name: fields.full_name,
            email: fields.email,
            affiliation: fields.affiliation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantCompletion {
    pub participant: ParticipantSummary,
    pub status: CompletionStatus,
}

impl ParticipantCompletion {
    /// Report order: most completed first, then case-insensitive name, then id.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .status
            .completed_required_count
            .cmp(&self.status.completed_required_count)
            .then_with(|| {
                self.participant
                    .display_name()
                    .to_lowercase()
                    .cmp(&other.participant.display_name().to_lowercase())
            })
            .then_with(|| self.participant.participant_id.cmp(&other.participant.participant_id))
    }
}
