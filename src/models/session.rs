use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDefinition {
    pub session_id: String,
    pub day: String,
    #[serde(default)]
    pub day_position: i32,
    pub title: String,
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub requires_attendance: bool,
    #[serde(default = "default_true")]
    pub is_scheduled: bool,
    #[serde(default)]
    pub position: i32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub day: String,
    pub sessions: Vec<SessionDefinition>,
}

/// Ids of every session, across all days, that counts toward completion.
pub fn required_session_ids(sessions: &[SessionDefinition]) -> BTreeSet<String> {
    sessions
        .iter()
        .filter(|s| s.requires_attendance)
        .map(|s| s.session_id.clone())
        .collect()
}

/// Groups sessions by day, keeping day order and in-day order.
pub fn group_by_day(sessions: &[SessionDefinition]) -> Vec<ScheduleDay> {
    let mut ordered = sessions.to_vec();
    ordered.sort_by(|a, b| {
        a.day_position
            .cmp(&b.day_position)
            .then_with(|| a.day.cmp(&b.day))
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    let mut days: Vec<ScheduleDay> = Vec::new();
    for session in ordered {
        match days.last_mut() {
            Some(day) if day.day == session.day => day.sessions.push(session),
            _ => days.push(ScheduleDay {
                day: session.day.clone(),
                sessions: vec![session],
            }),
        }
    }
    days
}
