use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::attendance::AttendanceRecord;
use crate::models::completion::{CompletionStatus, ParticipantCompletion, ParticipantSummary};
use crate::models::participant::Participant;
use crate::models::session::{required_session_ids, SessionDefinition};
use crate::services::record_store::{with_timeout, AttendanceStore};
use crate::services::registration_service::RegistrationDirectory;
use crate::services::session_catalog::SessionCatalog;

/// Snapshot of the global completion view.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOverview {
    pub total_required_count: usize,
    pub entries: Vec<ParticipantCompletion>,
}

/// The single place completion is derived. Nothing is persisted; every call
/// recomputes from the current records and catalog.
#[derive(Clone)]
pub struct CompletionService {
    store: Arc<dyn AttendanceStore>,
    catalog: Arc<dyn SessionCatalog>,
    registry: Arc<dyn RegistrationDirectory>,
    timeout: Duration,
}

impl CompletionService {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        catalog: Arc<dyn SessionCatalog>,
        registry: Arc<dyn RegistrationDirectory>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            catalog,
            registry,
            timeout,
        }
    }

    pub async fn sessions(&self) -> Result<Vec<SessionDefinition>> {
        with_timeout(
            self.timeout,
            "catalog.list_sessions",
            self.catalog.list_sessions(),
        )
        .await
    }

    pub async fn required_sessions(&self) -> Result<BTreeSet<String>> {
        Ok(required_session_ids(&self.sessions().await?))
    }

    pub async fn compute_for_participant(&self, participant_id: &str) -> Result<CompletionStatus> {
        let (status, _) = self.participant_records(participant_id).await?;
        Ok(status)
    }

    /// A participant's records together with their completion status.
    pub async fn participant_records(
        &self,
        participant_id: &str,
    ) -> Result<(CompletionStatus, Vec<AttendanceRecord>)> {
        let required = self.required_sessions().await?;
        let records = with_timeout(
            self.timeout,
            "store.get_by_participant",
            self.store.get_by_participant(participant_id),
        )
        .await?;
        let status = CompletionStatus::from_records(&records, &required);
        Ok((status, records))
    }

    /// Every record for one session; unknown sessions are `SessionNotFound`.
    pub async fn session_records(
        &self,
        session_id: &str,
    ) -> Result<(SessionDefinition, Vec<AttendanceRecord>)> {
        let session = with_timeout(
            self.timeout,
            "catalog.find_session",
            self.catalog.find_session(session_id),
        )
        .await?
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        let records = with_timeout(
            self.timeout,
            "store.get_by_session",
            self.store.get_by_session(&session.session_id),
        )
        .await?;
        Ok((session, records))
    }

    pub async fn compute_global(&self) -> Result<Vec<ParticipantCompletion>> {
        Ok(self.overview().await?.entries)
    }

    /// Global view plus the required-session count it was computed against.
    pub async fn overview(&self) -> Result<CompletionOverview> {
        let required = self.required_sessions().await?;
        let participants = with_timeout(
            self.timeout,
            "registry.list_participants",
            self.registry.list_participants(),
        )
        .await?;
        let records = with_timeout(self.timeout, "store.get_all", self.store.get_all()).await?;

        let entries = rank_population(participants, &records, &required);
        tracing::debug!(
            participants = entries.len(),
            required = required.len(),
            "computed global completion"
        );
        Ok(CompletionOverview {
            total_required_count: required.len(),
            entries,
        })
    }
}

/// Builds the ordered completion list for every registrant, plus anyone who
/// scanned without being registered.
pub fn rank_population(
    participants: Vec<Participant>,
    records: &[AttendanceRecord],
    required: &BTreeSet<String>,
) -> Vec<ParticipantCompletion> {
    let mut by_participant: BTreeMap<&str, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in records {
        by_participant
            .entry(record.participant_id.as_str())
            .or_default()
            .push(record);
    }

    let mut population: BTreeMap<String, ParticipantSummary> = participants
        .into_iter()
        .map(|p| (p.participant_id.clone(), ParticipantSummary::from(p)))
        .collect();

    for (participant_id, records) in &by_participant {
        if population.contains_key(*participant_id) {
            continue;
        }
        tracing::debug!(participant_id, "scanned participant missing from registry");
        population.insert(
            participant_id.to_string(),
            ParticipantSummary {
                participant_id: participant_id.to_string(),
                full_name: first_non_blank(records, |r| &r.participant_name),
                email: first_non_blank(records, |r| &r.participant_email),
                affiliation: first_non_blank(records, |r| &r.participant_affiliation),
            },
        );
    }

    let mut entries: Vec<ParticipantCompletion> = population
        .into_values()
        .map(|participant| {
            let status = match by_participant.get(participant.participant_id.as_str()) {
                Some(records) => CompletionStatus::from_records(records.iter().copied(), required),
                None => CompletionStatus::new(0, required.len()),
            };
            ParticipantCompletion {
                participant,
                status,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.rank_cmp(b));
    entries
}

/// Each record fills its own blanks, so a field may only be known on a later one.
fn first_non_blank<'a, F>(records: &[&'a AttendanceRecord], field: F) -> Option<String>
where
    F: Fn(&'a AttendanceRecord) -> &'a Option<String>,
{
    records
        .iter()
        .filter_map(|record| field(*record).as_deref())
        .find(|value| !value.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(participant: &str, session: &str, entry: bool, exit: bool) -> AttendanceRecord {
        let at = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();
        AttendanceRecord {
            id: Uuid::new_v4(),
            participant_id: participant.into(),
            session_id: session.into(),
            participant_name: None,
            participant_email: None,
            participant_affiliation: None,
            session_title: None,
            session_day: None,
            session_time: None,
            check_in_time: entry.then_some(at),
            check_out_time: exit.then_some(at),
            last_scan_time: at,
            created_at: at,
        }
    }

    fn registrant(id: &str, name: &str) -> Participant {
        Participant {
            participant_id: id.into(),
            full_name: Some(name.into()),
            email: None,
            affiliation: None,
        }
    }

    fn required(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partial_records_never_count() {
        let records = vec![
            record("p", "S1", true, false),
            record("p", "S2", false, true),
        ];
        let status = CompletionStatus::from_records(&records, &required(&["S1", "S2"]));
        assert_eq!(status, CompletionStatus::new(0, 2));
    }

    #[test]
    fn empty_required_set_is_never_complete() {
        let records: Vec<AttendanceRecord> = Vec::new();
        let status = CompletionStatus::from_records(&records, &BTreeSet::new());
        assert_eq!(status.total_required_count, 0);
        assert!(!status.is_fully_complete);
    }

    #[test]
    fn zero_scan_registrants_are_ranked_last_by_name() {
        let participants = vec![
            registrant("a", "zed"),
            registrant("b", "Amy"),
            registrant("c", "bob"),
        ];
        let records = vec![record("a", "S1", true, true)];

        let ranked = rank_population(participants, &records, &required(&["S1"]));
        let order: Vec<&str> = ranked
            .iter()
            .map(|e| e.participant.participant_id.as_str())
            .collect();

        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(ranked[0].status.is_fully_complete);
        assert_eq!(ranked[1].status, CompletionStatus::new(0, 1));
    }

    #[test]
    fn unregistered_scanner_still_appears() {
        let mut walk_in = record("w", "S1", true, true);
        walk_in.participant_name = Some("Walk In".into());

        let ranked = rank_population(vec![registrant("a", "Ann")], &[walk_in], &required(&["S1"]));

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].participant.display_name(), "Walk In");
    }

    #[test]
    fn unregistered_scanner_name_comes_from_any_record() {
        let nameless = record("w", "S1", true, true);
        let mut named = record("w", "S2", true, false);
        named.participant_name = Some("Zoe Walker".into());
        named.participant_email = Some("  ".into());
        let mut emailed = record("w", "S3", true, false);
        emailed.participant_email = Some("zoe@example.com".into());

        let ranked = rank_population(
            vec![registrant("a", "Yan")],
            &[nameless, named, emailed],
            &required(&["S1"]),
        );

        assert_eq!(ranked[0].participant.participant_id, "w");
        assert_eq!(ranked[0].participant.full_name.as_deref(), Some("Zoe Walker"));
        assert_eq!(ranked[0].participant.email.as_deref(), Some("zoe@example.com"));
        assert_eq!(ranked[0].participant.affiliation, None);
    }

    #[test]
    fn unregistered_scanner_sorts_by_recovered_name() {
        let nameless = record("w", "S1", false, true);
        let mut named = record("w", "S2", true, false);
        named.participant_name = Some("Aaron".into());

        let ranked = rank_population(
            vec![registrant("b", "Bea")],
            &[nameless, named],
            &required(&["S1"]),
        );
        let order: Vec<&str> = ranked
            .iter()
            .map(|e| e.participant.participant_id.as_str())
            .collect();

        assert_eq!(order, vec!["w", "b"]);
    }

    #[test]
    fn identical_names_tie_break_on_id() {
        let participants = vec![registrant("p-2", "Sam"), registrant("p-1", "sam")];
        let ranked = rank_population(participants, &[], &required(&["S1"]));
        assert_eq!(ranked[0].participant.participant_id, "p-1");
        assert_eq!(ranked[1].participant.participant_id, "p-2");
    }
}
