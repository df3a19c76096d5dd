use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::attendance::{AttendanceRecord, RecordKey, RecordPatch, ScanKind};
use crate::models::participant::DisplayFields;
use crate::services::record_store::{with_timeout, AttendanceStore};
use crate::services::registration_service::RegistrationDirectory;
use crate::services::session_catalog::SessionCatalog;
use crate::utils::{time, validation};

#[derive(Debug, Clone)]
pub struct ScanCommand {
    pub participant_id: String,
    pub session_id: String,
    pub scan_kind: ScanKind,
    pub claimed: DisplayFields,
}

#[derive(Clone)]
pub struct ScanService {
    store: Arc<dyn AttendanceStore>,
    catalog: Arc<dyn SessionCatalog>,
    registry: Arc<dyn RegistrationDirectory>,
    timeout: Duration,
}

impl ScanService {
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

    /// Validates a scan and merges it into the (participant, session) record.
    ///
    /// Re-scanning the same kind refreshes that timestamp and is not an
    /// error. Exactly one store write happens per successful call, none on
    /// a validation failure.
    pub async fn record_scan(&self, cmd: ScanCommand) -> Result<AttendanceRecord> {
        let participant_id = validation::participant_id(&cmd.participant_id)?;
        let session_id = cmd.session_id.trim();
        if session_id.is_empty() {
            return Err(Error::BadRequest("session id is empty".to_string()));
        }

        let session = with_timeout(
            self.timeout,
            "catalog.find_session",
            self.catalog.find_session(session_id),
        )
        .await?
        .filter(|s| s.is_scheduled)
        .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let registered = match with_timeout(
            self.timeout,
            "registry.lookup",
            self.registry.lookup(&participant_id),
        )
        .await
        {
            Ok(found) => found.map(|p| p.display_fields()).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    participant_id = %participant_id,
                    error = %e,
                    "registration lookup failed, using scanned display fields"
                );
                DisplayFields::default()
            }
        };

        let patch = RecordPatch {
            scan_kind: cmd.scan_kind,
            scanned_at: time::now(),
            participant: registered.or(cmd.claimed),
            session_title: Some(session.title.clone()),
            session_day: Some(session.day.clone()),
            session_time: session.scheduled_time,
        };
        let key = RecordKey::new(participant_id, session.session_id);

        let record = with_timeout(
            self.timeout,
            "store.merge_upsert",
            self.store.merge_upsert(&key, &patch),
        )
        .await
        .map_err(|e| {
            if let Error::Conflict(msg) = &e {
                tracing::error!(
                    participant_id = %key.participant_id,
                    session_id = %key.session_id,
                    error = %msg,
                    "duplicate attendance record detected"
                );
            }
            e
        })?;

        tracing::info!(
            participant_id = %record.participant_id,
            session_id = %record.session_id,
            scan_kind = %cmd.scan_kind,
            complete = record.is_complete(),
            "scan recorded"
        );
        Ok(record)
    }
}
