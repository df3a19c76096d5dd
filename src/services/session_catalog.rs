use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::session::SessionDefinition;

/// Read-only view of the program schedule. Editing happens elsewhere.
#[async_trait]
pub trait SessionCatalog: Send + Sync {
    /// Every session across every day, in schedule order.
    async fn list_sessions(&self) -> Result<Vec<SessionDefinition>>;

    async fn find_session(&self, session_id: &str) -> Result<Option<SessionDefinition>> {
        Ok(self
            .list_sessions()
            .await?
            .into_iter()
            .find(|s| s.session_id == session_id))
    }
}

const SESSION_COLUMNS: &str = "s.id AS session_id, d.label AS day, d.position AS day_position, \
    s.title, s.scheduled_time, s.requires_attendance, s.is_scheduled, s.position";

#[derive(Clone)]
pub struct PgSessionCatalog {
    pool: PgPool,
}

impl PgSessionCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionCatalog for PgSessionCatalog {
    async fn list_sessions(&self) -> Result<Vec<SessionDefinition>> {
        let query = format!(
            "SELECT {} FROM sessions s JOIN schedule_days d ON d.id = s.day_id \
             ORDER BY d.position, d.label, s.position, s.id",
            SESSION_COLUMNS
        );
        let sessions = sqlx::query_as::<_, SessionDefinition>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(sessions)
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<SessionDefinition>> {
        let query = format!(
            "SELECT {} FROM sessions s JOIN schedule_days d ON d.id = s.day_id WHERE s.id = $1",
            SESSION_COLUMNS
        );
        let session = sqlx::query_as::<_, SessionDefinition>(&query)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }
}

/// Fixed catalog held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticSessionCatalog {
    sessions: Vec<SessionDefinition>,
}

impl StaticSessionCatalog {
    /// Fails when a session id appears more than once, even across days.
    pub fn new(sessions: Vec<SessionDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for session in &sessions {
            if !seen.insert(session.session_id.as_str()) {
                return Err(Error::Conflict(format!(
                    "session id {} is defined more than once",
                    session.session_id
                )));
            }
        }
        Ok(Self { sessions })
    }
}

#[async_trait]
impl SessionCatalog for StaticSessionCatalog {
    async fn list_sessions(&self) -> Result<Vec<SessionDefinition>> {
        Ok(self.sessions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, day: &str) -> SessionDefinition {
        SessionDefinition {
            session_id: id.to_string(),
            day: day.to_string(),
            day_position: 0,
            title: id.to_string(),
            scheduled_time: None,
            requires_attendance: true,
            is_scheduled: true,
            position: 0,
        }
    }

    #[test]
    fn duplicate_ids_across_days_are_rejected() {
        let result = StaticSessionCatalog::new(vec![session("keynote", "Day 1"), session("keynote", "Day 2")]);
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn find_session_uses_the_listed_sessions() {
        let catalog = StaticSessionCatalog::new(vec![session("a", "Day 1"), session("b", "Day 2")]).unwrap();

        assert_eq!(catalog.find_session("b").await.unwrap().map(|s| s.day), Some("Day 2".to_string()));
        assert!(catalog.find_session("c").await.unwrap().is_none());
    }
}
