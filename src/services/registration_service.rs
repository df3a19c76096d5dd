use async_trait::async_trait;
use reqwest::Client;
use sqlx::PgPool;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::participant::Participant;

/// Registration lookup owned by the enrolment side of the system.
#[async_trait]
pub trait RegistrationDirectory: Send + Sync {
    async fn lookup(&self, participant_id: &str) -> Result<Option<Participant>>;

    /// Full registered population, including people who never scanned.
    async fn list_participants(&self) -> Result<Vec<Participant>>;
}

#[derive(Clone)]
pub struct PgRegistrationDirectory {
    pool: PgPool,
}

impl PgRegistrationDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationDirectory for PgRegistrationDirectory {
    async fn lookup(&self, participant_id: &str) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id AS participant_id, full_name, email, affiliation
            FROM participants
            WHERE id = $1
            "#,
        )
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(participant)
    }

    async fn list_participants(&self) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"
            SELECT id AS participant_id, full_name, email, affiliation
            FROM participants
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(participants)
    }
}

/// Registration lookup served by an external HTTP registry.
#[derive(Clone)]
pub struct HttpRegistrationDirectory {
    client: Client,
    base_url: String,
}

impl HttpRegistrationDirectory {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RegistrationDirectory for HttpRegistrationDirectory {
    async fn lookup(&self, participant_id: &str) -> Result<Option<Participant>> {
        let url = format!("{}/participants/{}", self.base_url, participant_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(participant_id, "participant not present in registry");
            return Ok(None);
        }
        let participant = response
            .error_for_status()?
            .json::<Participant>()
            .await?;
        Ok(Some(participant))
    }

    async fn list_participants(&self) -> Result<Vec<Participant>> {
        let url = format!("{}/participants", self.base_url);
        let participants = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Participant>>()
            .await?;
        tracing::info!(count = participants.len(), "fetched registered participants");
        Ok(participants)
    }
}

#[derive(Clone, Debug, Default)]
pub struct StaticRegistrationDirectory {
    participants: BTreeMap<String, Participant>,
}

impl StaticRegistrationDirectory {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants: participants
                .into_iter()
                .map(|p| (p.participant_id.clone(), p))
                .collect(),
        }
    }
}

#[async_trait]
impl RegistrationDirectory for StaticRegistrationDirectory {
    async fn lookup(&self, participant_id: &str) -> Result<Option<Participant>> {
        Ok(self.participants.get(participant_id).cloned())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(self.participants.values().cloned().collect())
    }
}
