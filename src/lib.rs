pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    completion_service::CompletionService,
    record_store::{AttendanceStore, PgAttendanceStore},
    registration_service::{HttpRegistrationDirectory, PgRegistrationDirectory, RegistrationDirectory},
    report_service::ReportService,
    scan_service::ScanService,
    session_catalog::{PgSessionCatalog, SessionCatalog},
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Knobs shared by the services, usually taken from [`config::Config`].
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub store_timeout: Duration,
    pub program_title: String,
    pub report_rows_per_page: usize,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            program_title: "Program".to_string(),
            report_rows_per_page: 40,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub scan_service: ScanService,
    pub completion_service: CompletionService,
    pub report_service: ReportService,
    pub report_rows_per_page: usize,
}

impl AppState {
    pub fn new(pool: PgPool) -> error::Result<Self> {
        let config = crate::config::get_config();
        let settings = StateSettings {
            store_timeout: config.store_timeout(),
            program_title: config.program_title.clone(),
            report_rows_per_page: config.report_rows_per_page,
        };

        let registry: Arc<dyn RegistrationDirectory> = match &config.registry_url {
            Some(url) => {
                let http_client = Client::builder().timeout(settings.store_timeout).build()?;
                tracing::info!(registry_url = %url, "using HTTP registration directory");
                Arc::new(HttpRegistrationDirectory::new(http_client, url.clone()))
            }
            None => Arc::new(PgRegistrationDirectory::new(pool.clone())),
        };

        Ok(Self::from_parts(
            Arc::new(PgAttendanceStore::new(pool.clone())),
            Arc::new(PgSessionCatalog::new(pool)),
            registry,
            settings,
        ))
    }

    pub fn from_parts(
        store: Arc<dyn AttendanceStore>,
        catalog: Arc<dyn SessionCatalog>,
        registry: Arc<dyn RegistrationDirectory>,
        settings: StateSettings,
    ) -> Self {
        let scan_service = ScanService::new(
            store.clone(),
            catalog.clone(),
            registry.clone(),
            settings.store_timeout,
        );
        let completion_service =
            CompletionService::new(store, catalog, registry, settings.store_timeout);
        let report_service =
            ReportService::new(completion_service.clone(), settings.program_title);

        Self {
            scan_service,
            completion_service,
            report_service,
            report_rows_per_page: settings.report_rows_per_page.max(1),
        }
    }
}
