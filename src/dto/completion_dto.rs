use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::completion::CompletionStatus;
use crate::services::report_service::ReportFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionQuery {
    #[serde(alias = "participant_id")]
    pub participant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub participant_id: String,
    #[serde(flatten)]
    pub status: CompletionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportQuery {
    pub only_fully_complete: Option<bool>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ReportQuery {
    pub fn filter(&self) -> ReportFilter {
        ReportFilter {
            only_fully_complete: self.only_fully_complete.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Txt,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportQuery {
    pub only_fully_complete: Option<bool>,
    pub format: Option<ExportFormat>,
}

impl ExportQuery {
    pub fn filter(&self) -> ReportFilter {
        ReportFilter {
            only_fully_complete: self.only_fully_complete.unwrap_or(false),
        }
    }
}
