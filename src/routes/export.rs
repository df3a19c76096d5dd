use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    dto::completion_dto::{ExportFormat, ExportQuery},
    error::Result,
    services::export_service::ExportService,
    utils::time,
    AppState,
};

/// Export the completion report as a downloadable document.
#[utoipa::path(
    get,
    path = "/api/completion/report/export",
    params(
        ("onlyFullyComplete" = Option<bool>, Query, description = "Keep only fully complete participants"),
        ("format" = Option<String>, Query, description = "xlsx (default) or txt")
    ),
    responses(
        (status = 200, description = "Report document attachment")
    )
)]
pub async fn export_report(
    State(state): State<AppState>,
    query: std::result::Result<Query<ExportQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let report = state.report_service.generate(query.filter()).await?;
    let now = time::now();
    let suffix = if report.filter.only_fully_complete {
        "_complete"
    } else {
        ""
    };

    let (content_type, extension, buffer) = match query.format.unwrap_or_default() {
        ExportFormat::Xlsx => (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "xlsx",
            ExportService::generate_completion_xlsx(&report, &time::short_stamp(now))?,
        ),
        ExportFormat::Txt => (
            "text/plain; charset=utf-8",
            "txt",
            report.render_text(state.report_rows_per_page).into_bytes(),
        ),
    };

    let filename = format!(
        "completion_report{}_{}.{}",
        suffix,
        now.format("%Y%m%d_%H%M"),
        extension
    );
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
