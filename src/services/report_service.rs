use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;
use crate::models::participant::display_name;
use crate::services::completion_service::{CompletionOverview, CompletionService};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub only_fully_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// 1-based position in the unfiltered global order.
    pub rank: usize,
    pub participant_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub affiliation: Option<String>,
    pub completed_required_count: usize,
    pub total_required_count: usize,
    pub is_fully_complete: bool,
}

impl ReportRow {
    pub fn display_name(&self) -> &str {
        display_name(self.full_name.as_deref(), &self.participant_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub total_required_count: usize,
    pub rows: Vec<ReportRow>,
}

/// Completion results in report order. Ranks are assigned before the
/// filter is applied, so a filtered report keeps global positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub program_title: String,
    pub filter: ReportFilter,
    pub total_required_count: usize,
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn from_overview(
        program_title: impl Into<String>,
        overview: CompletionOverview,
        filter: ReportFilter,
    ) -> Self {
        let rows = overview
            .entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| ReportRow {
                rank: idx + 1,
                participant_id: entry.participant.participant_id,
                full_name: entry.participant.full_name,
                email: entry.participant.email,
                affiliation: entry.participant.affiliation,
                completed_required_count: entry.status.completed_required_count,
                total_required_count: entry.status.total_required_count,
                is_fully_complete: entry.status.is_fully_complete,
            })
            .filter(|row| !filter.only_fully_complete || row.is_fully_complete)
            .collect();

        Self {
            program_title: program_title.into(),
            filter,
            total_required_count: overview.total_required_count,
            rows,
        }
    }

    /// Restartable: every call walks the same rows from the start.
    pub fn rows(&self) -> std::slice::Iter<'_, ReportRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fully_complete_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_fully_complete).count()
    }

    /// 1-based page of rows. Pages past the end come back empty.
    pub fn page(&self, page: usize, page_size: usize) -> ReportPage {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_rows = self.rows.len();
        let rows = self
            .rows()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        ReportPage {
            page,
            page_size,
            total_rows,
            total_pages: total_rows.div_ceil(page_size),
            total_required_count: self.total_required_count,
            rows,
        }
    }

    /// Physical pages of the fixed-column text rendering.
    pub fn text_pages(&self, rows_per_page: usize) -> TextPages<'_> {
        let rows_per_page = rows_per_page.max(1);
        TextPages {
            report: self,
            rows_per_page,
            total_pages: self.rows.len().div_ceil(rows_per_page).max(1),
            next_page: 1,
        }
    }

    /// Whole text document; pages are separated by form feeds.
    pub fn render_text(&self, rows_per_page: usize) -> String {
        self.text_pages(rows_per_page)
            .collect::<Vec<_>>()
            .join("\u{000C}")
    }

    fn filter_label(&self) -> &'static str {
        if self.filter.only_fully_complete {
            "fully complete only"
        } else {
            "all participants"
        }
    }
}

const COLUMNS: [(&str, usize); 6] = [
    ("#", 5),
    ("Name", 28),
    ("Affiliation", 20),
    ("Email", 30),
    ("Done", 9),
    ("Complete", 8),
];

/// Lazily renders one physical page per `next()` call.
pub struct TextPages<'a> {
    report: &'a Report,
    rows_per_page: usize,
    total_pages: usize,
    next_page: usize,
}

impl Iterator for TextPages<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_page > self.total_pages {
            return None;
        }
        let page = self.next_page;
        self.next_page += 1;
        Some(self.render_page(page))
    }
}

impl TextPages<'_> {
    fn render_page(&self, page: usize) -> String {
        let report = self.report;
        let width: usize = COLUMNS.iter().map(|(_, w)| w + 1).sum::<usize>() - 1;
        let rule = "-".repeat(width);
        let mut out = String::new();

        out.push_str(&format!("{} - Completion Report\n", report.program_title));
        out.push_str(&format!(
            "Required sessions: {} | Filter: {} | Rows: {}\n",
            report.total_required_count,
            report.filter_label(),
            report.len()
        ));
        out.push_str(&rule);
        out.push('\n');
        let header: Vec<String> = COLUMNS.iter().map(|(name, w)| cell(name, *w)).collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');

        let rows: Vec<&ReportRow> = report
            .rows()
            .skip((page - 1) * self.rows_per_page)
            .take(self.rows_per_page)
            .collect();
        if rows.is_empty() {
            out.push_str("(no participants)\n");
        }
        for row in rows {
            let fields = [
                row.rank.to_string(),
                row.display_name().to_string(),
                row.affiliation.clone().unwrap_or_else(|| "-".to_string()),
                row.email.clone().unwrap_or_else(|| "-".to_string()),
                format!("{}/{}", row.completed_required_count, row.total_required_count),
                if row.is_fully_complete { "yes" } else { "no" }.to_string(),
            ];
            let line: Vec<String> = fields
                .iter()
                .zip(COLUMNS.iter())
                .map(|(value, (_, w))| cell(value, *w))
                .collect();
            out.push_str(line.join(" ").trim_end());
            out.push('\n');
        }

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Page {} of {}\n", page, self.total_pages));
        out
    }
}

/// Pads or truncates to exactly `width` characters.
fn cell(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count > width {
        let mut truncated: String = value.chars().take(width.saturating_sub(1)).collect();
        truncated.push('~');
        truncated
    } else {
        format!("{}{}", value, " ".repeat(width - count))
    }
}

#[derive(Clone)]
pub struct ReportService {
    completion: CompletionService,
    program_title: String,
}

impl ReportService {
    pub fn new(completion: CompletionService, program_title: impl Into<String>) -> Self {
        Self {
            completion,
            program_title: program_title.into(),
        }
    }

    pub async fn generate(&self, filter: ReportFilter) -> Result<Report> {
        let overview = self.completion.overview().await?;
        let report = Report::from_overview(self.program_title.clone(), overview, filter);
        tracing::info!(
            rows = report.len(),
            required = report.total_required_count,
            only_fully_complete = filter.only_fully_complete,
            "completion report generated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::completion::{CompletionStatus, ParticipantCompletion, ParticipantSummary};

    fn overview(counts: &[(&str, usize)], total: usize) -> CompletionOverview {
        CompletionOverview {
            total_required_count: total,
            entries: counts
                .iter()
                .map(|(name, done)| ParticipantCompletion {
                    participant: ParticipantSummary {
                        participant_id: format!("id-{}", name),
                        full_name: Some(name.to_string()),
                        email: None,
                        affiliation: None,
                    },
                    status: CompletionStatus::new(*done, total),
                })
                .collect(),
        }
    }

    #[test]
    fn filtered_rows_keep_global_rank() {
        let report = Report::from_overview(
            "Summit",
            overview(&[("Ann", 2), ("Bo", 1), ("Cy", 2)], 2),
            ReportFilter {
                only_fully_complete: true,
            },
        );
        let ranks: Vec<usize> = report.rows().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 3]);
    }

    #[test]
    fn pages_cover_rows_without_overlap() {
        let report = Report::from_overview(
            "Summit",
            overview(&[("A", 1), ("B", 1), ("C", 1), ("D", 0), ("E", 0)], 1),
            ReportFilter::default(),
        );
        let first = report.page(1, 2);
        let last = report.page(3, 2);
        let beyond = report.page(4, 2);

        assert_eq!(first.total_pages, 3);
        assert_eq!(first.rows.len(), 2);
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.rows[0].participant_id, "id-E");
        assert!(beyond.rows.is_empty());
    }

    #[test]
    fn every_text_page_has_header_and_counter() {
        let report = Report::from_overview(
            "Summit",
            overview(&[("A", 1), ("B", 1), ("C", 0)], 1),
            ReportFilter::default(),
        );
        let pages: Vec<String> = report.text_pages(2).collect();

        assert_eq!(pages.len(), 2);
        for (idx, page) in pages.iter().enumerate() {
            assert!(page.starts_with("Summit - Completion Report\n"));
            assert!(page.contains("Required sessions: 1"));
            assert!(page.ends_with(&format!("Page {} of 2\n", idx + 1)));
        }
        assert_eq!(report.render_text(2), report.render_text(2));
    }

    #[test]
    fn empty_catalog_still_renders_one_page() {
        let report = Report::from_overview("Summit", overview(&[("A", 0)], 0), ReportFilter::default());
        let pages: Vec<String> = report.text_pages(10).collect();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Required sessions: 0"));
        assert!(pages[0].contains("0/0"));
    }

    #[test]
    fn blank_names_fall_back_to_id_like_the_ranking() {
        let report = Report::from_overview(
            "Summit",
            overview(&[("   ", 1), (" Ann ", 1)], 1),
            ReportFilter::default(),
        );
        let names: Vec<&str> = report.rows().map(|r| r.display_name()).collect();

        assert_eq!(names, vec!["id-   ", "Ann"]);
    }

    #[test]
    fn long_values_are_truncated_to_column() {
        assert_eq!(cell("abcdef", 4), "abc~");
        assert_eq!(cell("ab", 4), "ab  ");
    }
}
