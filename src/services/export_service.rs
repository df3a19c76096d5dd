use crate::error::Result;
use crate::services::report_service::Report;
use rust_xlsxwriter::*;

pub struct ExportService;

impl ExportService {
    /// Header and footer strings use `&` as a control prefix.
    fn escape_print_text(input: &str) -> String {
        input.replace('&', "&&")
    }
}

impl ExportService {
    /// Render a completion report as a print-ready XLSX workbook.
    ///
    /// Column headers repeat on every printed page and the footer carries
    /// a running `Page N of M` counter.
    pub fn generate_completion_xlsx(report: &Report, generated_at: &str) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Completion")?;

        // ── Color palette ──
        let primary_color = Color::RGB(0x1E293B);     // Slate 800
        let header_bg = Color::RGB(0x0F172A);          // Slate 900
        let header_text = Color::White;
        let alt_row_1 = Color::RGB(0xF8FAFC);          // Slate 50
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);       // Slate 200

        let complete_color = Color::RGB(0x10B981);     // Emerald
        let partial_color = Color::RGB(0xF59E0B);      // Amber
        let none_color = Color::RGB(0xEF4444);         // Red

        // ── Column definitions ──
        let columns = [
            ("Rank",         8.0),
            ("Participant",  30.0),
            ("ID",           18.0),
            ("Email",        30.0),
            ("Affiliation",  24.0),
            ("Completed",    12.0),
            ("Required",     12.0),
            ("Status",       16.0),
        ];

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }
        let last_col = (columns.len() - 1) as u16;

        // ── Print layout ──
        let filter_label = if report.filter.only_fully_complete {
            "fully complete only"
        } else {
            "all participants"
        };
        worksheet.set_landscape();
        worksheet.set_paper_size(9);
        worksheet.set_print_fit_to_pages(1, 0);
        worksheet.set_header(format!(
            "&L{}&RRequired sessions: {}",
            Self::escape_print_text(&report.program_title),
            report.total_required_count
        ));
        worksheet.set_footer(format!(
            "&L{}&CPage &P of &N&R{}",
            Self::escape_print_text(filter_label),
            Self::escape_print_text(generated_at)
        ));

        // ── Title row ──
        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(header_text)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);

        worksheet.set_row_height(0, 40)?;
        let title = format!("{} - Completion Report", report.program_title);
        worksheet.merge_range(0, 0, 0, last_col, &title, &title_format)?;

        // ── Subtitle row ──
        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);

        worksheet.set_row_height(1, 22)?;
        let subtitle_text = format!(
            "Generated: {}  •  Required sessions: {}  •  Filter: {}  •  Rows: {}",
            generated_at,
            report.total_required_count,
            filter_label,
            report.len()
        );
        worksheet.merge_range(1, 0, 1, last_col, &subtitle_text, &subtitle_format)?;

        // ── Header row ──
        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(header_text)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        let header_row = 2;
        worksheet.set_row_height(header_row, 30)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }
        worksheet.set_repeat_rows(header_row, header_row)?;

        // ── Data rows ──
        let data_start_row = 3;
        for (idx, row) in report.rows().enumerate() {
            let sheet_row = data_start_row + idx as u32;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let name_fmt = base_fmt.clone().set_bold();

            worksheet.set_row_height(sheet_row, 22)?;
            worksheet.write_number_with_format(sheet_row, 0, row.rank as f64, &center_fmt)?;
            worksheet.write_string_with_format(sheet_row, 1, row.display_name(), &name_fmt)?;
            worksheet.write_string_with_format(sheet_row, 2, &row.participant_id, &base_fmt)?;
            worksheet.write_string_with_format(sheet_row, 3, row.email.as_deref().unwrap_or("—"), &base_fmt)?;
            worksheet.write_string_with_format(sheet_row, 4, row.affiliation.as_deref().unwrap_or("—"), &base_fmt)?;
            worksheet.write_number_with_format(sheet_row, 5, row.completed_required_count as f64, &center_fmt)?;
            worksheet.write_number_with_format(sheet_row, 6, row.total_required_count as f64, &center_fmt)?;

            // Status (colored)
            let (status_color, status_display) = if row.is_fully_complete {
                (complete_color, "Complete")
            } else if row.completed_required_count > 0 {
                (partial_color, "In progress")
            } else {
                (none_color, "Not started")
            };
            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(status_color)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(sheet_row, 7, status_display, &status_fmt)?;
        }

        // ── Summary row ──
        let total_row = data_start_row + report.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))  // Indigo 100
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        worksheet.set_row_height(total_row, 26)?;
        worksheet.merge_range(total_row, 0, total_row, 2, &format!("Total: {} participants", report.len()), &summary_fmt)?;
        let status_summary = format!(
            "Fully complete: {} | Required sessions: {}",
            report.fully_complete_count(),
            report.total_required_count
        );
        worksheet.merge_range(total_row, 3, total_row, last_col, &status_summary, &summary_fmt)?;

        // Freeze panes (header stays visible while scrolling)
        worksheet.set_freeze_panes(3, 0)?;

        // Auto-filter on data columns
        let last_data_row = (data_start_row + report.len() as u32).saturating_sub(1).max(header_row);
        worksheet.autofilter(header_row, 0, last_data_row, last_col)?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::completion::{CompletionStatus, ParticipantCompletion, ParticipantSummary};
    use crate::services::completion_service::CompletionOverview;
    use crate::services::report_service::ReportFilter;

    #[test]
    fn workbook_is_a_zip_container() {
        let overview = CompletionOverview {
            total_required_count: 0,
            entries: vec![ParticipantCompletion {
                participant: ParticipantSummary {
                    participant_id: "p-1".into(),
                    full_name: Some("R&D Person".into()),
                    email: None,
                    affiliation: None,
                },
                status: CompletionStatus::new(0, 0),
            }],
        };
        let report = Report::from_overview("Tools & Methods", overview, ReportFilter::default());

        let bytes = ExportService::generate_completion_xlsx(&report, "2026-10-16 09:00").expect("xlsx");

        assert!(bytes.starts_with(b"PK"));
    }
}
