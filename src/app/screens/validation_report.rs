//! Validation report viewer.
//!
//! Reports are turned into a [`ReportView`] first so the grouping logic can
//! be tested apart from the text layout.

use crate::core::alert::{plural, Alert};
use crate::core::validation_grouping::{group_validation_errors, GroupedValidationError};
use crate::domain::model::ShortValidationReport;
use crate::domain::ports::ValidationApi;
use crate::utils::error::{ConsoleError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// Up to this many groups per file are shown with their example paths.
pub const AUTO_EXPAND_GROUPS: usize = 3;

pub fn format_timestamp(epoch_millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_millis) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "unknown".to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSection {
    pub file: String,
    pub required: bool,
    pub exists: bool,
    pub errors_count: u64,
    pub version: Option<String>,
    pub groups: Vec<GroupedValidationError>,
}

impl FileSection {
    pub fn has_repeats(&self) -> bool {
        self.groups.iter().any(|g| g.count > 1)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub system_id: String,
    pub headline: String,
    pub version: Option<String>,
    pub checked_at: String,
    pub errors_count: u64,
    pub files: Vec<FileSection>,
}

impl ReportView {
    pub fn build(system_id: &str, report: &ShortValidationReport) -> Self {
        let errors_count = report.summary.errors_count;
        let headline = if errors_count > 0 {
            format!("Found {}", plural(errors_count as usize, "validation error"))
        } else {
            "All feeds validated successfully".to_string()
        };

        let files = report
            .files
            .iter()
            .map(|(name, result)| FileSection {
                file: result.file.clone().unwrap_or_else(|| name.clone()),
                required: result.required,
                exists: result.exists,
                errors_count: result.errors_count,
                version: result.version.clone(),
                groups: group_validation_errors(&result.errors),
            })
            .collect();

        Self {
            system_id: system_id.to_string(),
            headline,
            version: report.summary.version.clone(),
            checked_at: format_timestamp(report.summary.timestamp),
            errors_count,
            files,
        }
    }

    /// Text layout for the terminal. `details` expands every group's example
    /// paths regardless of how many groups a file has.
    pub fn render(&self, details: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}: {}", self.system_id, self.headline);
        let _ = writeln!(
            out,
            "Version: {}  Last checked: {}",
            self.version.as_deref().unwrap_or("unknown"),
            self.checked_at
        );

        for section in &self.files {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{}  required: {}  exists: {}  errors: {}",
                section.file,
                yes_no(section.required),
                yes_no(section.exists),
                section.errors_count
            );
            if section.groups.is_empty() {
                continue;
            }
            if section.has_repeats() {
                let _ = writeln!(
                    out,
                    "  Showing {} ({} total occurrences)",
                    plural(section.groups.len(), "unique error"),
                    section.errors_count
                );
            }

            let expand = details || section.groups.len() <= AUTO_EXPAND_GROUPS;
            for group in &section.groups {
                render_group(&mut out, group, expand);
            }
        }
        out
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn render_group(out: &mut String, group: &GroupedValidationError, expand: bool) {
    if group.count > 1 {
        let _ = writeln!(out, "  - {} ({}x)", group.message, group.count);
    } else {
        let _ = writeln!(out, "  - {}", group.message);
    }
    let _ = writeln!(out, "      path:   {}", group.normalized_path);
    let _ = writeln!(out, "      schema: {}", group.schema_path);

    if expand && group.count > 1 {
        for path in &group.example_paths {
            let _ = writeln!(out, "        {}", path);
        }
        if group.hidden_examples() > 0 {
            let _ = writeln!(out, "        ... and {} more", group.hidden_examples());
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummaryRow {
    pub system_id: String,
    pub version: Option<String>,
    pub checked_at: String,
    pub errors_count: u64,
}

impl ReportSummaryRow {
    fn from_report(system_id: &str, report: &ShortValidationReport) -> Self {
        Self {
            system_id: system_id.to_string(),
            version: report.summary.version.clone(),
            checked_at: format_timestamp(report.summary.timestamp),
            errors_count: report.summary.errors_count,
        }
    }
}

pub struct ValidationScreen<'a, V: ValidationApi> {
    api: &'a V,
    reports: HashMap<String, ShortValidationReport>,
    alert: Option<Alert>,
}

impl<'a, V: ValidationApi> ValidationScreen<'a, V> {
    pub fn new(api: &'a V) -> Self {
        Self {
            api,
            reports: HashMap::new(),
            alert: None,
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub async fn load(&mut self) -> Result<()> {
        match self.api.get_latest_reports().await {
            Ok(reports) => {
                self.reports = reports;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load validation reports: {}", e);
                self.alert = Some(Alert::error(format!(
                    "Failed to load validation reports: {}",
                    e.user_friendly_message()
                )));
                Err(e)
            }
        }
    }

    pub fn summaries(&self) -> Vec<ReportSummaryRow> {
        let mut rows: Vec<_> = self
            .reports
            .iter()
            .map(|(id, report)| ReportSummaryRow::from_report(id, report))
            .collect();
        rows.sort_by(|a, b| a.system_id.cmp(&b.system_id));
        rows
    }

    pub fn show(&self, system_id: &str) -> Result<ReportView> {
        self.reports
            .get(system_id)
            .map(|report| ReportView::build(system_id, report))
            .ok_or_else(|| ConsoleError::NotFoundError {
                path: format!("/validation/systems/{}", system_id),
            })
    }

    /// Past reports for one system, newest first.
    pub async fn history(&mut self, system_id: &str) -> Result<Vec<ReportSummaryRow>> {
        let mut reports = match self.api.get_report_history(system_id).await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("Failed to load validation history for {}: {}", system_id, e);
                self.alert = Some(Alert::error(format!(
                    "Failed to load validation history: {}",
                    e.user_friendly_message()
                )));
                return Err(e);
            }
        };
        reports.sort_by(|a, b| b.summary.timestamp.cmp(&a.summary.timestamp));
        Ok(reports
            .iter()
            .map(|r| ReportSummaryRow::from_report(system_id, r))
            .collect())
    }
}
