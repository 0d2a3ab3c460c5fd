//! Rendering batch results as text or JSON

use serde::Serialize;

use crate::version::evaluator::{BatchReport, ComponentFailure, ComponentUpdate};
use crate::version::ranges::Segment;
use crate::version::types::Version;

/// Width a dependency line is padded to with dots
pub const DEPENDENCY_LINE_WIDTH: usize = 68;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportMode {
    /// Single recommended version per component
    Dependencies,
    /// Property style `${name} current -> winner` lines
    Properties,
    /// Newest version of each update tier
    Report,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Components that belong in the output of the given mode
pub fn select(report: &BatchReport, mode: ReportMode, show_all: bool) -> Vec<&ComponentUpdate> {
    report
        .updates
        .iter()
        .filter(|update| match mode {
            ReportMode::Dependencies => update.newer_recommendation().is_some(),
            ReportMode::Properties => true,
            ReportMode::Report => update.has_updates(show_all),
        })
        .collect()
}

pub fn render(
    report: &BatchReport,
    mode: ReportMode,
    format: OutputFormat,
    show_all: bool,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => render_json(report, mode, show_all),
        OutputFormat::Text => Ok(match mode {
            ReportMode::Dependencies => render_dependencies(report),
            ReportMode::Properties => render_properties(report),
            ReportMode::Report => render_summary(report, show_all),
        }),
    }
}

/// `g:a ........ 1.0 -> 2.0`, dotted out to [`DEPENDENCY_LINE_WIDTH`]
pub fn dependency_line(name: &str, current: &str, latest: &str) -> String {
    let mut line = format!("{} ", name);
    let padding = DEPENDENCY_LINE_WIDTH.saturating_sub(current.len() + latest.len() + 4);
    while line.len() < padding {
        line.push('.');
    }
    line.push_str(&format!(" {} -> {}", current, latest));
    line
}

pub fn render_dependencies(report: &BatchReport) -> String {
    let lines: Vec<String> = select(report, ReportMode::Dependencies, false)
        .into_iter()
        .filter_map(|update| {
            update.newer_recommendation().map(|latest| {
                dependency_line(
                    &update.coordinate.to_string(),
                    update.current.as_str(),
                    latest.as_str(),
                )
            })
        })
        .collect();

    if lines.is_empty() {
        return "All dependencies are using the latest versions.\n".to_string();
    }

    let mut out = String::from("The following dependency updates are available:\n");
    for line in lines {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn property_line(update: &ComponentUpdate) -> String {
    let name = update.display_name();
    match update.recommended() {
        Some(winner) if *winner != update.current => {
            format!("${{{}}} {} -> {}", name, update.current, winner)
        }
        _ => format!("${{{}}} = {}", name, update.current),
    }
}

pub fn render_properties(report: &BatchReport) -> String {
    select(report, ReportMode::Properties, false)
        .into_iter()
        .map(|update| format!("{}\n", property_line(update)))
        .collect()
}

fn tier_cell(update: &ComponentUpdate, segment: Segment) -> String {
    update
        .summary
        .latest(segment)
        .filter(|latest| {
            update
                .comparator
                .comparator()
                .is_newer(latest, &update.current)
        })
        .map(Version::to_string)
        .unwrap_or_else(|| "-".to_string())
}

/// Table of the newest version per tier
pub fn render_summary(report: &BatchReport, show_all: bool) -> String {
    let header = ["Component", "Current", "Incremental", "Minor", "Major"].map(String::from);
    let rows: Vec<[String; 5]> = select(report, ReportMode::Report, show_all)
        .into_iter()
        .map(|update| {
            [
                update.coordinate.to_string(),
                update.current.to_string(),
                tier_cell(update, Segment::Incremental),
                tier_cell(update, Segment::Minor),
                tier_cell(update, Segment::Major),
            ]
        })
        .collect();

    if rows.is_empty() {
        return "No updates available.\n".to_string();
    }

    let mut widths = header.clone().map(|cell| cell.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect();
            format!("{}\n", cells.join("  ").trim_end())
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    mode: ReportMode,
    updates: Vec<&'a ComponentUpdate>,
    failures: &'a [ComponentFailure],
}

pub fn render_json(
    report: &BatchReport,
    mode: ReportMode,
    show_all: bool,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        mode,
        updates: select(report, mode, show_all),
        failures: &report.failures,
    })
}
