//! Plain-text rendering of a report
//!
//! One summary line per row; rows in the expansion set also get a detail block
//! with the full first paragraph and the link and image lists.

use crate::codec::{Report, ReportRow};
use crate::controller::{ExpansionSet, RequestLifecycle};

const URL_WIDTH: usize = 48;
const H1_WIDTH: usize = 28;

/// Renders the report as a text table
///
/// # Arguments
///
/// * `report` - The rows to render
/// * `expansion` - Which rows get a detail block
///
/// # Returns
///
/// The rendered table, ending in a newline
pub fn render_report(report: &Report, expansion: &ExpansionSet) -> String {
    if report.is_empty() {
        return "No rows.\n".to_string();
    }

    let index_width = report.len().saturating_sub(1).to_string().len();
    let mut out = String::new();

    out.push_str(&format!(
        "{:>iw$}   {:<uw$}  {:<hw$}  {:>5}  {:>6}\n",
        "#",
        "PAGE URL",
        "H1",
        "LINKS",
        "IMAGES",
        iw = index_width,
        uw = URL_WIDTH,
        hw = H1_WIDTH,
    ));

    for (index, row) in report.iter().enumerate() {
        let expanded = expansion.is_expanded(index);
        out.push_str(&format!(
            "{:>iw$} {} {:<uw$}  {:<hw$}  {:>5}  {:>6}\n",
            index,
            if expanded { '-' } else { '+' },
            truncate(&row.page_url, URL_WIDTH),
            truncate(&row.h1, H1_WIDTH),
            row.outgoing_links().len(),
            row.images().len(),
            iw = index_width,
            uw = URL_WIDTH,
            hw = H1_WIDTH,
        ));

        if expanded {
            render_details(&mut out, row, index_width + 3);
        }
    }

    out
}

fn render_details(out: &mut String, row: &ReportRow, indent: usize) {
    let pad = " ".repeat(indent);

    out.push_str(&format!("{}page url: {}\n", pad, row.page_url));
    out.push_str(&format!("{}h1: {}\n", pad, single_line(&row.h1)));
    out.push_str(&format!(
        "{}first paragraph: {}\n",
        pad,
        single_line(&row.first_paragraph)
    ));

    render_list(out, &pad, "outgoing links", &row.outgoing_links());
    render_list(out, &pad, "images", &row.images());
}

fn render_list(out: &mut String, pad: &str, label: &str, items: &[&str]) {
    if items.is_empty() {
        out.push_str(&format!("{}{}: (none)\n", pad, label));
        return;
    }

    out.push_str(&format!("{}{} ({}):\n", pad, label, items.len()));
    for item in items {
        out.push_str(&format!("{}  - {}\n", pad, item));
    }
}

/// One-line status text for the request lifecycle
pub fn render_status(lifecycle: &RequestLifecycle) -> String {
    match lifecycle {
        RequestLifecycle::Idle => "Ready.".to_string(),
        RequestLifecycle::Loading => "Crawling...".to_string(),
        RequestLifecycle::Succeeded { report, fetched_at } => format!(
            "{} rows fetched at {}",
            report.len(),
            fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        RequestLifecycle::Failed { message } => format!("Error: {}", message),
    }
}

/// Collapses line breaks so a value stays on one line
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to `width` characters, marking the cut with `…`
fn truncate(value: &str, width: usize) -> String {
    let value = single_line(value);
    if value.chars().count() <= width {
        return value;
    }
    let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
