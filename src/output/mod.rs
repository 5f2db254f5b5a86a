//! Output module for presenting and exporting reports
//!
//! This module handles:
//! - Rendering the held report as a text table, with expanded rows in detail
//! - Building and writing the CSV export file

mod export;
mod table;

pub use export::{export_file_name, ExportArtifact, EXPORT_MIME_TYPE};
pub use table::{render_report, render_status};
