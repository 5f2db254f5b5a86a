//! CSV export of the held report
//!
//! The export is built from the rows already in memory; no request is made.

use crate::codec::{encode, Report};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// MIME type of the export file
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// A ready-to-save export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    file_name: String,
    content: String,
}

impl ExportArtifact {
    /// Builds the export for a report
    ///
    /// # Example
    ///
    /// ```
    /// use crawl_report::codec::Report;
    /// use crawl_report::output::ExportArtifact;
    ///
    /// let artifact = ExportArtifact::from_report(&Report::new(), "goScraper");
    /// assert_eq!(artifact.file_name(), "goScraper_report.csv");
    /// assert_eq!(artifact.mime_type(), "text/csv");
    /// ```
    pub fn from_report(report: &Report, product: &str) -> Self {
        Self {
            file_name: export_file_name(product),
            content: encode(report),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        EXPORT_MIME_TYPE
    }

    /// The encoded report
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Writes the export into `dir` and returns the file path
    ///
    /// An existing file with the same name is overwritten.
    pub fn write_to(&self, dir: &Path) -> crate::Result<PathBuf> {
        let path = dir.join(&self.file_name);

        let mut file = File::create(&path)?;
        file.write_all(self.as_bytes())?;
        file.flush()?;

        tracing::info!("Exported {} bytes to {}", self.content.len(), path.display());
        Ok(path)
    }
}

/// File name of the export for a product
pub fn export_file_name(product: &str) -> String {
    format!("{}_report.csv", product)
}
