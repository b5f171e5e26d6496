use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the exporter. The renderer itself validates nothing:
/// malformed dates fall back to "now" and missing sections are skipped, so
/// every variant here is an upstream failure (PDF library or filesystem).
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Cannot write export file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot determine an export directory")]
    NoExportDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
