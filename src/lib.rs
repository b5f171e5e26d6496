//! PDF export for SOAP clinical notes.
//!
//! Converts a persisted note or an in-progress form draft (flat metadata plus
//! four schemaless section payloads) into a paginated, styled PDF: colored
//! header band, patient and provider boxes, recursive section rendering with
//! a specialized vital-signs table, automatic page breaks, and a footer on
//! every page. Files land under a deterministic
//! `SOAP_Note_<Patient_Name>_<YYYY-MM-DD>.pdf` name.
//!
//! The renderer validates nothing: missing sections are skipped and malformed
//! dates silently fall back to the current date. Errors only surface from the
//! PDF library or the filesystem.

pub mod config;
pub mod error;
pub mod note;
pub mod render;

pub use error::ExportError;
pub use note::{Node, NoteFormDraft, SoapNote};
pub use render::{
    export_filename, export_form_draft, export_note, render_form_draft, render_note,
    ExportOptions,
};
