//! The document renderer: turns a SOAP note or form draft into a paginated,
//! styled PDF.
//!
//! Composition order per page: colored header band (first page), shaded
//! patient box, the five content sections (title bar, recursive body, thin
//! border), shaded provider box, footer on every page. A page-break check
//! runs before every primitive that consumes vertical space.

pub mod context;
pub mod text;
pub mod vitals;

use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::config::{
    ACCENT, BLACK, DEFAULT_FONT_SIZE, DEFAULT_MARGIN_MM, HEADER_BAND_MM, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM, PANEL, WHITE,
};
use crate::error::ExportError;
use crate::note::{
    display_date, draft_sections, note_sections, parse_date_or_now, Node, NoteFormDraft, Section,
    SoapNote,
};
use context::RenderContext;
use text::{chars_for_width, humanize_label, wrap_text};

/// Vertical gap after the four main SOAP sections.
const SECTION_GAP_MM: f32 = 8.0;
/// Smaller gap after the chief-complaint line.
const COMPACT_GAP_MM: f32 = 4.0;
/// Height of a section title bar.
const SECTION_BAR_MM: f32 = 7.0;
/// Fixed left offset of scalar values relative to their label column.
const VALUE_COLUMN_MM: f32 = 42.0;
/// Indent step when recursing into a nested record.
const NEST_INDENT_MM: f32 = 6.0;

// ─── Options ──────────────────────────────────────────────────────────────────

/// Style and output options for one export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub margin_mm: f32,
    /// Base body font size in points.
    pub font_size: f32,
    /// Clinic block in the header; omitted entirely when the name is absent.
    pub clinic_name: Option<String>,
    pub clinic_address: Option<String>,
    /// Light background text on every page when set.
    pub watermark: Option<String>,
    /// Where `export_*` writes the file. Defaults to the downloads directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            margin_mm: DEFAULT_MARGIN_MM,
            font_size: DEFAULT_FONT_SIZE,
            clinic_name: None,
            clinic_address: None,
            watermark: None,
            output_dir: None,
        }
    }
}

// ─── Public operations ────────────────────────────────────────────────────────

/// Renders a persisted note to PDF bytes.
pub fn render_note(
    note: &SoapNote,
    patient_name: &str,
    opts: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let content = DocumentContent {
        title: "SOAP NOTE",
        patient_name,
        service_date: display_date(parse_date_or_now(note.date_of_service.as_deref())),
        sections: note_sections(note),
        provider_name: note.provider_name.as_deref(),
        created_display: display_date(parse_date_or_now(note.created_at.as_deref())),
    };
    compose(&content, opts).map(|r| r.bytes)
}

/// Renders an in-progress form draft to PDF bytes. Only sections with at
/// least one populated key appear.
pub fn render_form_draft(
    draft: &NoteFormDraft,
    patient_name: &str,
    opts: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let content = DocumentContent {
        title: "SOAP NOTE (DRAFT)",
        patient_name,
        service_date: display_date(parse_date_or_now(draft.date_of_service.as_deref())),
        sections: draft_sections(draft),
        provider_name: draft.provider_name.as_deref(),
        created_display: display_date(Local::now().date_naive()),
    };
    compose(&content, opts).map(|r| r.bytes)
}

/// Renders a note and writes it under the deterministic export filename.
/// Returns the written path.
pub fn export_note(
    note: &SoapNote,
    patient_name: &str,
    opts: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let bytes = render_note(note, patient_name, opts)?;
    write_export(&bytes, patient_name, opts)
}

/// [`export_note`] for a form draft.
pub fn export_form_draft(
    draft: &NoteFormDraft,
    patient_name: &str,
    opts: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let bytes = render_form_draft(draft, patient_name, opts)?;
    write_export(&bytes, patient_name, opts)
}

/// `SOAP_Note_<patient, whitespace → underscores>_<YYYY-MM-DD>.pdf`
pub fn export_filename(patient_name: &str) -> String {
    let safe: String = patient_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("SOAP_Note_{}_{}.pdf", safe, Local::now().format("%Y-%m-%d"))
}

fn write_export(
    bytes: &[u8],
    patient_name: &str,
    opts: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let dir = opts
        .output_dir
        .clone()
        .or_else(crate::config::default_export_dir)
        .ok_or(ExportError::NoExportDir)?;
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(export_filename(patient_name));
    std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "exported SOAP note PDF");
    Ok(path)
}

// ─── Composition ──────────────────────────────────────────────────────────────

struct DocumentContent<'a> {
    title: &'static str,
    patient_name: &'a str,
    service_date: String,
    sections: Vec<Section>,
    provider_name: Option<&'a str>,
    created_display: String,
}

struct Rendered {
    bytes: Vec<u8>,
    pages: usize,
}

fn compose(content: &DocumentContent, opts: &ExportOptions) -> Result<Rendered, ExportError> {
    tracing::debug!(sections = content.sections.len(), "rendering note document");

    let (doc, page, layer) = PdfDocument::new(
        content.title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let first_layer = doc.get_page(page).get_layer(layer);

    let generated_at = Local::now().format("%B %-d, %Y %H:%M").to_string();
    let mut ctx = RenderContext::new(
        &doc,
        first_layer,
        &regular,
        &bold,
        opts.margin_mm,
        opts.font_size,
        generated_at,
        opts.watermark.clone(),
    );

    draw_header(&mut ctx, content, opts);
    for section in &content.sections {
        draw_section(&mut ctx, section);
    }
    draw_provider_box(&mut ctx, content);

    let pages = ctx.page_count;
    ctx.finish();

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    tracing::debug!(pages, bytes = bytes.len(), "note document rendered");
    Ok(Rendered { bytes, pages })
}

/// Header band plus the shaded patient-information box.
fn draw_header(ctx: &mut RenderContext, content: &DocumentContent, opts: &ExportOptions) {
    ctx.filled_box(0.0, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, HEADER_BAND_MM, ACCENT);

    let band_top = PAGE_HEIGHT_MM;
    if let Some(clinic) = &opts.clinic_name {
        ctx.draw_text_at(clinic, 13.0, ctx.margin, band_top - 9.5, true, WHITE);
        if let Some(address) = &opts.clinic_address {
            ctx.draw_text_at(address, 8.5, ctx.margin, band_top - 15.0, false, WHITE);
        }
    }
    let right = PAGE_WIDTH_MM - ctx.margin;
    let title_x = right - text::approx_width_mm(content.title, 15.0);
    ctx.draw_text_at(content.title, 15.0, title_x, band_top - 10.0, true, WHITE);

    // Patient information box directly under the band.
    let box_h = 14.0;
    let top = PAGE_HEIGHT_MM - HEADER_BAND_MM - 3.0;
    ctx.filled_box(ctx.margin, top, ctx.content_width(), box_h, PANEL);
    ctx.draw_text_at(
        &format!("Patient: {}", content.patient_name),
        ctx.font_size + 0.5,
        ctx.margin + 3.0,
        top - 5.5,
        true,
        BLACK,
    );
    ctx.draw_text_at(
        &format!("Date of Service: {}", content.service_date),
        ctx.font_size - 0.5,
        ctx.margin + 3.0,
        top - 11.0,
        false,
        BLACK,
    );
    ctx.y = top - box_h - 7.0;
}

/// One titled section: accent title bar, recursive body, thin border around
/// the consumed region, then the inter-section gap.
fn draw_section(ctx: &mut RenderContext, section: &Section) {
    // Keep the bar and at least two content lines together.
    ctx.ensure_space(SECTION_BAR_MM + ctx.line_height() * 3.0);

    let top = ctx.y;
    ctx.filled_box(ctx.margin, top, ctx.content_width(), SECTION_BAR_MM, ACCENT);
    ctx.draw_text_at(
        section.title,
        ctx.font_size + 1.0,
        ctx.margin + 3.0,
        top - SECTION_BAR_MM + 2.0,
        true,
        WHITE,
    );
    ctx.y = top - SECTION_BAR_MM - ctx.line_height();

    let start_page = ctx.page_count;
    let content_top = ctx.y + ctx.line_height() * 0.6;
    render_node(ctx, &section.body, 4.0);

    // Border around the content on the page the section ends on. When the
    // body crossed a page break the border covers the portion on that page.
    let border_top = if ctx.page_count == start_page {
        content_top
    } else {
        PAGE_HEIGHT_MM - ctx.margin
    };
    let border_h = border_top - ctx.y;
    if border_h > 0.0 {
        ctx.stroke_box(ctx.margin, border_top, ctx.content_width(), border_h, ACCENT);
    }

    ctx.advance(if section.compact {
        COMPACT_GAP_MM
    } else {
        SECTION_GAP_MM
    });
}

/// Recursive body renderer. Visits every included field exactly once, in the
/// record's own order.
fn render_node(ctx: &mut RenderContext, node: &Node, indent: f32) {
    match node {
        Node::Map(fields) => {
            if vitals::is_vital_signs(fields) {
                vitals::draw_table(ctx, fields, indent);
                return;
            }
            for (key, value) in fields {
                if !value.is_included() {
                    continue;
                }
                match value {
                    Node::List(items) => {
                        draw_subsection_label(ctx, key, indent);
                        draw_bullets(ctx, items, indent + 2.0);
                        ctx.advance(ctx.line_height() * 0.6);
                    }
                    Node::Map(_) => {
                        draw_subsection_label(ctx, key, indent);
                        render_node(ctx, value, indent + NEST_INDENT_MM);
                    }
                    scalar => draw_scalar_field(ctx, key, scalar, indent),
                }
            }
        }
        Node::List(items) => draw_bullets(ctx, items, indent),
        scalar => {
            if let Some(body) = scalar.scalar_text() {
                draw_wrapped(ctx, &body, ctx.margin + indent);
            }
        }
    }
}

/// Shaded label bar above an array or nested-record subsection.
fn draw_subsection_label(ctx: &mut RenderContext, key: &str, indent: f32) {
    let bar_h = 6.0;
    ctx.ensure_space(bar_h + ctx.line_height() * 2.0);

    let x = ctx.margin + indent;
    let top = ctx.y;
    ctx.filled_box(x, top, ctx.content_width() - indent, bar_h, PANEL);
    ctx.draw_text_at(
        &humanize_label(key),
        ctx.font_size,
        x + 2.0,
        top - bar_h + 1.8,
        true,
        BLACK,
    );
    ctx.y = top - bar_h - ctx.line_height() * 0.8;
}

/// One bulleted line per array entry; entries that are records flatten to a
/// single `key: value, key: value` line first.
fn draw_bullets(ctx: &mut RenderContext, items: &[Node], indent: f32) {
    let bullet_x = ctx.margin + indent;
    let text_x = bullet_x + 4.0;
    let budget = chars_for_width(PAGE_WIDTH_MM - ctx.margin - text_x, ctx.font_size);

    for item in items {
        let flat = item.flattened();
        for (i, line) in wrap_text(&flat, budget).iter().enumerate() {
            ctx.ensure_space(ctx.line_height());
            if i == 0 {
                ctx.draw_text("·", ctx.font_size, bullet_x, false);
            }
            ctx.text_line(line, ctx.font_size, text_x, false);
        }
    }
}

/// Bold humanized label at a fixed offset; value inline when it fits,
/// otherwise wrapped from the next line at a smaller indent.
fn draw_scalar_field(ctx: &mut RenderContext, key: &str, value: &Node, indent: f32) {
    let label = format!("{}:", humanize_label(key));
    let value_text = value.scalar_text().unwrap_or_default();

    let label_x = ctx.margin + indent;
    let value_x = label_x + VALUE_COLUMN_MM;
    let inline_budget = chars_for_width(PAGE_WIDTH_MM - ctx.margin - value_x, ctx.font_size);

    ctx.ensure_space(ctx.line_height());
    if value_text.chars().count() <= inline_budget {
        ctx.draw_text(&label, ctx.font_size, label_x, true);
        ctx.text_line(&value_text, ctx.font_size, value_x, false);
    } else {
        ctx.text_line(&label, ctx.font_size, label_x, true);
        draw_wrapped(ctx, &value_text, label_x + 4.0);
    }
}

fn draw_wrapped(ctx: &mut RenderContext, body: &str, x: f32) {
    let budget = chars_for_width(PAGE_WIDTH_MM - ctx.margin - x, ctx.font_size);
    for line in wrap_text(body, budget) {
        ctx.ensure_space(ctx.line_height());
        ctx.text_line(&line, ctx.font_size, x, false);
    }
}

/// Shaded provider-information box after the last section.
fn draw_provider_box(ctx: &mut RenderContext, content: &DocumentContent) {
    let box_h = 13.0;
    ctx.ensure_space(box_h + 2.0);

    let top = ctx.y;
    ctx.filled_box(ctx.margin, top, ctx.content_width(), box_h, PANEL);
    if let Some(provider) = content.provider_name {
        ctx.draw_text_at(
            &format!("Provider: {provider}"),
            ctx.font_size,
            ctx.margin + 3.0,
            top - 5.0,
            true,
            BLACK,
        );
    }
    ctx.draw_text_at(
        &format!("Created: {}", content.created_display),
        ctx.font_size - 1.0,
        ctx.margin + 3.0,
        top - 10.0,
        false,
        BLACK,
    );
    ctx.y = top - box_h;
}

// ─── Tests ────────────────────────────────────────────────────────────────────
