//! Mutable render state threaded through every drawing primitive.
//!
//! The cursor is a single vertical offset in millimeters, measured from the
//! bottom edge (printpdf's origin) and walked downward. Every primitive that
//! needs vertical space calls [`RenderContext::ensure_space`] first; when the
//! remaining space is short the footer is drawn on the current page and the
//! cursor resets to the top of a fresh one.

use printpdf::path::PaintMode;
use printpdf::{
    Color, IndirectFontRef, Line, Mm, PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};

use crate::config::{
    ACCENT, BLACK, FOOTER_RESERVED_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, WATERMARK_GRAY,
};
use crate::render::text::approx_width_mm;

/// Line height factor: millimeters of advance per point of font size.
const LINE_HEIGHT_FACTOR: f32 = 0.45;

pub struct RenderContext<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    /// Current vertical cursor, mm above the bottom edge.
    pub y: f32,
    pub page_count: usize,
    pub margin: f32,
    pub font_size: f32,
    generated_at: String,
    watermark: Option<String>,
}

pub fn color(rgb: (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(rgb.0, rgb.1, rgb.2, None))
}

impl<'a> RenderContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        doc: &'a PdfDocumentReference,
        layer: PdfLayerReference,
        regular: &'a IndirectFontRef,
        bold: &'a IndirectFontRef,
        margin: f32,
        font_size: f32,
        generated_at: String,
        watermark: Option<String>,
    ) -> Self {
        let ctx = RenderContext {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - margin,
            page_count: 1,
            margin,
            font_size,
            generated_at,
            watermark,
        };
        ctx.draw_watermark();
        ctx
    }

    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH_MM - 2.0 * self.margin
    }

    pub fn line_height(&self) -> f32 {
        line_height_for(self.font_size)
    }

    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Page-break check: runs before any primitive that needs `needed` mm.
    pub fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < self.margin + FOOTER_RESERVED_MM {
            self.break_page();
        }
    }

    /// Closes out the current page with its footer and starts a fresh one.
    pub fn break_page(&mut self) {
        self.draw_footer();
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_count += 1;
        self.y = PAGE_HEIGHT_MM - self.margin;
        tracing::debug!(page = self.page_count, "page break");
        self.draw_watermark();
    }

    /// Footer for the final page; call once, after all content.
    pub fn finish(self) {
        self.draw_footer();
    }

    // ─── Text primitives ──────────────────────────────────────────────────────

    /// Draws text at the current cursor without advancing it.
    pub fn draw_text(&self, text: &str, size: f32, x: f32, bold: bool) {
        self.draw_text_colored(text, size, x, bold, BLACK);
    }

    pub fn draw_text_colored(&self, text: &str, size: f32, x: f32, bold: bool, rgb: (f32, f32, f32)) {
        self.draw_text_at(text, size, x, self.y, bold, rgb);
    }

    /// Absolute-position draw, used by page furniture that ignores the cursor.
    pub fn draw_text_at(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, rgb: (f32, f32, f32)) {
        let font = if bold { self.bold } else { self.regular };
        self.layer.set_fill_color(color(rgb));
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
        self.layer.set_fill_color(color(BLACK));
    }

    /// Draws one line of text at the cursor, then advances one line height.
    pub fn text_line(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        self.draw_text(text, size, x, bold);
        self.advance(line_height_for(size));
    }

    // ─── Shape primitives ─────────────────────────────────────────────────────

    /// Filled rectangle; `top_y` is the upper edge.
    pub fn filled_box(&self, x: f32, top_y: f32, width: f32, height: f32, rgb: (f32, f32, f32)) {
        self.layer.set_fill_color(color(rgb));
        let rect = Rect::new(Mm(x), Mm(top_y - height), Mm(x + width), Mm(top_y));
        self.layer.add_rect(rect.with_mode(PaintMode::Fill));
        self.layer.set_fill_color(color(BLACK));
    }

    /// Thin outline rectangle, used for section borders.
    pub fn stroke_box(&self, x: f32, top_y: f32, width: f32, height: f32, rgb: (f32, f32, f32)) {
        self.layer.set_outline_color(color(rgb));
        self.layer.set_outline_thickness(0.2);
        let rect = Rect::new(Mm(x), Mm(top_y - height), Mm(x + width), Mm(top_y));
        self.layer.add_rect(rect.with_mode(PaintMode::Stroke));
    }

    pub fn hline(&self, x1: f32, x2: f32, y: f32, rgb: (f32, f32, f32)) {
        self.layer.set_outline_color(color(rgb));
        self.layer.set_outline_thickness(0.4);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    // ─── Page furniture ───────────────────────────────────────────────────────

    /// Footer: rule, generation timestamp, confidentiality marker, page
    /// number. The number reflects the page count at time of drawing.
    fn draw_footer(&self) {
        let rule_y = self.margin + 8.0;
        let text_y = self.margin + 4.0;
        let right = PAGE_WIDTH_MM - self.margin;

        self.hline(self.margin, right, rule_y, ACCENT);

        self.layer.set_fill_color(color(BLACK));
        self.layer.use_text(
            format!("Generated: {}", self.generated_at),
            7.0,
            Mm(self.margin),
            Mm(text_y),
            self.regular,
        );

        let marker = "Confidential Medical Record";
        let marker_x = right - approx_width_mm(marker, 7.0);
        self.layer
            .use_text(marker, 7.0, Mm(marker_x), Mm(text_y), self.regular);

        let page_label = format!("Page {}", self.page_count);
        let center_x = PAGE_WIDTH_MM / 2.0 - approx_width_mm(&page_label, 7.0) / 2.0;
        self.layer
            .use_text(page_label, 7.0, Mm(center_x), Mm(text_y), self.regular);
    }

    /// Light diagonal-free watermark behind the content, when configured.
    /// The original UI carries the option but never sets it.
    fn draw_watermark(&self) {
        if let Some(text) = &self.watermark {
            let size = 42.0;
            let x = PAGE_WIDTH_MM / 2.0 - approx_width_mm(text, size) / 2.0;
            self.layer.set_fill_color(color(WATERMARK_GRAY));
            self.layer
                .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT_MM / 2.0), self.bold);
            self.layer.set_fill_color(color(BLACK));
        }
    }
}

pub fn line_height_for(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_height_tracks_font_size() {
        assert!(line_height_for(10.0) > line_height_for(8.0));
        assert_eq!(line_height_for(10.0), 4.5);
    }
}
