use std::path::PathBuf;

/// Page format: A4 portrait, in millimeters.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Default page margin.
pub const DEFAULT_MARGIN_MM: f32 = 15.0;

/// Default base font size in points. Headings scale up from this.
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Vertical band above the bottom margin reserved for the footer.
/// Content never draws inside it; overflow checks break the page first.
pub const FOOTER_RESERVED_MM: f32 = 12.0;

/// Height of the colored header band on the first page.
pub const HEADER_BAND_MM: f32 = 24.0;

/// Accent color: header band, section title bars, footer rule.
pub const ACCENT: (f32, f32, f32) = (0.161, 0.502, 0.725); // #2980B9

/// Light neutral: patient/provider info boxes and subsection labels.
pub const PANEL: (f32, f32, f32) = (0.925, 0.941, 0.945); // #ECF0F1

pub const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
pub const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);

/// Gray used for the watermark text, when one is configured.
pub const WATERMARK_GRAY: (f32, f32, f32) = (0.85, 0.85, 0.85);

/// Default directory for exported PDFs: the platform downloads folder,
/// falling back to the home directory.
pub fn default_export_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(dirs::home_dir)
}
