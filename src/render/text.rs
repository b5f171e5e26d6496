//! Text layout helpers: word wrap against a character budget and field-name
//! humanization.
//!
//! printpdf's built-in Helvetica exposes no glyph metrics, so widths are
//! approximated from an average glyph advance. Good enough for wrapping and
//! alignment; exact typography is not part of the export contract.

/// Average Helvetica glyph advance, in em.
const AVG_GLYPH_EM: f32 = 0.5;

/// Points to millimeters.
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Approximate rendered width of `text` at `font_size` points.
pub fn approx_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_GLYPH_EM * PT_TO_MM
}

/// How many characters fit into `width_mm` at `font_size` points.
pub fn chars_for_width(width_mm: f32, font_size: f32) -> usize {
    let per_char = font_size * AVG_GLYPH_EM * PT_TO_MM;
    ((width_mm / per_char).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than the budget get a line of their own
/// rather than being split. Always returns at least one line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !current.is_empty() && current.chars().count() + word_len + 1 > max_chars {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Converts a camelCase or snake_case field key into a space-separated,
/// title-cased label.
///
/// One rule covers snake, camel and mixed keys: split on underscores, hyphens
/// and whitespace, then on every lowercase-or-digit to uppercase boundary;
/// uppercase the first letter of each word and leave the rest untouched.
/// `bloodPressure` → "Blood Pressure", `pain_scale` → "Pain Scale",
/// `patientID` → "Patient ID".
pub fn humanize_label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in key.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if c.is_uppercase() {
            if let Some(p) = prev {
                if p.is_lowercase() || p.is_ascii_digit() {
                    words.push(std::mem::take(&mut current));
                }
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
