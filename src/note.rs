//! Input model for the PDF exporter: the persisted SOAP note, the in-progress
//! form draft, and the `Node` tree both are lowered into before rendering.
//!
//! Section payloads arrive as free-form JSON (the authoring UI stores them
//! schemaless). `Node` is the typed rendition: a scalar, an ordered list, or
//! an ordered record. Field order is the caller's insertion order and the
//! renderer visits every included field exactly once in that order.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Note types ───────────────────────────────────────────────────────────────

/// A persisted SOAP note as the practice backend returns it. Every field is
/// optional; the renderer skips what is missing rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoapNote {
    #[serde(default)]
    pub date_of_service: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub subjective_data: Option<Value>,
    #[serde(default)]
    pub objective_data: Option<Value>,
    #[serde(default)]
    pub assessment_data: Option<Value>,
    #[serde(default)]
    pub plan_data: Option<Value>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// An unsaved note straight from the authoring form. Same payload shapes as
/// [`SoapNote`] but nothing has been persisted yet, so there is no creation
/// timestamp; the export time is used instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFormDraft {
    #[serde(default)]
    pub date_of_service: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub subjective: Option<Value>,
    #[serde(default)]
    pub objective: Option<Value>,
    #[serde(default)]
    pub assessment: Option<Value>,
    #[serde(default)]
    pub plan: Option<Value>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

// ─── Node tree ────────────────────────────────────────────────────────────────

/// One node of a section payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<Node>),
    /// Ordered record; iteration order is the input's insertion order.
    Map(Vec<(String, Node)>),
}

impl Node {
    /// Lowers a JSON value. `null` has no node, mirroring the source app
    /// where null fields are simply never visited.
    pub fn from_value(value: &Value) -> Option<Node> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Node::Text(s.clone())),
            Value::Number(n) => Some(Node::Number(n.as_f64().unwrap_or(0.0))),
            Value::Bool(b) => Some(Node::Bool(*b)),
            Value::Array(items) => Some(Node::List(
                items.iter().filter_map(Node::from_value).collect(),
            )),
            Value::Object(fields) => Some(Node::Map(
                fields
                    .iter()
                    .filter_map(|(k, v)| Node::from_value(v).map(|n| (k.clone(), n)))
                    .collect(),
            )),
        }
    }

    /// Whether a field with this value is rendered at all.
    ///
    /// Mirrors the source's truthiness check exactly: empty strings and empty
    /// arrays are excluded, but numeric `0`, `false`, and empty records pass.
    pub fn is_included(&self) -> bool {
        match self {
            Node::Text(s) => !s.is_empty(),
            Node::Number(_) | Node::Bool(_) => true,
            Node::List(items) => !items.is_empty(),
            Node::Map(_) => true,
        }
    }

    /// Whether a whole section built from this node is visible. A section is
    /// invisible when its payload is an empty record or an empty string; this
    /// is a content-presence check, not a null check.
    pub fn has_content(&self) -> bool {
        match self {
            Node::Map(fields) => fields.iter().any(|(_, v)| v.is_included()),
            other => other.is_included(),
        }
    }

    /// Display text for a scalar node. `None` for lists and records.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Node::Text(s) => Some(s.clone()),
            Node::Number(n) => Some(format_number(*n)),
            Node::Bool(b) => Some(b.to_string()),
            Node::List(_) | Node::Map(_) => None,
        }
    }

    /// Single-line form of a list entry. Records flatten to
    /// `key: value, key: value` with raw keys; nested lists join on commas.
    pub fn flattened(&self) -> String {
        match self {
            Node::Map(fields) => fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v.flattened()))
                .collect::<Vec<_>>()
                .join(", "),
            Node::List(items) => items
                .iter()
                .map(Node::flattened)
                .collect::<Vec<_>>()
                .join(", "),
            scalar => scalar.scalar_text().unwrap_or_default(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e12 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ─── Section planning ─────────────────────────────────────────────────────────

/// One top-level block of the exported document, in render order.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: &'static str,
    pub body: Node,
    /// Chief complaint is a one-liner and takes the smaller inter-section gap.
    pub compact: bool,
}

/// The five ordered sections of a persisted note, already filtered down to
/// the ones with visible content.
pub fn note_sections(note: &SoapNote) -> Vec<Section> {
    plan_sections(
        note.chief_complaint.as_deref(),
        [
            ("SUBJECTIVE", note.subjective_data.as_ref()),
            ("OBJECTIVE", note.objective_data.as_ref()),
            ("ASSESSMENT", note.assessment_data.as_ref()),
            ("PLAN", note.plan_data.as_ref()),
        ],
    )
}

/// Section plan for an in-progress form draft. Same ordering and the same
/// presence rule: a section with no populated key never appears.
pub fn draft_sections(draft: &NoteFormDraft) -> Vec<Section> {
    plan_sections(
        draft.chief_complaint.as_deref(),
        [
            ("SUBJECTIVE", draft.subjective.as_ref()),
            ("OBJECTIVE", draft.objective.as_ref()),
            ("ASSESSMENT", draft.assessment.as_ref()),
            ("PLAN", draft.plan.as_ref()),
        ],
    )
}

fn plan_sections(
    chief_complaint: Option<&str>,
    payloads: [(&'static str, Option<&Value>); 4],
) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(cc) = chief_complaint {
        if !cc.is_empty() {
            sections.push(Section {
                title: "CHIEF COMPLAINT",
                body: Node::Text(cc.to_string()),
                compact: true,
            });
        }
    }

    for (title, payload) in payloads {
        if let Some(body) = payload.and_then(Node::from_value) {
            if body.has_content() {
                sections.push(Section {
                    title,
                    body,
                    compact: false,
                });
            }
        }
    }

    sections
}

// ─── Dates ────────────────────────────────────────────────────────────────────

/// Parses a stored date, falling back silently to today when it does not
/// parse. Intentional product behavior carried over from the source app: a
/// malformed `date_of_service` must never abort an export.
pub fn parse_date_or_now(raw: Option<&str>) -> NaiveDate {
    raw.and_then(parse_date).unwrap_or_else(|| Local::now().date_naive())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        // RFC 3339 timestamps keep the date as written, no timezone shifting.
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        // Timestamps like "2026-03-01 14:22:05" still carry a usable prefix.
        .or_else(|| {
            raw.get(..10)
                .and_then(|p| NaiveDate::parse_from_str(p, "%Y-%m-%d").ok())
        })
}

/// Long display form used in the patient and provider boxes.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn map_preserves_insertion_order() {
        let value = json!({"zebra": 1, "apple": 2, "mango": 3});
        let Some(Node::Map(fields)) = Node::from_value(&value) else {
            panic!("expected map");
        };
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn null_fields_have_no_node() {
        let value = json!({"kept": "x", "dropped": null});
        let Some(Node::Map(fields)) = Node::from_value(&value) else {
            panic!("expected map");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "kept");
    }

    #[test]
    fn zero_is_included_empty_string_is_not() {
        assert!(Node::Number(0.0).is_included());
        assert!(Node::Bool(false).is_included());
        assert!(!Node::Text(String::new()).is_included());
        assert!(!Node::List(vec![]).is_included());
        // Empty records pass the field-level check (JS truthiness parity)…
        assert!(Node::Map(vec![]).is_included());
        // …but fail the section-level content check.
        assert!(!Node::Map(vec![]).has_content());
    }

    #[test]
    fn section_with_only_empty_values_has_no_content() {
        let value = json!({"note": "", "tags": []});
        let node = Node::from_value(&value).unwrap();
        assert!(!node.has_content());
    }

    #[test]
    fn number_display_drops_float_noise() {
        assert_eq!(Node::Number(7.0).scalar_text().unwrap(), "7");
        assert_eq!(Node::Number(98.6).scalar_text().unwrap(), "98.6");
        assert_eq!(Node::Number(0.0).scalar_text().unwrap(), "0");
    }

    #[test]
    fn list_entry_records_flatten_to_one_line() {
        let value = json!({"name": "Ibuprofen", "dose": "400mg", "qty": 30});
        let node = Node::from_value(&value).unwrap();
        assert_eq!(node.flattened(), "name: Ibuprofen, dose: 400mg, qty: 30");
    }

    #[test]
    fn note_sections_skip_empty_records() {
        // Scenario from the export contract: only chief complaint,
        // subjective and assessment should survive.
        let note = SoapNote {
            chief_complaint: Some("Lower back pain".into()),
            subjective_data: Some(json!({"painScale": 7})),
            objective_data: Some(json!({})),
            assessment_data: Some(json!({"diagnoses": ["M54.5"]})),
            plan_data: Some(json!({})),
            ..Default::default()
        };
        let titles: Vec<&str> = note_sections(&note).iter().map(|s| s.title).collect();
        assert_eq!(titles, ["CHIEF COMPLAINT", "SUBJECTIVE", "ASSESSMENT"]);
    }

    #[test]
    fn chief_complaint_is_compact() {
        let note = SoapNote {
            chief_complaint: Some("Headache".into()),
            subjective_data: Some(json!({"onset": "2 days ago"})),
            ..Default::default()
        };
        let sections = note_sections(&note);
        assert!(sections[0].compact);
        assert!(!sections[1].compact);
    }

    #[test]
    fn string_section_payload_renders_as_text() {
        let note = SoapNote {
            plan_data: Some(json!("Follow up in two weeks.")),
            ..Default::default()
        };
        let sections = note_sections(&note);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, Node::Text("Follow up in two weeks.".into()));
    }

    #[test]
    fn draft_sections_use_form_field_names() {
        let draft = NoteFormDraft {
            subjective: Some(json!({"painScale": 4})),
            objective: Some(json!({})),
            ..Default::default()
        };
        let titles: Vec<&str> = draft_sections(&draft).iter().map(|s| s.title).collect();
        assert_eq!(titles, ["SUBJECTIVE"]);
    }

    #[test]
    fn iso_date_parses() {
        assert_eq!(
            parse_date_or_now(Some("2026-03-01")),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn rfc3339_date_parses() {
        assert_eq!(
            parse_date_or_now(Some("2026-03-01T09:30:00+00:00")),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn garbage_date_falls_back_to_today_without_panicking() {
        // Intentional silent fallback, not a bug: exports never fail on dates.
        let today = Local::now().date_naive();
        assert_eq!(parse_date_or_now(Some("not a date")), today);
        assert_eq!(parse_date_or_now(None), today);
    }

    #[test]
    fn timestamp_prefix_is_enough() {
        assert_eq!(
            parse_date_or_now(Some("2026-03-01 14:22:05")),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn display_date_is_long_form() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        assert_eq!(display_date(d), "February 5, 2026");
    }
}
