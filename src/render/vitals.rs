//! Specialized two-column table for the vital-signs record shape.
//!
//! Detection is a heuristic, not a schema check: any record whose top-level
//! keys intersect the fixed field set below is treated as vital signs and
//! rendered as a table instead of generic label/value lines. The shallowness
//! is deliberate and matches the source application.

use crate::note::Node;
use crate::render::context::RenderContext;

/// The recognized vital fields, in render order, with display label and unit.
pub const VITAL_FIELDS: &[(&str, &str, &str)] = &[
    ("bloodPressure", "Blood Pressure", "mmHg"),
    ("heartRate", "Heart Rate", "bpm"),
    ("temperature", "Temperature", "°F"),
    ("respiratoryRate", "Respiratory Rate", "breaths/min"),
    ("oxygenSaturation", "Oxygen Saturation", "%"),
    ("weight", "Weight", "lbs"),
    ("height", "Height", "in"),
    ("bmi", "BMI", ""),
];

/// Shallow key-membership test over [`VITAL_FIELDS`].
pub fn is_vital_signs(fields: &[(String, Node)]) -> bool {
    fields
        .iter()
        .any(|(key, _)| VITAL_FIELDS.iter().any(|(known, _, _)| known == key))
}

/// Cell texts in fixed field order, skipping fields absent from the record.
/// Each cell reads `Label: value unit`.
pub fn vital_cells(fields: &[(String, Node)]) -> Vec<String> {
    VITAL_FIELDS
        .iter()
        .filter_map(|(key, label, unit)| {
            fields
                .iter()
                .find(|(k, v)| k == key && v.is_included())
                .map(|(_, v)| {
                    let value = v.flattened();
                    if unit.is_empty() {
                        format!("{label}: {value}")
                    } else {
                        format!("{label}: {value} {unit}")
                    }
                })
        })
        .collect()
}

/// Lays the present fields out two per row, left-to-right then
/// top-to-bottom. A dangling cell in the final row advances the cursor by a
/// half row.
pub fn draw_table(ctx: &mut RenderContext, fields: &[(String, Node)], indent: f32) {
    let cells = vital_cells(fields);
    if cells.is_empty() {
        return;
    }

    let row_height = ctx.line_height() + 2.0;
    let col_width = (ctx.content_width() - indent) / 2.0;
    let left_x = ctx.margin + indent;

    for row in cells.chunks(2) {
        ctx.ensure_space(row_height);
        ctx.draw_text(&row[0], ctx.font_size - 1.0, left_x, false);
        if let Some(right) = row.get(1) {
            ctx.draw_text(right, ctx.font_size - 1.0, left_x + col_width, false);
        }
        let step = if row.len() == 2 {
            row_height
        } else {
            row_height / 2.0
        };
        ctx.advance(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields_of(value: serde_json::Value) -> Vec<(String, Node)> {
        match Node::from_value(&value) {
            Some(Node::Map(fields)) => fields,
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn any_known_key_triggers_detection() {
        assert!(is_vital_signs(&fields_of(json!({"bloodPressure": "120/80"}))));
        assert!(is_vital_signs(&fields_of(json!({"heartRate": 72, "extra": "x"}))));
        assert!(is_vital_signs(&fields_of(json!({"bmi": 24.2}))));
    }

    #[test]
    fn unrelated_records_are_not_vitals() {
        assert!(!is_vital_signs(&fields_of(json!({"painScale": 7, "onset": "today"}))));
        assert!(!is_vital_signs(&fields_of(json!({}))));
    }

    #[test]
    fn detection_is_shallow_only() {
        // A known key nested one level down must NOT trigger the table.
        let fields = fields_of(json!({"exam": {"heartRate": 72}}));
        assert!(!is_vital_signs(&fields));
    }

    #[test]
    fn cells_follow_fixed_field_order() {
        // Input order is weight-first; output follows VITAL_FIELDS order.
        let fields = fields_of(json!({"weight": 180, "bloodPressure": "120/80"}));
        let cells = vital_cells(&fields);
        assert_eq!(cells, ["Blood Pressure: 120/80 mmHg", "Weight: 180 lbs"]);
    }

    #[test]
    fn absent_fields_are_skipped() {
        let fields = fields_of(json!({"heartRate": "72", "oxygenSaturation": "98"}));
        let cells = vital_cells(&fields);
        assert_eq!(cells, ["Heart Rate: 72 bpm", "Oxygen Saturation: 98 %"]);
    }

    #[test]
    fn bmi_has_no_unit_suffix() {
        let cells = vital_cells(&fields_of(json!({"bmi": 24.2})));
        assert_eq!(cells, ["BMI: 24.2"]);
    }

    #[test]
    fn empty_string_vitals_are_dropped() {
        let cells = vital_cells(&fields_of(json!({"heartRate": "", "weight": 180})));
        assert_eq!(cells, ["Weight: 180 lbs"]);
    }

    #[test]
    fn unknown_keys_never_produce_cells() {
        let fields = fields_of(json!({"heartRate": 72, "mood": "fine"}));
        let cells = vital_cells(&fields);
        assert_eq!(cells.len(), 1);
    }
}
