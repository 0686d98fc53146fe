//! Fixed-format text the views paint. Values are interpolated verbatim; there
//! is no unit conversion or range checking.

use std::borrow::Cow;

use serde_json::Value;

use crate::protocol::ExecutionSummary;

pub const METRICS_TITLE: &str = "Execution Metrics";

/// Shown for a value the executor left out.
pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsList {
    pub title: String,
    pub items: Vec<String>,
}

impl MetricsList {
    pub fn from_summary(summary: &ExecutionSummary) -> Self {
        let m = &summary.metrics;
        Self {
            title: METRICS_TITLE.to_string(),
            items: vec![
                format!("Energy Used: {} J", display_value(&m.energy_joules)),
                format!("Cost: ${}", display_value(&m.cost_dollars)),
                format!("Performance Score: {}", display_value(&m.performance_score)),
                format!(
                    "Constraints Satisfied: {}",
                    yes_no(summary.constraints_satisfied)
                ),
            ],
        }
    }
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "Yes"
    } else {
        "No"
    }
}

/// Stand-in for a real graph view.
pub fn graph_placeholder(graph_id: &str) -> String {
    format!("UEIR graph {graph_id} (visualization not available)")
}

/// Flatten opaque learning feedback into display lines.
///
/// Objects become one `key: value` line per entry; any other value becomes a
/// single line. Strings are shown without JSON quotes.
pub fn learning_feedback_lines(feedback: &Value) -> Vec<String> {
    match feedback {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}: {}", display_value(v)))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![display_value(other).into_owned()],
    }
}

/// Render a JSON value the way a template literal would interpolate it:
/// strings without quotes, numbers in JavaScript notation, `null` or a
/// missing value as [`MISSING_VALUE`], containers as compact JSON.
pub fn display_value(v: &Value) -> Cow<'_, str> {
    match v {
        Value::Null => Cow::Borrowed(MISSING_VALUE),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => Cow::Owned(js_number(f)),
            _ => Cow::Owned(n.to_string()),
        },
        other => Cow::Owned(other.to_string()),
    }
}

/// `Number.prototype.toString` for finite doubles: plain decimal in
/// `[1e-6, 1e21)`, exponent form with an explicit sign outside it.
fn js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if !(1e-6..1e21).contains(&abs) {
        let s = format!("{f:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    f.to_string()
}

/// Neutralize control characters (other than newline and tab) so peer-supplied
/// text is shown as text on a terminal instead of being interpreted.
pub fn plain_text(text: &str) -> Cow<'_, str> {
    let is_unsafe = |c: char| c.is_control() && c != '\n' && c != '\t';
    if !text.chars().any(is_unsafe) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_unsafe(c) { '\u{FFFD}' } else { c })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(satisfied: bool) -> ExecutionSummary {
        ExecutionSummary::from_value(&json!({
            "ueir_graph_id": "g1",
            "metrics": {"energy_joules": 1.5, "cost_dollars": 0.02, "performance_score": 0.9},
            "constraints_satisfied": satisfied
        }))
    }

    #[test]
    fn metrics_list_has_fixed_format() {
        let list = MetricsList::from_summary(&summary(true));
        assert_eq!(list.title, "Execution Metrics");
        assert_eq!(
            list.items,
            vec![
                "Energy Used: 1.5 J",
                "Cost: $0.02",
                "Performance Score: 0.9",
                "Constraints Satisfied: Yes",
            ]
        );
        let list = MetricsList::from_summary(&summary(false));
        assert_eq!(list.items[3], "Constraints Satisfied: No");
    }

    #[test]
    fn metrics_interpolate_values_verbatim() {
        let list = MetricsList::from_summary(&ExecutionSummary::from_value(&json!({
            "metrics": {"energy_joules": "1.5", "cost_dollars": 3},
            "constraints_satisfied": "yes"
        })));
        assert_eq!(
            list.items,
            vec![
                "Energy Used: 1.5 J",
                "Cost: $3",
                "Performance Score: N/A",
                "Constraints Satisfied: Yes",
            ]
        );
    }

    #[test]
    fn numbers_follow_javascript_notation() {
        assert_eq!(display_value(&json!(1.5)), "1.5");
        assert_eq!(display_value(&json!(0.02)), "0.02");
        assert_eq!(display_value(&json!(1.0)), "1");
        assert_eq!(display_value(&json!(-0.0)), "0");
        assert_eq!(display_value(&json!(1e21)), "1e+21");
        assert_eq!(display_value(&json!(2.5e-7)), "2.5e-7");
        assert_eq!(display_value(&json!(0.000001)), "0.000001");
        assert_eq!(display_value(&json!(1e20)), "100000000000000000000");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(-7)), "-7");
        assert_eq!(display_value(&Value::Null), "N/A");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn feedback_lines_flatten_objects() {
        let lines = learning_feedback_lines(&json!({"adjustment": "prefer gpu", "delta": 0.1}));
        assert_eq!(lines, vec!["adjustment: prefer gpu", "delta: 0.1"]);
        assert!(learning_feedback_lines(&json!({})).is_empty());
        assert_eq!(learning_feedback_lines(&json!("retrained")), vec!["retrained"]);
    }

    #[test]
    fn plain_text_strips_escape_sequences() {
        assert_eq!(plain_text("ok\tfine\n"), "ok\tfine\n");
        assert_eq!(plain_text("\u{1b}[31mred"), "\u{FFFD}[31mred");
        assert!(matches!(plain_text("clean"), Cow::Borrowed(_)));
    }

    #[test]
    fn placeholder_names_graph() {
        assert!(graph_placeholder("g-42").contains("g-42"));
    }
}
