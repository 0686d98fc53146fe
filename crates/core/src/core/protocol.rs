//! Wire envelopes exchanged with the executor, one JSON document per text frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub message: String,
    pub context: RequestContext,
}

/// Execution context attached to every request. The values are owned by the
/// context provider and embedded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub hardware_preferences: Value,
    pub energy_constraints: Value,
    pub cost_limits: Value,
}

/// Executor → client.
///
/// Only `human_response` is required and typed. The remaining sections are
/// kept as raw JSON so an oddly shaped summary never costs the reply text;
/// use [`InboundResponse::summary`] and [`InboundResponse::feedback`] to read
/// them. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundResponse {
    pub human_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_feedback: Option<Value>,
    /// Set by the executor when it answered from its fallback path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Lenient view over an `execution_summary` section. Fields keep whatever
/// JSON the executor sent; a missing key reads as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    pub ueir_graph_id: Value,
    pub metrics: ExecutionMetrics,
    pub constraints_satisfied: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionMetrics {
    pub energy_joules: Value,
    pub cost_dollars: Value,
    pub performance_score: Value,
}

fn field(section: &Value, key: &str) -> Value {
    section.get(key).cloned().unwrap_or(Value::Null)
}

/// JavaScript truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy,
/// everything else (including `{}` and `[]`) is truthy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl ExecutionSummary {
    pub fn from_value(section: &Value) -> Self {
        let metrics = field(section, "metrics");
        Self {
            ueir_graph_id: field(section, "ueir_graph_id"),
            metrics: ExecutionMetrics {
                energy_joules: field(&metrics, "energy_joules"),
                cost_dollars: field(&metrics, "cost_dollars"),
                performance_score: field(&metrics, "performance_score"),
            },
            constraints_satisfied: is_truthy(&field(section, "constraints_satisfied")),
        }
    }
}

impl InboundResponse {
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// The execution summary, if the executor sent a truthy one.
    pub fn summary(&self) -> Option<ExecutionSummary> {
        self.execution_summary
            .as_ref()
            .filter(|v| is_truthy(v))
            .map(ExecutionSummary::from_value)
    }

    /// Learning feedback, if present and truthy. `{}` counts as present.
    pub fn feedback(&self) -> Option<&Value> {
        self.learning_feedback.as_ref().filter(|v| is_truthy(v))
    }
}

impl OutboundRequest {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
