//! Per-request execution context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::protocol::RequestContext;

/// Supplies the current execution preferences each time a message is sent.
///
/// Values are opaque to the client; they are read at send time and embedded
/// into the request unchanged.
pub trait ContextProvider {
    fn hardware_preferences(&self) -> Value;
    fn energy_constraints(&self) -> Value;
    fn cost_limits(&self) -> Value;

    fn request_context(&self) -> RequestContext {
        RequestContext {
            hardware_preferences: self.hardware_preferences(),
            energy_constraints: self.energy_constraints(),
            cost_limits: self.cost_limits(),
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Preferences as stored in a config file or browser storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPreferences {
    #[serde(default = "empty_object")]
    pub hardware_preferences: Value,
    #[serde(default = "empty_object")]
    pub energy_constraints: Value,
    #[serde(default = "empty_object")]
    pub cost_limits: Value,
}

impl Default for ContextPreferences {
    fn default() -> Self {
        Self {
            hardware_preferences: empty_object(),
            energy_constraints: empty_object(),
            cost_limits: empty_object(),
        }
    }
}

/// A provider that always answers with the same preferences.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    prefs: ContextPreferences,
}

impl StaticContext {
    pub fn new(prefs: ContextPreferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> &ContextPreferences {
        &self.prefs
    }

    pub fn set_preferences(&mut self, prefs: ContextPreferences) {
        self.prefs = prefs;
    }
}

impl ContextProvider for StaticContext {
    fn hardware_preferences(&self) -> Value {
        self.prefs.hardware_preferences.clone()
    }

    fn energy_constraints(&self) -> Value {
        self.prefs.energy_constraints.clone()
    }

    fn cost_limits(&self) -> Value {
        self.prefs.cost_limits.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_preferences_fill_defaults() {
        let prefs: ContextPreferences =
            serde_json::from_value(json!({"cost_limits": {"max_dollars": 0.5}})).unwrap();
        assert_eq!(prefs.cost_limits["max_dollars"], 0.5);
        assert_eq!(prefs.hardware_preferences, json!({}));
        assert_eq!(prefs.energy_constraints, json!({}));
    }

    #[test]
    fn static_context_embeds_values_unchanged() {
        let prefs = ContextPreferences {
            hardware_preferences: json!(["fpga", "gpu"]),
            energy_constraints: json!({"max_joules": 10}),
            cost_limits: Value::Null,
        };
        let ctx = StaticContext::new(prefs).request_context();
        assert_eq!(ctx.hardware_preferences, json!(["fpga", "gpu"]));
        assert_eq!(ctx.energy_constraints, json!({"max_joules": 10}));
        assert_eq!(ctx.cost_limits, Value::Null);
    }
}
