//! Index-level administration: what an index looks like when created, and
//! how the workflow gets it into a known state.

pub mod lifecycle;

pub use lifecycle::{Ensured, IndexLifecycle, ResetPolicy};

use serde_json::{Map, Value};

/// Settings and mappings sent with a create-index call. Both are optional;
/// an empty definition lets the cluster apply its defaults and dynamic
/// mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDefinition {
    pub settings: Option<Value>,
    pub mappings: Option<Value>,
}

impl IndexDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_mappings(mut self, mappings: Value) -> Self {
        self.mappings = Some(mappings);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_none() && self.mappings.is_none()
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(settings) = &self.settings {
            body.insert("settings".to_string(), settings.clone());
        }
        if let Some(mappings) = &self.mappings {
            body.insert("mappings".to_string(), mappings.clone());
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_definition() {
        let def = IndexDefinition::new();
        assert!(def.is_empty());
        assert_eq!(def.to_json(), json!({}));
    }

    #[test]
    fn test_definition_body() {
        let def = IndexDefinition::new()
            .with_settings(json!({"number_of_shards": 1}))
            .with_mappings(json!({"properties": {"seq": {"type": "long"}}}));
        assert!(!def.is_empty());
        let body = def.to_json();
        assert_eq!(body["settings"]["number_of_shards"], 1);
        assert_eq!(body["mappings"]["properties"]["seq"]["type"], "long");
    }
}
