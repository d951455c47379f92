//! Core types for property resolution.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Header naming the component a partial reload targets.
pub const PARTIAL_COMPONENT_HEADER: &str = "X-Monolikit-Partial-Component";

/// Header carrying the JSON-encoded list of dot-paths to include.
pub const ONLY_DATA_HEADER: &str = "X-Monolikit-Only-Data";

/// Header carrying the JSON-encoded list of dot-paths to exclude.
pub const EXCEPT_DATA_HEADER: &str = "X-Monolikit-Except-Data";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Key case enforced on selection paths or output keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    /// Keys pass through untouched.
    #[default]
    None,
    Camel,
    Snake,
}

impl Case {
    /// Parse a case name. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Case::None),
            "camel" => Some(Case::Camel),
            "snake" => Some(Case::Snake),
            _ => None,
        }
    }
}

/// Case enforcement for selection input and response output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForceCase {
    /// Applied to every segment of `only`/`except` paths before matching.
    #[serde(default, deserialize_with = "lenient_case")]
    pub input: Case,
    /// Applied to every key of the resolved output.
    #[serde(default, deserialize_with = "lenient_case")]
    pub output: Case,
}

/// Resolver configuration, passed explicitly to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub force_case: ForceCase,
}

impl ResolverConfig {
    /// Create a configuration that leaves every key as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the case applied to selection paths.
    pub fn input_case(mut self, case: Case) -> Self {
        self.force_case.input = case;
        self
    }

    /// Set the case applied to output keys.
    pub fn output_case(mut self, case: Case) -> Self {
        self.force_case.output = case;
        self
    }
}

/// Unknown or null case names mean "leave keys alone".
fn lenient_case<'de, D>(deserializer: D) -> Result<Case, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Case::parse).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn case_parse_valid() {
        assert_eq!(Case::parse("none"), Some(Case::None));
        assert_eq!(Case::parse("camel"), Some(Case::Camel));
        assert_eq!(Case::parse("Snake"), Some(Case::Snake));
    }

    #[test]
    fn case_parse_invalid() {
        assert_eq!(Case::parse("kebab"), None);
        assert_eq!(Case::parse(""), None);
    }

    #[test]
    fn config_deserializes_force_case() {
        let config: ResolverConfig = serde_json::from_value(json!({
            "force_case": { "input": "snake", "output": "camel" }
        }))
        .unwrap();
        assert_eq!(config.force_case.input, Case::Snake);
        assert_eq!(config.force_case.output, Case::Camel);
    }

    #[test]
    fn config_unknown_case_falls_back_to_none() {
        let config: ResolverConfig = serde_json::from_value(json!({
            "force_case": { "input": "kebab", "output": null }
        }))
        .unwrap();
        assert_eq!(config.force_case, ForceCase::default());
    }

    #[test]
    fn config_missing_fields_default() {
        let config: ResolverConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ResolverConfig::new());
    }

    #[test]
    fn config_builder() {
        let config = ResolverConfig::new()
            .input_case(Case::Camel)
            .output_case(Case::Snake);
        assert_eq!(config.force_case.input, Case::Camel);
        assert_eq!(config.force_case.output, Case::Snake);
    }
}
