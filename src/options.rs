use crate::{
    result::{Result, ScriptError},
    splitter::{BlockNesting, SplitOptions},
};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_omit_trailing_semicolon() -> bool {
    true
}

/// Execution options for scripts and SQL strings, loadable from JSON
///
/// ```json
/// { "sans_tran": false, "omit_trailing_semicolon": true, "block_nesting": "nested" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptOptions {
    /// Run without an explicit transaction; each statement is committed on its own
    #[serde(default)]
    pub sans_tran: bool,
    /// Strip the trailing `;` of each statement before submission. Statements ending in a
    /// block terminator (`END;`) always keep it.
    #[serde(default = "default_omit_trailing_semicolon")]
    pub omit_trailing_semicolon: bool,
    #[serde(default)]
    pub block_nesting: BlockNesting,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            sans_tran: false,
            omit_trailing_semicolon: default_omit_trailing_semicolon(),
            block_nesting: BlockNesting::default(),
        }
    }
}

impl ScriptOptions {
    /// Load options from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let json: serde_json::Value = serde_json::from_str(&content)?;
        Self::from_json(json)
    }

    /// Load options from a serde_json::Value object
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        if !json.is_object() {
            return Err(ScriptError::new_invalid_input(format!(
                "script options must be a JSON object, got {json}"
            )));
        }
        Ok(serde_json::from_value(json)?)
    }

    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            block_nesting: self.block_nesting,
        }
    }

    pub fn with_sans_tran(mut self, sans_tran: bool) -> Self {
        self.sans_tran = sans_tran;
        self
    }

    pub fn with_omit_trailing_semicolon(mut self, omit: bool) -> Self {
        self.omit_trailing_semicolon = omit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = ScriptOptions::default();
        assert!(!options.sans_tran);
        assert!(options.omit_trailing_semicolon);
        assert_eq!(options.block_nesting, BlockNesting::Nested);
    }

    #[test]
    fn test_from_json_empty_object_uses_defaults() {
        let options = ScriptOptions::from_json(json!({})).unwrap();
        assert_eq!(options, ScriptOptions::default());
    }

    #[test]
    fn test_from_json_all_fields() {
        let options = ScriptOptions::from_json(json!({
            "sans_tran": true,
            "omit_trailing_semicolon": false,
            "block_nesting": "flat"
        }))
        .unwrap();
        assert!(options.sans_tran);
        assert!(!options.omit_trailing_semicolon);
        assert_eq!(options.split_options().block_nesting, BlockNesting::Flat);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let result = ScriptOptions::from_json(json!(["sans_tran"]));
        assert!(matches!(result, Err(ScriptError::InvalidInput(_))));
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        let result = ScriptOptions::from_json(json!({"sansTran": true}));
        assert!(matches!(result, Err(ScriptError::Json(_))));
    }

    #[test]
    fn test_from_json_rejects_unknown_nesting() {
        let result = ScriptOptions::from_json(json!({"block_nesting": "deep"}));
        assert!(matches!(result, Err(ScriptError::Json(_))));
    }
}
