use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Generator configuration. Every field has a default so hosts can pass `{}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Substring that marks a member type as a dynamic collection.
    pub collection_marker: String,
    /// Initialization-time hook the injection body is emitted into.
    pub init_hook: String,
    /// First-active-frame hook used when a unit requests deferred injection.
    pub play_hook: String,
    /// Append diagnostics to this file. Write failures are ignored.
    pub log_path: Option<PathBuf>,
    /// Skip units whose enclosing type is not declared partial.
    pub require_partial: bool,
    /// Generate units on the rayon pool.
    pub parallel: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            collection_marker: "List".to_string(),
            init_hook: "Awake".to_string(),
            play_hook: "Start".to_string(),
            log_path: None,
            require_partial: false,
            parallel: true,
        }
    }
}

impl GeneratorOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn hook(&self, deferred: bool) -> &str {
        if deferred {
            &self.play_hook
        } else {
            &self.init_hook
        }
    }
}
