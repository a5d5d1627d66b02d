//! Configuration model for the piper interpreter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tunables for one interpretation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Built-in namespaces searched after user namespaces, in order.
    pub builtin_namespaces: Vec<String>,
    /// Maximum nesting of `load` directives.
    pub max_load_depth: usize,
    /// Extension retried when a piper file is not found by its plain name.
    pub piper_extension: String,
    /// Extra filesystem roots searched for piper files.
    pub search_roots: Vec<PathBuf>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            builtin_namespaces: crate::constants::builtin_namespaces(),
            max_load_depth: crate::constants::DEFAULT_MAX_LOAD_DEPTH,
            piper_extension: crate::constants::PIPER_EXTENSION.to_string(),
            search_roots: Vec::new(),
        }
    }
}

impl InterpreterConfig {
    /// Parses a configuration from JSON text; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this model.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
