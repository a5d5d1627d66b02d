//! Component catalogs: registries described in JSON or YAML.
//!
//! ```yaml
//! components:
//!   - symbol: org.apache.ctakes.core.ae.SentenceDetector
//!     kind: annotator
//!   - symbol: org.apache.ctakes.core.ae.Window
//!     kind: annotator
//!     description_args: [Size, Strict]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use piper_common::error::{PiperError, Result};
use piper_common::types::ComponentKind;

use crate::registry::{ComponentRegistry, NamedArgumentFactory};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Fully-qualified symbol.
    pub symbol: String,
    /// Component kind.
    pub kind: ComponentKind,
    /// Parameter names for `addDescription` values; absent means the
    /// component is not describable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_args: Option<Vec<String>>,
}

/// A list of components to register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Entries in file order.
    #[serde(default)]
    pub components: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parses a JSON catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Serialization`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Config`] on malformed YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| PiperError::Config {
            message: format!("invalid catalog: {e}"),
        })
    }

    /// Reads a catalog file; `.json` files are JSON, anything else YAML.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::Io`] if the file cannot be read, or a parse
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PiperError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        tracing::info!(
            path = %path.display(),
            components = catalog.components.len(),
            "loaded component catalog"
        );
        Ok(catalog)
    }

    /// Registers every entry into `registry`; later entries replace earlier
    /// ones with the same symbol.
    pub fn register_into(&self, registry: &mut ComponentRegistry) {
        for entry in &self.components {
            let _ = match &entry.description_args {
                Some(names) => registry.register_describable(
                    entry.symbol.clone(),
                    entry.kind,
                    NamedArgumentFactory::new(names.iter().cloned()),
                ),
                None => registry.register(entry.symbol.clone(), entry.kind),
            };
        }
    }

    /// Builds a registry holding exactly the catalog's components.
    #[must_use]
    pub fn into_registry(self) -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        self.register_into(&mut registry);
        registry
    }
}
