//! Resolution of bare or qualified component names.
//!
//! Search order is fixed and first match wins:
//! 1. the name itself, as a fully-qualified symbol;
//! 2. `<user namespace>.<name>` for each user namespace, in declaration order;
//! 3. for each built-in namespace, in order, the capability-specific
//!    sub-namespaces (`.cr` for readers; `.ae` then `.cc` for analysis
//!    components) followed by the bare namespace.

use piper_common::error::{PiperError, Result};
use piper_common::types::Capability;

use crate::registry::{ComponentRegistry, ComponentSymbol};

/// Resolves component names against a registry and ordered namespaces.
#[derive(Debug, Clone)]
pub struct ComponentResolver {
    registry: ComponentRegistry,
    builtin_namespaces: Vec<String>,
}

impl ComponentResolver {
    /// Creates a resolver over `registry` with fixed built-in namespaces.
    #[must_use]
    pub const fn new(registry: ComponentRegistry, builtin_namespaces: Vec<String>) -> Self {
        Self {
            registry,
            builtin_namespaces,
        }
    }

    /// The underlying registry.
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The built-in namespaces, in search order.
    pub fn builtin_namespaces(&self) -> &[String] {
        &self.builtin_namespaces
    }

    /// Replaces the built-in namespaces.
    pub fn set_builtin_namespaces(&mut self, namespaces: Vec<String>) {
        self.builtin_namespaces = namespaces;
    }

    /// Every fully-qualified symbol tried for `name`, in search order.
    pub fn candidates(
        &self,
        name: &str,
        capability: Capability,
        user_namespaces: &[String],
    ) -> Vec<String> {
        let mut candidates = vec![name.to_string()];
        candidates.extend(user_namespaces.iter().map(|ns| format!("{ns}.{name}")));
        for ns in &self.builtin_namespaces {
            for suffix in capability.builtin_suffixes() {
                candidates.push(format!("{ns}{suffix}.{name}"));
            }
        }
        candidates
    }

    /// Resolves `name` to a component satisfying `capability`.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::CapabilityMismatch`] if `name` is itself a
    /// registered symbol of the wrong kind and no namespace yields a match,
    /// and [`PiperError::SymbolNotFound`] if nothing matches at all.
    pub fn resolve(
        &self,
        name: &str,
        capability: Capability,
        user_namespaces: &[String],
    ) -> Result<ComponentSymbol> {
        for candidate in self.candidates(name, capability, user_namespaces) {
            if let Some(symbol) = self.registry.get(&candidate) {
                if symbol.kind().satisfies(capability) {
                    tracing::debug!(name, symbol = symbol.name(), "resolved component");
                    return Ok(symbol.clone());
                }
                tracing::debug!(
                    symbol = symbol.name(),
                    kind = %symbol.kind(),
                    %capability,
                    "skipping component of the wrong kind"
                );
            }
        }

        if self.registry.get(name).is_some() {
            return Err(PiperError::CapabilityMismatch {
                symbol: name.to_string(),
                capability,
            });
        }
        Err(PiperError::SymbolNotFound {
            name: name.to_string(),
            capability,
        })
    }
}

#[cfg(test)]
mod tests {
    use piper_common::types::ComponentKind;

    use super::*;

    fn resolver(registry: ComponentRegistry) -> ComponentResolver {
        ComponentResolver::new(
            registry,
            vec!["org.apache.ctakes.core".into(), "org.apache.ctakes.temporal".into()],
        )
    }

    #[test]
    fn fully_qualified_name_resolves_directly() {
        let r = resolver(
            ComponentRegistry::new().with_component("com.acme.Tagger", ComponentKind::Annotator),
        );
        let symbol = r
            .resolve("com.acme.Tagger", Capability::AnalysisComponent, &[])
            .expect("should resolve");
        assert_eq!(symbol.name(), "com.acme.Tagger");
    }

    #[test]
    fn user_namespaces_win_over_builtins() {
        let r = resolver(
            ComponentRegistry::new()
                .with_component("org.apache.ctakes.core.ae.Tagger", ComponentKind::Annotator)
                .with_component("com.acme.Tagger", ComponentKind::Annotator),
        );
        let symbol = r
            .resolve("Tagger", Capability::AnalysisComponent, &["com.acme".into()])
            .expect("should resolve");
        assert_eq!(symbol.name(), "com.acme.Tagger");
    }

    #[test]
    fn earlier_user_namespace_wins() {
        let r = resolver(
            ComponentRegistry::new()
                .with_component("first.Tagger", ComponentKind::Annotator)
                .with_component("second.Tagger", ComponentKind::Annotator),
        );
        let namespaces = vec!["second".to_string(), "first".to_string()];
        let symbol = r
            .resolve("Tagger", Capability::AnalysisComponent, &namespaces)
            .expect("should resolve");
        assert_eq!(symbol.name(), "second.Tagger");
    }

    #[test]
    fn builtin_ae_before_cc_before_bare() {
        let r = resolver(
            ComponentRegistry::new()
                .with_component("org.apache.ctakes.core.Writer", ComponentKind::Consumer)
                .with_component("org.apache.ctakes.core.cc.Writer", ComponentKind::Consumer),
        );
        let symbol = r
            .resolve("Writer", Capability::AnalysisComponent, &[])
            .expect("should resolve");
        assert_eq!(symbol.name(), "org.apache.ctakes.core.cc.Writer");
    }

    #[test]
    fn builtin_namespace_order_is_respected() {
        let r = resolver(
            ComponentRegistry::new()
                .with_component("org.apache.ctakes.temporal.ae.Event", ComponentKind::Annotator)
                .with_component("org.apache.ctakes.core.Event", ComponentKind::Annotator),
        );
        let symbol = r
            .resolve("Event", Capability::AnalysisComponent, &[])
            .expect("should resolve");
        assert_eq!(symbol.name(), "org.apache.ctakes.core.Event");
    }

    #[test]
    fn reader_capability_searches_cr() {
        let r = resolver(
            ComponentRegistry::new()
                .with_component("org.apache.ctakes.core.ae.Files", ComponentKind::Annotator)
                .with_component("org.apache.ctakes.core.cr.Files", ComponentKind::Reader),
        );
        let symbol = r
            .resolve("Files", Capability::Reader, &[])
            .expect("should resolve");
        assert_eq!(symbol.name(), "org.apache.ctakes.core.cr.Files");
    }

    #[test]
    fn wrong_kind_is_skipped_during_search() {
        let r = resolver(
            ComponentRegistry::new()
                .with_component("com.acme.Files", ComponentKind::Annotator)
                .with_component("org.apache.ctakes.core.cr.Files", ComponentKind::Reader),
        );
        let symbol = r
            .resolve("Files", Capability::Reader, &["com.acme".into()])
            .expect("should resolve");
        assert_eq!(symbol.name(), "org.apache.ctakes.core.cr.Files");
    }

    #[test]
    fn qualified_symbol_of_wrong_kind_is_a_mismatch() {
        let r = resolver(
            ComponentRegistry::new().with_component("com.acme.Files", ComponentKind::Reader),
        );
        let err = r
            .resolve("com.acme.Files", Capability::AnalysisComponent, &[])
            .unwrap_err();
        assert!(matches!(err, PiperError::CapabilityMismatch { .. }), "got: {err}");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let r = resolver(ComponentRegistry::new());
        let err = r
            .resolve("Nope", Capability::AnalysisComponent, &["com.acme".into()])
            .unwrap_err();
        assert!(
            matches!(err, PiperError::SymbolNotFound { ref name, capability: Capability::AnalysisComponent } if name == "Nope")
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn candidates_follow_search_order() {
        let r = resolver(ComponentRegistry::new());
        let candidates = r.candidates("X", Capability::Reader, &["u".into()]);
        assert_eq!(
            candidates,
            vec![
                "X",
                "u.X",
                "org.apache.ctakes.core.cr.X",
                "org.apache.ctakes.core.X",
                "org.apache.ctakes.temporal.cr.X",
                "org.apache.ctakes.temporal.X",
            ]
        );
    }
}
