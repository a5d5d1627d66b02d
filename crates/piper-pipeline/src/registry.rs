//! Explicit registry of pipeline components.
//!
//! Components are registered under their fully-qualified symbol
//! (`namespace.Name`) together with their kind and, optionally, a factory
//! able to produce a component description for `addDescription`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use piper_common::error::{PiperError, Result};
use piper_common::types::{ComponentKind, Parameter, ParameterList, ParameterValue};

/// A ready-made component description produced by a factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Symbol of the described component.
    pub component: String,
    /// Parameters baked into the description.
    pub parameters: ParameterList,
}

impl Description {
    /// Creates a description without parameters.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            parameters: ParameterList::new(),
        }
    }

    /// Adds a parameter, returning the description.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: ParameterValue) -> Self {
        self.parameters.push(Parameter::new(key, value));
        self
    }
}

/// Entry points producing a [`Description`] for a describable component.
///
/// Both forms default to reporting a missing entry point, so implementors
/// provide only the forms they support.
pub trait DescriptionFactory: fmt::Debug + Send + Sync {
    /// The no-argument form.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::DescriptionFactory`] if the form is unsupported
    /// or creation fails.
    fn describe(&self, symbol: &str) -> Result<Description> {
        Err(factory_error(symbol, "no no-argument description factory"))
    }

    /// The typed-argument form.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::DescriptionFactory`] if the form is unsupported,
    /// the values do not fit, or creation fails.
    fn describe_with(&self, symbol: &str, values: &[ParameterValue]) -> Result<Description> {
        let _ = values;
        Err(factory_error(
            symbol,
            "no description factory accepting arguments",
        ))
    }
}

fn factory_error(symbol: &str, message: impl Into<String>) -> PiperError {
    PiperError::DescriptionFactory {
        symbol: symbol.to_string(),
        message: message.into(),
    }
}

/// Factory mapping positional values onto declared parameter names.
///
/// The no-argument form yields a description without parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedArgumentFactory {
    names: Vec<String>,
}

impl NamedArgumentFactory {
    /// Creates a factory taking the given parameter names, in order.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl DescriptionFactory for NamedArgumentFactory {
    fn describe(&self, symbol: &str) -> Result<Description> {
        Ok(Description::new(symbol))
    }

    fn describe_with(&self, symbol: &str, values: &[ParameterValue]) -> Result<Description> {
        if values.len() != self.names.len() {
            return Err(factory_error(
                symbol,
                format!(
                    "expected {} value(s) ({}), got {}",
                    self.names.len(),
                    self.names.join(", "),
                    values.len()
                ),
            ));
        }
        Ok(Description {
            component: symbol.to_string(),
            parameters: self
                .names
                .iter()
                .zip(values)
                .map(|(name, value)| Parameter::new(name.clone(), value.clone()))
                .collect(),
        })
    }
}

type DescribeFn = dyn Fn(&str, &[ParameterValue]) -> Result<Description> + Send + Sync;

/// Factory backed by a closure receiving the symbol and all values.
///
/// The closure serves both forms; the no-argument form passes no values.
pub struct DescriptionFn {
    inner: Box<DescribeFn>,
}

impl DescriptionFn {
    /// Wraps a closure as a factory.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &[ParameterValue]) -> Result<Description> + Send + Sync + 'static,
    {
        Self { inner: Box::new(f) }
    }
}

impl fmt::Debug for DescriptionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DescriptionFn")
    }
}

impl DescriptionFactory for DescriptionFn {
    fn describe(&self, symbol: &str) -> Result<Description> {
        (self.inner)(symbol, &[])
    }

    fn describe_with(&self, symbol: &str, values: &[ParameterValue]) -> Result<Description> {
        (self.inner)(symbol, values)
    }
}

/// A registered component, as handed out by the resolver.
#[derive(Debug, Clone)]
pub struct ComponentSymbol {
    name: String,
    kind: ComponentKind,
    factory: Option<Arc<dyn DescriptionFactory>>,
}

impl ComponentSymbol {
    /// Fully-qualified symbol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last dotted segment of the symbol.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Concrete component kind.
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Whether a description factory is registered.
    pub const fn is_describable(&self) -> bool {
        self.factory.is_some()
    }

    /// Invokes the description factory: the no-argument form for empty
    /// `values`, the typed form otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::DescriptionFactory`] if no factory is registered
    /// or the factory fails.
    pub fn describe(&self, values: &[ParameterValue]) -> Result<Description> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| factory_error(&self.name, "component is not describable"))?;
        if values.is_empty() {
            factory.describe(&self.name)
        } else {
            factory.describe_with(&self.name, values)
        }
    }
}

/// Mapping from fully-qualified symbol to component.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentSymbol>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component, returning the one it replaces.
    pub fn register(
        &mut self,
        symbol: impl Into<String>,
        kind: ComponentKind,
    ) -> Option<ComponentSymbol> {
        self.insert(symbol.into(), kind, None)
    }

    /// Registers a component with a description factory.
    pub fn register_describable(
        &mut self,
        symbol: impl Into<String>,
        kind: ComponentKind,
        factory: impl DescriptionFactory + 'static,
    ) -> Option<ComponentSymbol> {
        let factory: Arc<dyn DescriptionFactory> = Arc::new(factory);
        self.insert(symbol.into(), kind, Some(factory))
    }

    /// Adds a component, returning the registry.
    #[must_use]
    pub fn with_component(mut self, symbol: impl Into<String>, kind: ComponentKind) -> Self {
        let _ = self.register(symbol, kind);
        self
    }

    /// Adds a describable component, returning the registry.
    #[must_use]
    pub fn with_describable(
        mut self,
        symbol: impl Into<String>,
        kind: ComponentKind,
        factory: impl DescriptionFactory + 'static,
    ) -> Self {
        let _ = self.register_describable(symbol, kind, factory);
        self
    }

    fn insert(
        &mut self,
        name: String,
        kind: ComponentKind,
        factory: Option<Arc<dyn DescriptionFactory>>,
    ) -> Option<ComponentSymbol> {
        let symbol = ComponentSymbol {
            name: name.clone(),
            kind,
            factory,
        };
        let replaced = self.components.insert(name, symbol);
        if let Some(old) = &replaced {
            tracing::debug!(symbol = old.name(), "replacing registered component");
        }
        replaced
    }

    /// Looks up a fully-qualified symbol.
    pub fn get(&self, symbol: &str) -> Option<&ComponentSymbol> {
        self.components.get(symbol)
    }

    /// Iterates over all components in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentSymbol> {
        self.components.values()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no component is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
