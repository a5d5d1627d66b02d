//! Domain primitive types used across the piper workspace.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed parameter value parsed from a piper file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    /// Plain or quoted text.
    String(String),
    /// `true` / `false`, case-insensitive.
    Boolean(bool),
    /// A base-10 32-bit integer.
    Integer(i32),
    /// A comma-separated list; elements are never coerced further.
    Array(Vec<String>),
}

impl ParameterValue {
    /// Returns the string content if this is a [`ParameterValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is an empty string value.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Array(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

/// One `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub key: String,
    /// Typed value.
    pub value: ParameterValue,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered parameter pairs; duplicate keys are kept in input order.
pub type ParameterList = Vec<Parameter>;

/// View names a component should operate on.
pub type ViewSet = BTreeSet<String>;

/// Base type a resolved component must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// A collection reader producing documents.
    Reader,
    /// An analysis engine or a consumer.
    AnalysisComponent,
}

impl Capability {
    /// Sub-namespaces probed inside each built-in namespace, in order.
    ///
    /// The empty suffix stands for the bare namespace.
    pub const fn builtin_suffixes(self) -> &'static [&'static str] {
        match self {
            Self::Reader => &[".cr", ""],
            Self::AnalysisComponent => &[".ae", ".cc", ""],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader => write!(f, "collection reader"),
            Self::AnalysisComponent => write!(f, "analysis component"),
        }
    }
}

/// Concrete kind of a registered component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Collection reader.
    Reader,
    /// Analysis engine (annotator).
    Annotator,
    /// Consumer (writer, collector).
    Consumer,
}

impl ComponentKind {
    /// Polymorphic "is-a" check against a required capability.
    pub const fn satisfies(self, capability: Capability) -> bool {
        match capability {
            Capability::Reader => matches!(self, Self::Reader),
            Capability::AnalysisComponent => matches!(self, Self::Annotator | Self::Consumer),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader => write!(f, "reader"),
            Self::Annotator => write!(f, "annotator"),
            Self::Consumer => write!(f, "consumer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotators_and_consumers_are_analysis_components() {
        assert!(ComponentKind::Annotator.satisfies(Capability::AnalysisComponent));
        assert!(ComponentKind::Consumer.satisfies(Capability::AnalysisComponent));
        assert!(!ComponentKind::Reader.satisfies(Capability::AnalysisComponent));
    }

    #[test]
    fn only_readers_are_readers() {
        assert!(ComponentKind::Reader.satisfies(Capability::Reader));
        assert!(!ComponentKind::Annotator.satisfies(Capability::Reader));
        assert!(!ComponentKind::Consumer.satisfies(Capability::Reader));
    }

    #[test]
    fn parameter_display_quotes_strings() {
        let p = Parameter::new("Dir", ParameterValue::String("out".into()));
        assert_eq!(p.to_string(), "Dir=\"out\"");
        let p = Parameter::new("Ids", ParameterValue::Array(vec!["a".into(), "b".into()]));
        assert_eq!(p.to_string(), "Ids=[a,b]");
    }

    #[test]
    fn value_serializes_with_type_tag() {
        let json = serde_json::to_string(&ParameterValue::Integer(42)).expect("serialize");
        assert_eq!(json, r#"{"type":"integer","value":42}"#);
    }
}
