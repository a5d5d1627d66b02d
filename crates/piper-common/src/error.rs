//! Unified error type for the piper workspace.
//!
//! Errors fall into two classes. Non-fatal errors (see
//! [`PiperError::is_fatal`]) drop the effect of a single directive and let
//! interpretation continue. Fatal errors unwind the whole top-level load.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Capability;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum PiperError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A malformed or unknown directive or parameter.
    #[error("syntax error: {message}")]
    Syntax {
        /// Description of the problem.
        message: String,
    },

    /// No namespace yields a component with the required capability.
    #[error("no {capability} found for {name}")]
    SymbolNotFound {
        /// Bare or qualified name that was looked up.
        name: String,
        /// Capability the component had to satisfy.
        capability: Capability,
    },

    /// A fully-qualified symbol exists but does not satisfy the capability.
    #[error("{symbol} is not a {capability}")]
    CapabilityMismatch {
        /// Fully-qualified symbol that was found.
        symbol: String,
        /// Capability the component had to satisfy.
        capability: Capability,
    },

    /// A piper file or `load` target could not be located.
    #[error("no piper file found for {name}")]
    ResourceUnavailable {
        /// Name that was looked up.
        name: String,
    },

    /// A description factory is missing, failed, or rejected its arguments.
    #[error("cannot create description for {symbol}: {message}")]
    DescriptionFactory {
        /// Component symbol whose factory was invoked.
        symbol: String,
        /// Description of the failure.
        message: String,
    },

    /// A `cli` directive was used while no command-line options are attached.
    #[error("command-line options are not specified")]
    CliOverrideUnavailable,

    /// A single command-line option could not be resolved.
    #[error("command-line option {option}: {message}")]
    CliOption {
        /// Option key that was requested.
        option: String,
        /// Description of the failure.
        message: String,
    },

    /// A piper file includes itself, directly or transitively.
    #[error("piper file load cycle: {chain}")]
    LoadCycle {
        /// The include chain, outermost first, joined by ` -> `.
        chain: String,
    },

    /// Nested `load` directives went deeper than the configured bound.
    #[error("piper file load depth {depth} exceeded while loading {name}")]
    LoadDepthExceeded {
        /// The configured maximum depth.
        depth: usize,
        /// The file that would have exceeded it.
        name: String,
    },

    /// The pipeline builder rejected an operation.
    #[error("pipeline builder: {message}")]
    Builder {
        /// Description of the rejected operation.
        message: String,
    },

    /// A fatal error raised while interpreting a specific line of a file.
    #[error("{source_name}:{line}: {source}")]
    AtLine {
        /// Name of the piper file being interpreted.
        source_name: String,
        /// 1-based line number.
        line: usize,
        /// The underlying error.
        source: Box<PiperError>,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl PiperError {
    /// Whether this error aborts the enclosing load.
    ///
    /// Syntax problems and command-line override problems only drop the
    /// effect of their own directive.
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Syntax { .. } | Self::CliOverrideUnavailable | Self::CliOption { .. }
        )
    }

    /// Returns the innermost error, looking through [`PiperError::AtLine`].
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::AtLine { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Shorthand for a [`PiperError::Syntax`] error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Shorthand for a [`PiperError::Builder`] error.
    pub fn builder(message: impl Into<String>) -> Self {
        Self::Builder {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PiperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_and_cli_errors_are_not_fatal() {
        assert!(!PiperError::syntax("bad pair").is_fatal());
        assert!(!PiperError::CliOverrideUnavailable.is_fatal());
        assert!(
            !PiperError::CliOption {
                option: "i".into(),
                message: "not set".into(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn resolution_errors_are_fatal() {
        let err = PiperError::SymbolNotFound {
            name: "Tokenizer".into(),
            capability: Capability::AnalysisComponent,
        };
        assert!(err.is_fatal());
        assert!(
            PiperError::ResourceUnavailable {
                name: "x.piper".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn root_cause_looks_through_nested_lines() {
        let err = PiperError::AtLine {
            source_name: "outer.piper".into(),
            line: 3,
            source: Box::new(PiperError::AtLine {
                source_name: "inner.piper".into(),
                line: 7,
                source: Box::new(PiperError::ResourceUnavailable {
                    name: "missing".into(),
                }),
            }),
        };
        assert!(matches!(
            err.root_cause(),
            PiperError::ResourceUnavailable { name } if name == "missing"
        ));
        let msg = err.to_string();
        assert!(msg.starts_with("outer.piper:3: inner.piper:7:"), "got: {msg}");
    }
}
