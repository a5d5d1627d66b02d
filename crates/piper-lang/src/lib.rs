//! # piper-lang
//!
//! The text layer of the piper pipeline-description language.
//!
//! Handles:
//! - **Lexer**: Splitting an argument blob into bare, quoted, and `=` atoms.
//! - **Value**: Typing a single raw token (boolean, integer, array, string).
//! - **Params**: Turning a blob into an ordered list of typed `key=value` pairs.
//! - **Views**: Extracting and stripping `AeViews=` scoping annotations.
//! - **Directive**: Classifying a line as blank, comment, or command.
//! - **Cli**: Substituting command-line option values for `cli` directives.

pub mod cli;
pub mod directive;
pub mod lexer;
pub mod params;
pub mod value;
pub mod views;

pub use cli::{CliOptionMap, CliOptionals};
pub use directive::{Command, Directive, Line, classify_line, split_name};
pub use params::{parse_description_values, parse_parameters, parse_parameters_with_cli_override};
pub use value::parse_value;
pub use views::extract_views;
