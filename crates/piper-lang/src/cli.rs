//! Command-line option substitution for `cli` directives.
//!
//! A `cli` directive names, for each parameter, the single-character
//! command-line option whose runtime value it should receive:
//! `cli InputDirectory=i OutputDirectory=o`.

use std::collections::BTreeMap;

use piper_common::error::{PiperError, Result};

/// Read-only source of command-line option values.
pub trait CliOptionals {
    /// Returns the value supplied for `option`.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::CliOption`] if the option is unknown or unset.
    fn value_of(&self, option: &str) -> Result<String>;
}

/// Command-line option values keyed by their single-character flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptionMap {
    values: BTreeMap<char, String>,
}

impl CliOptionMap {
    /// Creates an empty option map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option value, returning the map.
    #[must_use]
    pub fn with(mut self, option: char, value: impl Into<String>) -> Self {
        let _ = self.values.insert(option, value.into());
        self
    }

    /// Sets an option value, returning the previous one.
    pub fn insert(&mut self, option: char, value: impl Into<String>) -> Option<String> {
        self.values.insert(option, value.into())
    }

    /// Parses an `o=value` assignment as given on a command line.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the key is not one character.
    pub fn parse_assignment(text: &str) -> Result<(char, String)> {
        let (key, value) = text.split_once('=').ok_or_else(|| PiperError::CliOption {
            option: text.to_string(),
            message: "expected <option>=<value>".into(),
        })?;
        Ok((single_char(key)?, value.to_string()))
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(char, String)> for CliOptionMap {
    fn from_iter<T: IntoIterator<Item = (char, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl CliOptionals for CliOptionMap {
    fn value_of(&self, option: &str) -> Result<String> {
        let key = single_char(option)?;
        self.values
            .get(&key)
            .cloned()
            .ok_or_else(|| PiperError::CliOption {
                option: option.to_string(),
                message: "not set on the command line".into(),
            })
    }
}

fn single_char(option: &str) -> Result<char> {
    let mut chars = option.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(PiperError::CliOption {
            option: option.to_string(),
            message: "option keys are single characters".into(),
        }),
    }
}

/// Resolves the raw option reference of a `cli` pair to its runtime value.
///
/// Quotes around the reference are ignored.
///
/// # Errors
///
/// Propagates the [`CliOptionals`] failure for unknown or unset options.
pub fn resolve_override(options: &dyn CliOptionals, raw: &str) -> Result<String> {
    options.value_of(&raw.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_of_known_option() {
        let options = CliOptionMap::new().with('i', "/data/in");
        assert_eq!(options.value_of("i").expect("should resolve"), "/data/in");
    }

    #[test]
    fn value_of_unset_option_fails() {
        let options = CliOptionMap::new().with('i', "/data/in");
        let err = options.value_of("o").unwrap_err();
        assert!(matches!(err, PiperError::CliOption { ref option, .. } if option == "o"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn multi_character_key_is_rejected() {
        let options = CliOptionMap::new().with('i', "x");
        let err = options.value_of("in").unwrap_err();
        assert!(err.to_string().contains("single characters"), "got: {err}");
    }

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        let (key, value) = CliOptionMap::parse_assignment("l=a=b").expect("should parse");
        assert_eq!(key, 'l');
        assert_eq!(value, "a=b");
        assert!(CliOptionMap::parse_assignment("novalue").is_err());
        assert!(CliOptionMap::parse_assignment("ab=1").is_err());
    }

    #[test]
    fn resolve_override_strips_quotes() {
        let options: CliOptionMap = [('o', "/out".to_string())].into_iter().collect();
        assert_eq!(
            resolve_override(&options, "\"o\"").expect("should resolve"),
            "/out"
        );
    }
}
