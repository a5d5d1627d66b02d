//! Parsing of `key=value` parameter blobs into ordered, typed pairs.

use piper_common::types::{Parameter, ParameterList, ParameterValue};

use crate::cli::{CliOptionals, resolve_override};
use crate::lexer::{Atom, Chunk, Lexed, split_chunks};
use crate::value::parse_value;

/// A pair before value typing: the key and the raw value text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawPair<'a> {
    key: &'a str,
    value: String,
}

/// Parses a blob of `key=value` pairs.
///
/// Pairs keep input order, duplicates included. A bare key without `=`
/// gets an empty string value. Chunks with a missing or quoted key, or with
/// an unterminated quote, are skipped with a warning.
pub fn parse_parameters(blob: &str) -> ParameterList {
    raw_pairs(blob)
        .into_iter()
        .map(|pair| Parameter::new(pair.key, parse_value(&pair.value)))
        .collect()
}

/// Parses a `cli` blob, substituting command-line option values.
///
/// Each value names an option; its runtime value is typed by
/// [`parse_value`]. Pairs whose option cannot be resolved are skipped.
/// With no option source attached, a warning is logged and the result is
/// empty.
pub fn parse_parameters_with_cli_override(
    blob: &str,
    options: Option<&dyn CliOptionals>,
) -> ParameterList {
    let Some(options) = options else {
        tracing::warn!(
            "attempted to set parameters by command-line options, but none are specified"
        );
        return ParameterList::new();
    };

    let mut params = ParameterList::new();
    for pair in raw_pairs(blob) {
        if pair.value.is_empty() {
            params.push(Parameter::new(pair.key, ParameterValue::String(String::new())));
            continue;
        }
        match resolve_override(options, &pair.value) {
            Ok(value) => params.push(Parameter::new(pair.key, parse_value(&value))),
            Err(e) => tracing::warn!(key = pair.key, error = %e, "skipping cli parameter"),
        }
    }
    params
}

/// Parses the positional values of an `addDescription` directive.
///
/// Each whitespace-separated literal is typed by [`parse_value`]. Chunks
/// containing an unquoted `=` are skipped with a warning.
pub fn parse_description_values(blob: &str) -> Vec<ParameterValue> {
    let mut values = Vec::new();
    for lexed in split_chunks(blob) {
        match lexed {
            Lexed::Chunk(chunk) if chunk.atoms.contains(&Atom::Equals) => {
                tracing::warn!(text = chunk.text, "skipping description value containing '='");
            }
            Lexed::Chunk(chunk) => values.push(parse_value(chunk.text)),
            Lexed::Malformed(text) => {
                tracing::warn!(text, "skipping malformed description value");
            }
        }
    }
    values
}

/// Extracts key/value pairs from `blob`.
///
/// Words trailing an unterminated quote belong to that broken value, so bare
/// chunks after it are dropped until the next chunk holding an `=`.
fn raw_pairs(blob: &str) -> Vec<RawPair<'_>> {
    let mut pairs = Vec::new();
    let mut open_quote = false;
    for lexed in split_chunks(blob) {
        match lexed {
            Lexed::Chunk(chunk) if open_quote && !chunk.atoms.contains(&Atom::Equals) => {
                tracing::warn!(text = chunk.text, "skipping word inside unterminated quote");
            }
            Lexed::Chunk(chunk) => {
                open_quote = false;
                pairs.extend(raw_pair(&chunk));
            }
            Lexed::Malformed(text) => {
                tracing::warn!(text, "skipping malformed parameter");
                open_quote = text.contains('"');
            }
        }
    }
    pairs
}

fn raw_pair<'a>(chunk: &Chunk<'a>) -> Option<RawPair<'a>> {
    let Some(eq) = chunk.atoms.iter().position(|a| *a == Atom::Equals) else {
        return match chunk.atoms.as_slice() {
            [Atom::Bare(key)] => Some(RawPair {
                key: *key,
                value: String::new(),
            }),
            _ => {
                tracing::warn!(text = chunk.text, "skipping parameter without a key");
                None
            }
        };
    };

    let key = match &chunk.atoms[..eq] {
        [Atom::Bare(key)] => *key,
        _ => {
            tracing::warn!(text = chunk.text, "skipping parameter with a missing or quoted key");
            return None;
        }
    };

    let after = &chunk.atoms[eq + 1..];
    let value_atoms = match after.iter().position(|a| *a == Atom::Equals) {
        Some(0) => {
            tracing::warn!(pair = chunk.text, "skipping parameter with an empty first value");
            return None;
        }
        Some(next) => {
            tracing::warn!(pair = chunk.text, "multiple parameter values, using first");
            &after[..next]
        }
        None => after,
    };

    let mut value = String::new();
    for atom in value_atoms {
        atom.push_source(&mut value);
    }
    Some(RawPair { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliOptionMap;

    fn param(key: &str, value: ParameterValue) -> Parameter {
        Parameter::new(key, value)
    }

    fn string(s: &str) -> ParameterValue {
        ParameterValue::String(s.to_string())
    }

    #[test]
    fn typed_pairs_in_order() {
        let params = parse_parameters(r#"x=1 y=true z="q,r""#);
        assert_eq!(
            params,
            vec![
                param("x", ParameterValue::Integer(1)),
                param("y", ParameterValue::Boolean(true)),
                param("z", string("q,r")),
            ]
        );
    }

    #[test]
    fn duplicate_keys_are_preserved() {
        let params = parse_parameters("a=1 b=2 a=3");
        let keys: Vec<&str> = params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
        assert_eq!(params[2].value, ParameterValue::Integer(3));
    }

    #[test]
    fn bare_key_defaults_to_empty_string() {
        let params = parse_parameters("Verbose Level=2");
        assert_eq!(
            params,
            vec![
                param("Verbose", string("")),
                param("Level", ParameterValue::Integer(2)),
            ]
        );
    }

    #[test]
    fn multiple_equals_keep_first_value() {
        let params = parse_parameters("a=b=c next=1");
        assert_eq!(
            params,
            vec![param("a", string("b")), param("next", ParameterValue::Integer(1))]
        );
    }

    #[test]
    fn empty_first_value_segment_is_skipped() {
        let params = parse_parameters("a==b next=1 c=");
        assert_eq!(
            params,
            vec![param("next", ParameterValue::Integer(1)), param("c", string(""))]
        );
    }

    #[test]
    fn quoted_equals_is_not_a_separator() {
        let params = parse_parameters(r#"Expr="x=y""#);
        assert_eq!(params, vec![param("Expr", string("x=y"))]);
    }

    #[test]
    fn quoted_value_with_spaces() {
        let params = parse_parameters(r#"Title="two words" n=3"#);
        assert_eq!(
            params,
            vec![
                param("Title", string("two words")),
                param("n", ParameterValue::Integer(3)),
            ]
        );
    }

    #[test]
    fn unshaped_tokens_are_skipped() {
        let params = parse_parameters(r#"=orphan "quoted"=1 "alone" ok=yes"#);
        assert_eq!(params, vec![param("ok", string("yes"))]);
    }

    #[test]
    fn unterminated_quote_skips_only_its_chunk() {
        let params = parse_parameters(r#"bad="open good=1"#);
        assert_eq!(params, vec![param("good", ParameterValue::Integer(1))]);
    }

    #[test]
    fn unterminated_quote_drops_its_trailing_words() {
        let params = parse_parameters(r#"Title="two words n=3"#);
        assert_eq!(params, vec![param("n", ParameterValue::Integer(3))]);
    }

    #[test]
    fn empty_blob_is_empty_list() {
        assert!(parse_parameters("").is_empty());
        assert!(parse_parameters("   ").is_empty());
    }

    #[test]
    fn cli_override_substitutes_option_values() {
        let options = CliOptionMap::new().with('i', "/data/in").with('n', "12");
        let params = parse_parameters_with_cli_override(
            "InputDirectory=i Threads=n",
            Some(&options),
        );
        assert_eq!(
            params,
            vec![
                param("InputDirectory", string("/data/in")),
                param("Threads", ParameterValue::Integer(12)),
            ]
        );
    }

    #[test]
    fn cli_override_skips_unset_options() {
        let options = CliOptionMap::new().with('i', "/data/in");
        let params = parse_parameters_with_cli_override(
            "InputDirectory=i OutputDirectory=o",
            Some(&options),
        );
        assert_eq!(params, vec![param("InputDirectory", string("/data/in"))]);
    }

    #[test]
    fn cli_override_without_options_is_empty() {
        let params = parse_parameters_with_cli_override("InputDirectory=i", None);
        assert!(params.is_empty());
    }

    #[test]
    fn description_values_are_typed_positionally() {
        let values = parse_description_values(r#"5 true "a b" x,y skip=me"#);
        assert_eq!(
            values,
            vec![
                ParameterValue::Integer(5),
                ParameterValue::Boolean(true),
                string("a b"),
                ParameterValue::Array(vec!["x".into(), "y".into()]),
            ]
        );
    }
}
