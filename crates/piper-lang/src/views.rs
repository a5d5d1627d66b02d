//! Extraction of `AeViews=` scoping annotations from a directive argument.
//!
//! View annotations may appear anywhere in an argument. They are removed
//! before parameter parsing so they never surface as ordinary parameters.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till1},
    character::complete::char,
    sequence::preceded,
};
use piper_common::constants::AE_VIEWS_KEY;
use piper_common::types::ViewSet;

fn view_spec(input: &str) -> IResult<&str, &str> {
    preceded(
        (tag(AE_VIEWS_KEY), char('=')),
        take_till1(char::is_whitespace),
    )
    .parse(input)
}

/// Extracts every `AeViews=<a,b,...>` occurrence from `blob`.
///
/// Returns the union of all named views and the blob with each matched
/// occurrence replaced by a single space. An `AeViews=` with no value is
/// left in place.
pub fn extract_views(blob: &str) -> (ViewSet, String) {
    let mut views = ViewSet::new();
    let mut remaining = String::with_capacity(blob.len());
    let mut cursor = 0;

    for (start, _) in blob.match_indices(AE_VIEWS_KEY) {
        if start < cursor {
            continue;
        }
        let Ok((rest, value)) = view_spec(&blob[start..]) else {
            continue;
        };
        views.extend(
            value
                .split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        );
        remaining.push_str(&blob[cursor..start]);
        remaining.push(' ');
        cursor = blob.len() - rest.len();
    }
    remaining.push_str(&blob[cursor..]);

    (views, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::parse_parameters;
    use piper_common::types::{Parameter, ParameterValue};

    fn set(names: &[&str]) -> ViewSet {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn extract_leading_view_spec() {
        let (views, remaining) = extract_views("AeViews=A,B foo=1");
        assert_eq!(views, set(&["A", "B"]));
        assert_eq!(
            parse_parameters(&remaining),
            vec![Parameter::new("foo", ParameterValue::Integer(1))]
        );
    }

    #[test]
    fn multiple_specs_are_unioned() {
        let (views, remaining) =
            extract_views("Writer AeViews=GoldView x=2 AeViews=GoldView,SystemView");
        assert_eq!(views, set(&["GoldView", "SystemView"]));
        assert_eq!(remaining.split_whitespace().collect::<Vec<_>>(), vec!["Writer", "x=2"]);
    }

    #[test]
    fn no_spec_leaves_blob_untouched() {
        let (views, remaining) = extract_views("Tokenizer Mode=fast");
        assert!(views.is_empty());
        assert_eq!(remaining, "Tokenizer Mode=fast");
    }

    #[test]
    fn empty_spec_value_is_not_a_match() {
        let (views, remaining) = extract_views("AeViews= x=1");
        assert!(views.is_empty());
        assert_eq!(remaining, "AeViews= x=1");
    }

    #[test]
    fn spec_embedded_in_value_is_consumed_once() {
        let (views, remaining) = extract_views("AeViews=AeViews=A");
        assert_eq!(views, set(&["AeViews=A"]));
        assert_eq!(remaining, " ");
    }
}
