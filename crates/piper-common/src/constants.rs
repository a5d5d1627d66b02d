//! System-wide constants and default search locations.

use std::path::PathBuf;

/// Reserved parameter key naming the views a component operates on.
pub const AE_VIEWS_KEY: &str = "AeViews";

/// Line prefixes marking a comment.
pub const COMMENT_PREFIXES: [&str; 3] = ["//", "#", "!"];

/// Extension appended when a piper file is not found under its plain name.
pub const PIPER_EXTENSION: &str = ".piper";

/// Conventional sub-directory of a namespace holding piper files.
pub const PIPELINE_SUBDIR: &str = "pipeline";

/// Global parameter consulted by `readFiles` without an argument.
pub const INPUT_DIRECTORY_PARAM: &str = "InputDirectory";

/// Global parameter consulted by `writeXmis` without an argument.
pub const OUTPUT_DIRECTORY_PARAM: &str = "OutputDirectory";

/// Environment variable pointing at an installation with bundled resources.
pub const HOME_ENV: &str = "CTAKES_HOME";

/// Root of the built-in component namespaces.
pub const BUILTIN_ROOT: &str = "org.apache.ctakes";

/// Built-in packages below [`BUILTIN_ROOT`], in search order.
pub const BUILTIN_PACKAGES: [&str; 22] = [
    "core",
    "contexttokenizer",
    "postagger",
    "chunker",
    "dictionary.lookup.fast",
    "assertion",
    "dictionary.lookup2",
    "clinicalpipeline",
    "clinical.pipeline",
    "constituency.parser",
    "lvg",
    "relationextractor",
    "coreference",
    "dependency.parser",
    "temporal",
    "drug-ner",
    "necontexts",
    "preprocessor",
    "sideeffect",
    "smokingstatus",
    "dictionary.lookup",
    "template.filler",
];

/// Default bound on nested `load` directives.
pub const DEFAULT_MAX_LOAD_DEPTH: usize = 32;

/// Binary name for the CLI.
pub const BIN_NAME: &str = "piper";

/// Returns the fully-qualified built-in namespaces in search order.
pub fn builtin_namespaces() -> Vec<String> {
    BUILTIN_PACKAGES
        .iter()
        .map(|pkg| format!("{BUILTIN_ROOT}.{pkg}"))
        .collect()
}

/// Returns resource roots derived from `$CTAKES_HOME`, if it is set.
pub fn home_roots() -> Vec<PathBuf> {
    roots_under_home(std::env::var(HOME_ENV).ok().as_deref())
}

/// Installation roots below `home`: the home itself, then its `resources`.
#[must_use]
pub fn roots_under_home(home: Option<&str>) -> Vec<PathBuf> {
    home.filter(|h| !h.is_empty()).map_or_else(Vec::new, |home| {
        let home = PathBuf::from(home);
        let resources = home.join("resources");
        vec![home, resources]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_namespaces_keep_package_order() {
        let namespaces = builtin_namespaces();
        assert_eq!(namespaces.len(), BUILTIN_PACKAGES.len());
        assert_eq!(namespaces[0], "org.apache.ctakes.core");
        assert_eq!(
            namespaces.last().map(String::as_str),
            Some("org.apache.ctakes.template.filler")
        );
    }

    #[test]
    fn home_is_searched_before_its_resources() {
        assert_eq!(
            roots_under_home(Some("/opt/ctakes")),
            vec![
                PathBuf::from("/opt/ctakes"),
                PathBuf::from("/opt/ctakes/resources"),
            ]
        );
        assert!(roots_under_home(None).is_empty());
        assert!(roots_under_home(Some("")).is_empty());
    }
}
