//! Locating piper files by name.
//!
//! A [`ResourceLocator`] turns a path-like name into a line stream. The
//! filesystem locator searches the current directory and configured roots;
//! packaged resources serve named texts from memory; a chain consults
//! several locators in order.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use piper_common::constants::home_roots;
use piper_common::error::{PiperError, Result};

/// An opened piper file.
pub struct LocatedResource {
    /// The name the resource was located under.
    pub name: String,
    /// Filesystem path of the resource, if it has one.
    pub origin: Option<PathBuf>,
    /// Line source; dropped when interpretation of the file ends.
    pub reader: Box<dyn BufRead>,
}

impl fmt::Debug for LocatedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatedResource")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Resolves a name to a readable resource.
pub trait ResourceLocator {
    /// Attempts to locate `name`; never fails, `None` means not found.
    fn locate_quiet(&self, name: &str) -> Option<LocatedResource>;

    /// Locates `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PiperError::ResourceUnavailable`] if nothing is found.
    fn locate(&self, name: &str) -> Result<LocatedResource> {
        self.locate_quiet(name)
            .ok_or_else(|| PiperError::ResourceUnavailable {
                name: name.to_string(),
            })
    }
}

/// Locates files relative to the working directory and extra roots.
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    roots: Vec<PathBuf>,
}

impl FileLocator {
    /// Creates a locator searching the working directory, then `roots`.
    #[must_use]
    pub const fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Creates a locator searching `extra`, then the installation roots
    /// named by `$CTAKES_HOME`.
    #[must_use]
    pub fn from_env(extra: &[PathBuf]) -> Self {
        let mut roots = extra.to_vec();
        roots.extend(home_roots());
        Self { roots }
    }

    /// The extra search roots, in order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        std::iter::once(path.to_path_buf())
            .chain(self.roots.iter().map(|root| root.join(path)))
            .collect()
    }
}

impl ResourceLocator for FileLocator {
    fn locate_quiet(&self, name: &str) -> Option<LocatedResource> {
        for candidate in self.candidates(name) {
            if !candidate.is_file() {
                continue;
            }
            match File::open(&candidate) {
                Ok(file) => {
                    let origin = candidate.canonicalize().unwrap_or(candidate);
                    tracing::trace!(name, origin = %origin.display(), "located piper file");
                    return Some(LocatedResource {
                        name: name.to_string(),
                        origin: Some(origin),
                        reader: Box::new(BufReader::new(file)),
                    });
                }
                Err(e) => {
                    tracing::debug!(path = %candidate.display(), error = %e, "cannot open candidate");
                }
            }
        }
        None
    }
}

/// Named texts bundled with the application.
///
/// Names are matched after normalizing separators to `/` and dropping a
/// leading `/` or `./`.
#[derive(Debug, Clone, Default)]
pub struct PackagedResources {
    texts: BTreeMap<String, String>,
}

impl PackagedResources {
    /// Creates an empty resource set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, replacing any previous text under the same name.
    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        let _ = self.texts.insert(normalize(name), text.into());
    }

    /// Adds a resource, returning the set.
    #[must_use]
    pub fn with(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

fn normalize(name: &str) -> String {
    let name = name.replace('\\', "/");
    let mut name = name.as_str();
    loop {
        if let Some(rest) = name.strip_prefix("./") {
            name = rest;
        } else if let Some(rest) = name.strip_prefix('/') {
            name = rest;
        } else {
            break;
        }
    }
    name.to_string()
}

impl ResourceLocator for PackagedResources {
    fn locate_quiet(&self, name: &str) -> Option<LocatedResource> {
        let text = self.texts.get(&normalize(name))?;
        Some(LocatedResource {
            name: name.to_string(),
            origin: None,
            reader: Box::new(Cursor::new(text.clone())),
        })
    }
}

/// Consults several locators; the first that finds the name wins.
#[derive(Default)]
pub struct LocatorChain {
    locators: Vec<Box<dyn ResourceLocator>>,
}

impl LocatorChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a locator, returning the chain.
    #[must_use]
    pub fn with(mut self, locator: impl ResourceLocator + 'static) -> Self {
        self.locators.push(Box::new(locator));
        self
    }

    /// Number of locators in the chain.
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Whether the chain has no locators.
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl fmt::Debug for LocatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatorChain")
            .field("locators", &self.locators.len())
            .finish()
    }
}

impl ResourceLocator for LocatorChain {
    fn locate_quiet(&self, name: &str) -> Option<LocatedResource> {
        self.locators.iter().find_map(|l| l.locate_quiet(name))
    }
}
