//! Line classification and the closed command set.

use std::fmt;
use std::str::FromStr;

use piper_common::constants::COMMENT_PREFIXES;
use piper_common::error::PiperError;

/// A piper command keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `package <namespace>`
    Package,
    /// `load <piper file>`
    Load,
    /// `set <pairs>`
    Set,
    /// `cli <pairs>`
    Cli,
    /// `reader <name> [pairs]`
    Reader,
    /// `readFiles [dir]`
    ReadFiles,
    /// `add <name> [pairs]`
    Add,
    /// `addLogged <name> [pairs]`
    AddLogged,
    /// `addDescription <name> [values]`
    AddDescription,
    /// `addLast <name> [pairs]`
    AddLast,
    /// `collectCuis`
    CollectCuis,
    /// `collectEntities`
    CollectEntities,
    /// `writeXmis [dir]`
    WriteXmis,
}

impl Command {
    /// Every command, in documentation order.
    pub const ALL: [Self; 13] = [
        Self::Package,
        Self::Load,
        Self::Set,
        Self::Cli,
        Self::Reader,
        Self::ReadFiles,
        Self::Add,
        Self::AddLogged,
        Self::AddDescription,
        Self::AddLast,
        Self::CollectCuis,
        Self::CollectEntities,
        Self::WriteXmis,
    ];

    /// The keyword as written in a piper file.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Load => "load",
            Self::Set => "set",
            Self::Cli => "cli",
            Self::Reader => "reader",
            Self::ReadFiles => "readFiles",
            Self::Add => "add",
            Self::AddLogged => "addLogged",
            Self::AddDescription => "addDescription",
            Self::AddLast => "addLast",
            Self::CollectCuis => "collectCuis",
            Self::CollectEntities => "collectEntities",
            Self::WriteXmis => "writeXmis",
        }
    }
}

impl FromStr for Command {
    type Err = PiperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.keyword() == s)
            .ok_or_else(|| PiperError::syntax(format!("unknown piper command: {s}")))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One non-comment line split into command text and argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// The first word of the line.
    pub command: &'a str,
    /// Everything after the first space, trimmed; may be empty.
    pub argument: &'a str,
}

/// Classification of one raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty after trimming.
    Blank,
    /// Starts with `//`, `#`, or `!`.
    Comment,
    /// Anything else.
    Directive(Directive<'a>),
}

/// Classifies a raw line; the line is trimmed first.
pub fn classify_line(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)) {
        return Line::Comment;
    }
    let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
    Line::Directive(Directive {
        command,
        argument: argument.trim(),
    })
}

/// Splits a component argument into its name and the remaining blob.
pub fn split_name(argument: &str) -> (&str, &str) {
    let argument = argument.trim();
    argument
        .split_once(char::is_whitespace)
        .map_or((argument, ""), |(name, rest)| (name, rest.trim()))
}
