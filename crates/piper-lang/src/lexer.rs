//! Tokenization of directive arguments using `nom`.
//!
//! An argument blob is a whitespace-separated sequence of chunks. Each chunk
//! is a run of adjacent atoms: bare text, double-quoted text, or `=`.
//! Quoted runs may contain spaces but never a quote or a line break.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{map, value},
    multi::many1,
    sequence::delimited,
};

/// The smallest lexical unit of an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom<'a> {
    /// Text without whitespace, quotes, or `=`.
    Bare(&'a str),
    /// The inside of a double-quoted run.
    Quoted(&'a str),
    /// A `=` separator.
    Equals,
}

impl Atom<'_> {
    /// Appends the source text of this atom, quotes included, to `out`.
    pub fn push_source(&self, out: &mut String) {
        match self {
            Self::Bare(s) => out.push_str(s),
            Self::Quoted(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            Self::Equals => out.push('='),
        }
    }
}

/// A whitespace-delimited group of atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// The source text of the whole chunk.
    pub text: &'a str,
    /// Atoms in source order.
    pub atoms: Vec<Atom<'a>>,
}

/// Result of lexing one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexed<'a> {
    /// A well-formed chunk.
    Chunk(Chunk<'a>),
    /// Text that could not be lexed, e.g. an unterminated quote.
    Malformed(&'a str),
}

fn is_bare(c: char) -> bool {
    !c.is_whitespace() && c != '"' && c != '='
}

const fn is_quoted_content(c: char) -> bool {
    c != '"' && c != '\r' && c != '\n'
}

fn quoted(input: &str) -> IResult<&str, Atom<'_>> {
    map(
        delimited(char('"'), take_while(is_quoted_content), char('"')),
        Atom::Quoted,
    )
    .parse(input)
}

fn bare(input: &str) -> IResult<&str, Atom<'_>> {
    map(take_while1(is_bare), Atom::Bare).parse(input)
}

fn atom(input: &str) -> IResult<&str, Atom<'_>> {
    alt((quoted, value(Atom::Equals, char('=')), bare)).parse(input)
}

/// Splits an argument blob into chunks.
///
/// A chunk must end at whitespace or at the end of input; anything else
/// (typically a stray or unterminated quote) yields a [`Lexed::Malformed`]
/// entry covering text up to the next whitespace.
pub fn split_chunks(input: &str) -> Vec<Lexed<'_>> {
    let mut chunks = Vec::new();
    let mut remaining = input.trim_start();

    while !remaining.is_empty() {
        match many1(atom).parse(remaining) {
            Ok((rest, atoms)) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                let text = &remaining[..remaining.len() - rest.len()];
                chunks.push(Lexed::Chunk(Chunk { text, atoms }));
                remaining = rest;
            }
            _ => {
                let end = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                chunks.push(Lexed::Malformed(&remaining[..end]));
                remaining = &remaining[end..];
            }
        }
        remaining = remaining.trim_start();
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms_of(input: &str) -> Vec<Vec<Atom<'_>>> {
        split_chunks(input)
            .into_iter()
            .map(|lexed| match lexed {
                Lexed::Chunk(chunk) => chunk.atoms,
                Lexed::Malformed(text) => panic!("unexpected malformed chunk: {text}"),
            })
            .collect()
    }

    #[test]
    fn split_simple_pairs() {
        let chunks = atoms_of("x=1 y=true");
        assert_eq!(
            chunks,
            vec![
                vec![Atom::Bare("x"), Atom::Equals, Atom::Bare("1")],
                vec![Atom::Bare("y"), Atom::Equals, Atom::Bare("true")],
            ]
        );
    }

    #[test]
    fn quoted_run_keeps_spaces_and_equals_outside() {
        let chunks = atoms_of(r#"z="q, r" w"#);
        assert_eq!(
            chunks,
            vec![
                vec![Atom::Bare("z"), Atom::Equals, Atom::Quoted("q, r")],
                vec![Atom::Bare("w")],
            ]
        );
    }

    #[test]
    fn chunk_text_covers_source() {
        let chunks = split_chunks(r#"  key="a b"   other "#);
        let texts: Vec<&str> = chunks
            .iter()
            .map(|c| match c {
                Lexed::Chunk(chunk) => chunk.text,
                Lexed::Malformed(text) => *text,
            })
            .collect();
        assert_eq!(texts, vec![r#"key="a b""#, "other"]);
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let chunks = split_chunks(r#"x="abc y=2"#);
        assert_eq!(chunks[0], Lexed::Malformed(r#"x="abc"#));
        assert!(matches!(&chunks[1], Lexed::Chunk(c) if c.text == "y=2"));
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(split_chunks("").is_empty());
        assert!(split_chunks("   \t ").is_empty());
    }

    #[test]
    fn push_source_restores_quotes() {
        let mut out = String::new();
        Atom::Bare("a").push_source(&mut out);
        Atom::Quoted("b c").push_source(&mut out);
        assert_eq!(out, r#"a"b c""#);
    }
}
