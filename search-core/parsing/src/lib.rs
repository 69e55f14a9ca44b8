//! Parses the surface type syntax into the external type layout.
//!
//! The grammar is the ML-flavoured one the search tool accepts on the
//! command line: `'a` variables, `_` wildcards, postfix constructor
//! application (`'a list`, `(int, string) result`), `*` tuples, and
//! right-associative `->` arrows. The parser produces a
//! [`SourceType`]; canonicalisation happens on import.

mod lexer;
mod parser;

use smol_str::SmolStr;
use terms::SourceType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character {character:?} at offset {offset}")]
    UnexpectedCharacter { character: char, offset: u32 },
    #[error("unexpected {text:?} at offset {offset}")]
    UnexpectedToken { text: SmolStr, offset: u32 },
    #[error("unexpected end of input")]
    UnexpectedEnd,
}

pub fn parse_type(source: &str) -> Result<SourceType, ParseError> {
    let tokens = lexer::lex(source)?;
    let mut parser = parser::Parser::new(tokens);
    let ty = parser.ty()?;
    parser.expect_end()?;
    Ok(ty)
}
