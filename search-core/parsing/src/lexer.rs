use smol_str::SmolStr;

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Variable,
    Wildcard,
    Arrow,
    Star,
    Comma,
    Dot,
    ParenLeft,
    ParenRight,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) text: SmolStr,
    pub(crate) offset: u32,
}

struct Lexer<'s> {
    source: &'s str,
    offset: usize,
    tokens: Vec<Token>,
}

pub(crate) fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer { source, offset: 0, tokens: vec![] };
    while !lexer.is_eof() {
        lexer.take_token()?;
    }
    lexer.tokens.push(Token {
        kind: TokenKind::End,
        text: SmolStr::default(),
        offset: source.len() as u32,
    });
    Ok(lexer.tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

impl Lexer<'_> {
    fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn push(&mut self, kind: TokenKind, text: &str, offset: usize) {
        self.tokens.push(Token { kind, text: text.into(), offset: offset as u32 });
    }

    fn take_ident(&mut self) -> SmolStr {
        let start = self.offset;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.offset += c.len_utf8();
            } else {
                break;
            }
        }
        self.source[start..self.offset].into()
    }

    fn take_token(&mut self) -> Result<(), ParseError> {
        let offset = self.offset;
        let Some(c) = self.peek() else { return Ok(()) };
        match c {
            c if c.is_whitespace() => {
                self.offset += c.len_utf8();
            }
            '(' => {
                self.offset += 1;
                self.push(TokenKind::ParenLeft, "(", offset);
            }
            ')' => {
                self.offset += 1;
                self.push(TokenKind::ParenRight, ")", offset);
            }
            '*' => {
                self.offset += 1;
                self.push(TokenKind::Star, "*", offset);
            }
            ',' => {
                self.offset += 1;
                self.push(TokenKind::Comma, ",", offset);
            }
            '.' => {
                self.offset += 1;
                self.push(TokenKind::Dot, ".", offset);
            }
            '-' => {
                if self.source[self.offset..].starts_with("->") {
                    self.offset += 2;
                    self.push(TokenKind::Arrow, "->", offset);
                } else {
                    return Err(ParseError::UnexpectedCharacter {
                        character: '-',
                        offset: offset as u32,
                    });
                }
            }
            '\'' => {
                self.offset += 1;
                let name = self.take_ident();
                if name.is_empty() {
                    return Err(ParseError::UnexpectedCharacter {
                        character: '\'',
                        offset: offset as u32,
                    });
                }
                self.tokens.push(Token {
                    kind: TokenKind::Variable,
                    text: name,
                    offset: offset as u32,
                });
            }
            c if is_ident_start(c) => {
                let text = self.take_ident();
                let kind = if text == "_" { TokenKind::Wildcard } else { TokenKind::Ident };
                self.tokens.push(Token { kind, text, offset: offset as u32 });
            }
            c => {
                return Err(ParseError::UnexpectedCharacter { character: c, offset: offset as u32 });
            }
        }
        Ok(())
    }
}
