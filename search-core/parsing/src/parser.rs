use smol_str::{SmolStr, ToSmolStr};
use terms::{Path, SourceType};

use crate::ParseError;
use crate::lexer::{Token, TokenKind};

pub(crate) struct Parser {
    tokens: Vec<Token>,
    position: usize,
    wildcards: u32,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Parser {
        Parser { tokens, position: 0, wildcards: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if token.kind != TokenKind::End {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self) -> ParseError {
        let token = self.peek();
        match token.kind {
            TokenKind::End => ParseError::UnexpectedEnd,
            _ => ParseError::UnexpectedToken { text: token.text.clone(), offset: token.offset },
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) { Ok(self.advance()) } else { Err(self.unexpected()) }
    }

    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        if self.at(TokenKind::End) { Ok(()) } else { Err(self.unexpected()) }
    }

    /// type := tuple ("->" type)?  — arrows are right-associative
    pub(crate) fn ty(&mut self) -> Result<SourceType, ParseError> {
        let left = self.tuple()?;
        if self.eat(TokenKind::Arrow) {
            let right = self.ty()?;
            Ok(SourceType::function(left, right))
        } else {
            Ok(left)
        }
    }

    /// tuple := application ("*" application)*
    fn tuple(&mut self) -> Result<SourceType, ParseError> {
        let first = self.application()?;
        if !self.at(TokenKind::Star) {
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.eat(TokenKind::Star) {
            elements.push(self.application()?);
        }
        Ok(SourceType::tuple(elements))
    }

    /// application := atom ident*  — constructors apply postfix, so
    /// `int list list` reads as `(int list) list`
    fn application(&mut self) -> Result<SourceType, ParseError> {
        let mut arguments = self.atom()?;
        while self.at(TokenKind::Ident) {
            let path = self.path()?;
            arguments = vec![SourceType::constructor(path, arguments)];
        }
        if arguments.len() == 1 {
            Ok(arguments.remove(0))
        } else {
            // a parenthesised argument list with no constructor after it
            // reads as a tuple
            Ok(SourceType::tuple(arguments))
        }
    }

    /// An atom is one pending constructor argument, or a parenthesised list
    /// of them.
    fn atom(&mut self) -> Result<Vec<SourceType>, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Variable => {
                self.advance();
                Ok(vec![SourceType::variable(token.text)])
            }
            TokenKind::Wildcard => {
                self.advance();
                let name = format!("_{}", self.wildcards).to_smolstr();
                self.wildcards += 1;
                Ok(vec![SourceType::variable(name)])
            }
            TokenKind::Ident => {
                let path = self.path()?;
                Ok(vec![SourceType::constructor(path, vec![])])
            }
            TokenKind::ParenLeft => {
                self.advance();
                if self.eat(TokenKind::ParenRight) {
                    return Ok(vec![SourceType::tuple(vec![])]);
                }
                let mut arguments = vec![self.ty()?];
                while self.eat(TokenKind::Comma) {
                    arguments.push(self.ty()?);
                }
                self.expect(TokenKind::ParenRight)?;
                Ok(arguments)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn path(&mut self) -> Result<Path, ParseError> {
        let first = self.expect(TokenKind::Ident)?;
        let mut segments: Vec<SmolStr> = vec![first.text];
        while self.at(TokenKind::Dot) {
            self.advance();
            let segment = self.expect(TokenKind::Ident)?;
            segments.push(segment.text);
        }
        Ok(Path::new(segments))
    }
}
