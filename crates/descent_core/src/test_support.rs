//! A toy language for exercising the engine: words, parentheses and semicolons.
//!
//! ```text
//! list = item ";" { item ";" }     (until ")" or end of file)
//! item = word | "(" list ")"
//! ```
//!
//! Every word is declared as a variable in the current scope, and each parenthesized list opens a nested scope.

use std::fmt;

use crate::parser::{Grammar, Parsed, Parser};
use crate::scanner::{Classifier, Cursor, END_OF_LINE};
use crate::semantics::SemanticContext;
use crate::symbols::{Symbol, TypeTag};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Word,
    LParen,
    RParen,
    Semi,
    Invalid,
    Eof,
}

impl TokenKind for Kind {
    const EOF: Self = Kind::Eof;

    fn is_invalid(&self) -> bool {
        *self == Kind::Invalid
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Kind::Word => "word",
            Kind::LParen => "(",
            Kind::RParen => ")",
            Kind::Semi => ";",
            Kind::Invalid => "invalid token",
            Kind::Eof => "end of file",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Undefined,
    Int,
    Real,
}

impl TypeTag for Ty {
    const UNDEFINED: Self = Ty::Undefined;
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Ty::Undefined => "Undefined",
            Ty::Int => "Int",
            Ty::Real => "Real",
        };
        f.write_str(text)
    }
}

pub struct Lexer;

impl Classifier for Lexer {
    type Kind = Kind;

    fn classify(&mut self, cursor: &mut Cursor) -> Token<Kind> {
        while matches!(cursor.current_char(), ' ' | '\t' | END_OF_LINE) {
            cursor.consume_input(1);
        }

        let (line, column) = (cursor.line(), cursor.column());
        if cursor.is_exhausted() {
            return Token::new(Kind::Eof, "", line, column);
        }

        let first = cursor.current_char();
        if first.is_ascii_alphabetic() {
            let mut text = String::new();
            while cursor.current_char().is_ascii_alphabetic() {
                text.push(cursor.current_char());
                cursor.consume_input(1);
            }
            return Token::new(Kind::Word, text, line, column);
        }

        let kind = match first {
            '(' => Kind::LParen,
            ')' => Kind::RParen,
            ';' => Kind::Semi,
            _ => Kind::Invalid,
        };
        cursor.consume_input(1);
        Token::new(kind, first.to_string(), line, column)
    }
}

/// Records every word it recognizes, in order.
#[derive(Default)]
pub struct ListGrammar {
    pub words: Vec<String>,
}

impl ListGrammar {
    fn list(&mut self, p: &mut Parser<Lexer, Ty>) -> Parsed {
        loop {
            self.item(p)?;
            p.must_be(Kind::Semi)?;
            if p.have_any(&[Kind::RParen, Kind::Eof]) {
                return Ok(());
            }
        }
    }

    fn item(&mut self, p: &mut Parser<Lexer, Ty>) -> Parsed {
        if p.have(Kind::Word) {
            let word = p.advance();
            self.words.push(word.text.clone());
            p.declare(Symbol::var(word, Ty::Int))?;
        } else if p.have(Kind::LParen) {
            p.advance();
            p.open_scope();
            self.list(p)?;
            p.must_be(Kind::RParen)?;
            p.close_scope();
        } else {
            p.syntax_error(crate::diagnostics::Expected::description("a word or '('"))?;
        }
        Ok(())
    }
}

impl Grammar for ListGrammar {
    type Classifier = Lexer;
    type Type = Ty;

    fn start(&mut self, p: &mut Parser<Lexer, Ty>) -> Parsed {
        p.open_scope();
        self.list(p)?;
        p.close_scope();
        Ok(())
    }
}
