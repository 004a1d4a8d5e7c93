//! Token types shared by the scanner and the parser engine.
//!
//! The engine never knows the concrete vocabulary of a language. Kinds are supplied by the language through the
//! [`TokenKind`] trait, which only has to name the end-of-file kind and say which kinds mark lexical errors.

use std::fmt;
use std::hash::Hash;

/// Kind tag of a token, supplied by the concrete language.
///
/// ## Notes
/// - `Display` is used when rendering "expected" diagnostics, so it should print the kind the way a user would
///   spell it (`END`, `=`, `identifier`).
pub trait TokenKind: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static {
    /// Kind of the token produced once the source is exhausted.
    const EOF: Self;

    /// Return `true` for the "invalid character" and "invalid token" kinds.
    ///
    /// The scanner records a lexical error for every token of such a kind.
    fn is_invalid(&self) -> bool;
}

/// 1-based source position.
///
/// Ordering is by line, then column, which is the order diagnostics are presented in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// A classified lexeme with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub kind: K,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl<K: TokenKind> Token<K> {
    /// Construct a new token.
    pub fn new(kind: K, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Return `true` if this token has the given kind.
    pub fn is(&self, kind: K) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == K::EOF
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}
