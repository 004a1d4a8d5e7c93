//! Compiler diagnostics: the error taxonomy and the append-only sink they are collected in.
//!
//! Every diagnostic is bound to a source position and renders as `"(line,column): "` followed by kind-specific
//! wording. That rendering is a compatibility surface for tooling that scrapes diagnostic text, so the wording of
//! existing variants should not change.
//!
//! ## Extending the taxonomy
//!
//! - Language-specific semantic checks report [`CompileError::Custom`] with their own message.
//! - Engine-level kinds are added as new variants. Both the `#[error]` rendering and the `code()` arm in the
//!   [`miette::Diagnostic`] impl are exhaustive, so the compiler points at every place a new variant must be handled.

use std::fmt;
use std::io;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::symbols::{Symbol, TypeTag};
use crate::token::{Position, Token, TokenKind};

/// What a recognizer expected when it reported a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected<K> {
    /// A specific token kind, rendered quoted: `'END'`.
    Kind(K),
    /// A free-form description, rendered as-is: `an expression`.
    Description(String),
}

impl<K> Expected<K> {
    pub fn description(text: impl Into<String>) -> Self {
        Expected::Description(text.into())
    }
}

impl<K> From<K> for Expected<K> {
    fn from(kind: K) -> Self {
        Expected::Kind(kind)
    }
}

impl<K: fmt::Display> fmt::Display for Expected<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Kind(kind) => write!(f, "'{}'", kind),
            Expected::Description(text) => write!(f, "{}", text),
        }
    }
}

/// A compile-time error with location information.
#[derive(Debug, Clone, Error)]
pub enum CompileError<K, T> {
    /// The line source failed; the scanner treats it as end of input.
    #[error("({line},{column}): I/O error: {cause}")]
    Io {
        line: usize,
        column: usize,
        #[source]
        cause: Arc<io::Error>,
    },

    /// An invalid character or malformed lexeme.
    #[error("({},{}): Invalid token '{}'", .token.line, .token.column, .token.text)]
    Lexical { token: Token<K> },

    /// The lookahead did not match what the grammar required.
    #[error("({},{}): '{}' found where {expected} expected", .token.line, .token.column, .token.text)]
    Syntax { token: Token<K>, expected: Expected<K> },

    #[error("({},{}): Identifier '{}' is not declared", .token.line, .token.column, .token.text)]
    NotDeclared { token: Token<K> },

    /// `original` is the symbol already bound at the same level.
    #[error(
        "({},{}): Identifier '{}' is already declared at line {}",
        .token.line, .token.column, .token.text, .original.token.line
    )]
    AlreadyDeclared { token: Token<K>, original: Symbol<K, T> },

    #[error(
        "({},{}): Type conflict: '{}' is of type {found} where {expected} is expected",
        .token.line, .token.column, .token.text
    )]
    TypeConflict { token: Token<K>, found: T, expected: T },

    /// Language-specific diagnostic.
    #[error("({},{}): {}", .token.line, .token.column, .message)]
    Custom { token: Token<K>, message: String },
}

impl<K: TokenKind, T: TypeTag> CompileError<K, T> {
    pub fn io(position: Position, cause: io::Error) -> Self {
        CompileError::Io {
            line: position.line,
            column: position.column,
            cause: Arc::new(cause),
        }
    }

    pub fn syntax(token: Token<K>, expected: impl Into<Expected<K>>) -> Self {
        CompileError::Syntax {
            token,
            expected: expected.into(),
        }
    }

    pub fn custom(token: Token<K>, message: impl Into<String>) -> Self {
        CompileError::Custom {
            token,
            message: message.into(),
        }
    }

    /// Position the diagnostic is reported at.
    pub fn position(&self) -> Position {
        match self {
            CompileError::Io { line, column, .. } => Position::new(*line, *column),
            CompileError::Lexical { token }
            | CompileError::Syntax { token, .. }
            | CompileError::NotDeclared { token }
            | CompileError::AlreadyDeclared { token, .. }
            | CompileError::TypeConflict { token, .. }
            | CompileError::Custom { token, .. } => token.position(),
        }
    }

    /// The token the diagnostic is bound to (`None` for I/O failures).
    pub fn token(&self) -> Option<&Token<K>> {
        match self {
            CompileError::Io { .. } => None,
            CompileError::Lexical { token }
            | CompileError::Syntax { token, .. }
            | CompileError::NotDeclared { token }
            | CompileError::AlreadyDeclared { token, .. }
            | CompileError::TypeConflict { token, .. }
            | CompileError::Custom { token, .. } => Some(token),
        }
    }

    /// Return `true` for errors raised by semantic analysis rather than by the scanner or the grammar.
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            CompileError::NotDeclared { .. }
                | CompileError::AlreadyDeclared { .. }
                | CompileError::TypeConflict { .. }
                | CompileError::Custom { .. }
        )
    }
}

impl<K: TokenKind, T: TypeTag> Diagnostic for CompileError<K, T> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            CompileError::Io { .. } => "descent::io",
            CompileError::Lexical { .. } => "descent::lexical",
            CompileError::Syntax { .. } => "descent::syntax",
            CompileError::NotDeclared { .. } => "descent::not_declared",
            CompileError::AlreadyDeclared { .. } => "descent::already_declared",
            CompileError::TypeConflict { .. } => "descent::type_conflict",
            CompileError::Custom { .. } => "descent::custom",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            CompileError::NotDeclared { .. } => Some(Box::new("Declare the identifier before using it")),
            CompileError::AlreadyDeclared { original, .. } => Some(Box::new(format!(
                "The first declaration is at ({},{}); a nested scope may shadow it instead",
                original.token.line, original.token.column
            ))),
            _ => None,
        }
    }
}

/// Append-only diagnostic sink.
///
/// Errors are kept in detection order while a compilation runs and sorted by position exactly once, in
/// [`Diagnostics::into_sorted`], when they are handed to the caller.
#[derive(Debug, Clone)]
pub struct Diagnostics<K, T> {
    errors: Vec<CompileError<K, T>>,
}

impl<K, T> Default for Diagnostics<K, T> {
    fn default() -> Self {
        Self { errors: Vec::new() }
    }
}

impl<K: TokenKind, T: TypeTag> Diagnostics<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CompileError<K, T>) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate in detection order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompileError<K, T>> {
        self.errors.iter()
    }

    /// Consume the sink and return the errors ordered by `(line, column)`.
    ///
    /// The sort is stable, so errors at the same position keep their detection order.
    pub fn into_sorted(self) -> Vec<CompileError<K, T>> {
        let mut errors = self.errors;
        errors.sort_by_key(|error| error.position());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Kind, Ty};
    use proptest::prelude::*;

    fn tok(kind: Kind, text: &str, line: usize, column: usize) -> Token<Kind> {
        Token::new(kind, text, line, column)
    }

    #[test]
    fn test_renderings_carry_position_prefix() {
        let x = tok(Kind::Word, "x", 3, 7);
        let first = Symbol::var(tok(Kind::Word, "x", 1, 5), Ty::Int);

        let rendered = [
            CompileError::<Kind, Ty>::Lexical {
                token: tok(Kind::Invalid, "$", 2, 4),
            },
            CompileError::syntax(x.clone(), Kind::Semi),
            CompileError::syntax(x.clone(), Expected::description("an expression")),
            CompileError::NotDeclared { token: x.clone() },
            CompileError::AlreadyDeclared {
                token: x.clone(),
                original: first,
            },
            CompileError::TypeConflict {
                token: x.clone(),
                found: Ty::Real,
                expected: Ty::Int,
            },
            CompileError::custom(x, "Constant 'x' cannot be assigned"),
        ]
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n");

        insta::assert_snapshot!(rendered, @r"
        (2,4): Invalid token '$'
        (3,7): 'x' found where ';' expected
        (3,7): 'x' found where an expression expected
        (3,7): Identifier 'x' is not declared
        (3,7): Identifier 'x' is already declared at line 1
        (3,7): Type conflict: 'x' is of type Real where Int is expected
        (3,7): Constant 'x' cannot be assigned
        ");
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let err = CompileError::<Kind, Ty>::io(
            Position::new(4, 1),
            io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        );
        assert_eq!(err.to_string(), "(4,1): I/O error: stream did not contain valid UTF-8");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.token().is_none());
    }

    #[test]
    fn test_sorted_once_by_position_and_stable_on_ties() {
        let mut sink = Diagnostics::<Kind, Ty>::new();
        sink.push(CompileError::custom(tok(Kind::Word, "c", 5, 1), "third"));
        sink.push(CompileError::custom(tok(Kind::Word, "a", 1, 9), "first"));
        sink.push(CompileError::custom(tok(Kind::Word, "b", 2, 3), "tie-1"));
        sink.push(CompileError::custom(tok(Kind::Word, "b", 2, 3), "tie-2"));

        // Accumulation keeps detection order.
        assert_eq!(sink.iter().next().map(|e| e.position()), Some(Position::new(5, 1)));

        let messages: Vec<_> = sink.into_sorted().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec!["(1,9): first", "(2,3): tie-1", "(2,3): tie-2", "(5,1): third"]
        );
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = CompileError::<Kind, Ty>::NotDeclared {
            token: tok(Kind::Word, "y", 1, 1),
        };
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("descent::not_declared"));
        assert!(err.help().is_some());
        assert!(err.is_semantic());

        let err = CompileError::<Kind, Ty>::syntax(tok(Kind::Word, "y", 1, 1), Kind::Semi);
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("descent::syntax"));
        assert!(!err.is_semantic());
    }

    proptest! {
        /// Whatever the push order, the result is ordered by position and ties keep their push order.
        #[test]
        fn into_sorted_is_ordered_and_stable(positions in proptest::collection::vec((1usize..5, 1usize..5), 0..40)) {
            let mut sink = Diagnostics::<Kind, Ty>::new();
            for (i, &(line, column)) in positions.iter().enumerate() {
                sink.push(CompileError::custom(tok(Kind::Word, "w", line, column), i.to_string()));
            }

            let sorted = sink.into_sorted();
            prop_assert_eq!(sorted.len(), positions.len());
            for pair in sorted.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.position() <= b.position());
                if a.position() == b.position() {
                    let order = |e: &CompileError<Kind, Ty>| match e {
                        CompileError::Custom { message, .. } => message.parse::<usize>().unwrap(),
                        _ => unreachable!(),
                    };
                    prop_assert!(order(a) < order(b));
                }
            }
        }
    }
}
