//! Recursive-descent parsing engine.
//!
//! A concrete grammar implements [`Grammar`] with one recognizer method per rule. Recognizers drive the engine
//! through three primitives:
//!
//! - [`Parser::have`]: peek at the lookahead without consuming it
//! - [`Parser::must_be`]: consume the lookahead if it matches, otherwise hand over to error handling
//! - [`Parser::syntax_error`]: record that the lookahead is not what the rule expected
//!
//! Every recognizer returns [`Parsed`]. Fail-fast parsing reports the first error and returns [`Abort`], which
//! recognizers propagate with `?` until [`Parser::parse`] swallows it; the caller only ever sees the report.
//!
//! ## Error strategies
//!
//! ```text
//!                    mismatch: record, recovering = true
//!   [Normal] ──────────────────────────────────────────────▶ [Recovering]
//!      ▲                                                         │
//!      │      must_be(k): skip tokens until k, consume it        │
//!      └─────────────────────────────────────────────────────────┘
//!                         (at EOF: give up, stay recovering)
//! ```
//!
//! - [`Strategy::FailFast`]: the first syntax or semantic error ends the parse. At most one error is reported.
//! - [`Strategy::Recovering`] (Turner's method): a syntax error is recorded and the parser enters the recovering
//!   state; while recovering, further syntax and semantic errors are suppressed and each `must_be(k)` discards
//!   tokens until it finds `k`. Every such call consumes at least one token or stops at EOF, so recovery always
//!   terminates.
//!
//! ## Notes
//! - Recognizers must tolerate being re-entered with an unexpected lookahead while recovering; their `must_be`
//!   calls then act as skips.
//! - Resynchronization can land on a token that only accidentally matches (one belonging to a later construct).
//!   That is inherent to the method.

use std::mem;

use crate::diagnostics::{CompileError, Diagnostics, Expected};
use crate::scanner::{Classifier, LineSource, Scanner};
use crate::scope::ScopeStack;
use crate::symbols::TypeTag;
use crate::token::{Token, TokenKind};

/// Signal that a fail-fast parse has stopped.
///
/// Only the engine constructs it; grammars propagate it with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort {
    _private: (),
}

/// Result of a recognizer.
pub type Parsed<T = ()> = Result<T, Abort>;

/// How the engine reacts to syntax and semantic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Stop at the first error.
    FailFast,
    /// Record once, then resynchronize (Turner's method).
    #[default]
    Recovering,
}

/// A concrete grammar: the start-symbol recognizer plus whatever rules it calls.
pub trait Grammar {
    type Classifier: Classifier;
    type Type: TypeTag;

    /// Recognize the start symbol. The engine checks for end of file afterwards.
    fn start(&mut self, parser: &mut Parser<Self::Classifier, Self::Type>) -> Parsed;
}

/// Outcome of [`Parser::parse`].
#[derive(Debug)]
pub struct ParseReport<K, T> {
    errors: Vec<CompileError<K, T>>,
    recovering: bool,
    scopes: ScopeStack<K, T>,
}

impl<K, T> ParseReport<K, T> {
    /// `true` when no error of any kind was reported.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// All diagnostics, ordered by `(line, column)`.
    pub fn errors(&self) -> &[CompileError<K, T>] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<CompileError<K, T>> {
        self.errors
    }

    /// Whether the parser was still recovering when the input ended.
    pub fn is_recovering(&self) -> bool {
        self.recovering
    }

    /// Scopes still open when the parse ended.
    pub fn scopes(&self) -> &ScopeStack<K, T> {
        &self.scopes
    }
}

/// Single-lookahead recursive-descent driver.
///
/// One instance parses one source: [`Parser::parse`] consumes it.
pub struct Parser<C: Classifier, T> {
    scanner: Scanner<C, T>,
    strategy: Strategy,
    lookahead: Token<C::Kind>,
    recovering: bool,
    scopes: ScopeStack<C::Kind, T>,
}

impl<C: Classifier, T: TypeTag> Parser<C, T> {
    /// Create a parser for one source.
    ///
    /// ## Parameters
    /// - `classifier`: The language's lexical automaton.
    /// - `strategy`: How syntax and semantic errors are handled.
    pub fn new(classifier: C, strategy: Strategy) -> Self {
        Self {
            scanner: Scanner::new(classifier),
            strategy,
            lookahead: Token::new(C::Kind::EOF, "", 1, 1),
            recovering: false,
            scopes: ScopeStack::new(),
        }
    }

    /// Parse `source` with `grammar` and report every diagnostic, sorted by position.
    #[tracing::instrument(skip_all, fields(strategy = ?self.strategy))]
    pub fn parse<G>(mut self, grammar: &mut G, source: impl LineSource + Send + 'static) -> ParseReport<C::Kind, T>
    where
        G: Grammar<Classifier = C, Type = T>,
    {
        self.scanner.init(Box::new(source), Diagnostics::new());
        self.advance();

        let outcome = grammar.start(&mut self).and_then(|()| self.expect_end());
        if outcome.is_err() {
            tracing::debug!(line = self.lookahead.line, column = self.lookahead.column, "parse aborted");
        }

        let errors = self.scanner.finish().map(Diagnostics::into_sorted).unwrap_or_default();
        tracing::debug!(error_count = errors.len(), recovering = self.recovering, "parse finished");
        ParseReport {
            errors,
            recovering: self.recovering,
            scopes: self.scopes,
        }
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// The lookahead token.
    pub fn current(&self) -> &Token<C::Kind> {
        &self.lookahead
    }

    /// Return `true` if the lookahead has kind `kind`. Never consumes.
    pub fn have(&self, kind: C::Kind) -> bool {
        self.lookahead.kind == kind
    }

    /// Return `true` if the lookahead has any of `kinds`.
    pub fn have_any(&self, kinds: &[C::Kind]) -> bool {
        kinds.contains(&self.lookahead.kind)
    }

    pub fn at_eof(&self) -> bool {
        self.lookahead.is_eof()
    }

    /// Consume the lookahead unconditionally and return it.
    pub fn advance(&mut self) -> Token<C::Kind> {
        let next = match self.scanner.next_token() {
            Some(token) => token.clone(),
            None => Token::new(C::Kind::EOF, "", self.lookahead.line, self.lookahead.column),
        };
        mem::replace(&mut self.lookahead, next)
    }

    /// Require a token of kind `kind`.
    ///
    /// Returns the consumed token, or `None` when nothing matched:
    /// - normally, a match is consumed; a mismatch goes to [`Parser::syntax_error`]
    /// - while recovering, tokens are discarded until one of kind `kind` turns up; it is consumed and recovery
    ///   ends. Reaching end of file first ends the search silently and the parser stays recovering.
    pub fn must_be(&mut self, kind: C::Kind) -> Parsed<Option<Token<C::Kind>>> {
        if self.recovering {
            let mut skipped = 0usize;
            while !self.have(kind) && !self.at_eof() {
                self.advance();
                skipped += 1;
            }
            if self.have(kind) {
                self.recovering = false;
                tracing::debug!(
                    %kind,
                    skipped,
                    line = self.lookahead.line,
                    column = self.lookahead.column,
                    "resynchronized"
                );
                return Ok(Some(self.advance()));
            }
            tracing::debug!(%kind, skipped, "end of file reached while recovering");
            return Ok(None);
        }

        if self.have(kind) {
            return Ok(Some(self.advance()));
        }
        self.syntax_error(kind)?;
        Ok(None)
    }

    /// After the start symbol: the input must be exhausted, unless recovery already gave up on it.
    fn expect_end(&mut self) -> Parsed {
        if self.recovering || self.at_eof() {
            return Ok(());
        }
        self.syntax_error(C::Kind::EOF)
    }

    /// Report that the lookahead is not what the current rule expected.
    ///
    /// Fail-fast: records and aborts. Recovering: records unless already recovering, enters the recovering state,
    /// and returns normally so the calling recognizer can carry on.
    pub fn syntax_error(&mut self, expected: impl Into<Expected<C::Kind>>) -> Parsed {
        let error = CompileError::syntax(self.lookahead.clone(), expected);
        match self.strategy {
            Strategy::FailFast => {
                self.record(error);
                Err(Abort { _private: () })
            }
            Strategy::Recovering => {
                if !self.recovering {
                    tracing::debug!(%error, "syntax error; recovering");
                    self.record(error);
                }
                self.recovering = true;
                Ok(())
            }
        }
    }

    /// Report a semantic error.
    ///
    /// Fail-fast: records and aborts. Recovering: records only when not recovering, never aborts.
    pub fn semantic_error(&mut self, error: CompileError<C::Kind, T>) -> Parsed {
        match self.strategy {
            Strategy::FailFast => {
                self.record(error);
                Err(Abort { _private: () })
            }
            Strategy::Recovering => {
                if self.recovering {
                    tracing::trace!(%error, "semantic error suppressed while recovering");
                } else {
                    self.record(error);
                }
                Ok(())
            }
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn is_recovering(&self) -> bool {
        self.recovering
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub(crate) fn scope_stack(&self) -> &ScopeStack<C::Kind, T> {
        &self.scopes
    }

    pub(crate) fn scope_stack_mut(&mut self) -> &mut ScopeStack<C::Kind, T> {
        &mut self.scopes
    }

    fn record(&mut self, error: CompileError<C::Kind, T>) {
        if let Some(sink) = self.scanner.diagnostics_mut() {
            sink.push(error);
        }
    }
}
