#![forbid(unsafe_code)]
//! Language-independent front-end engine for small recursive-descent compilers.
//!
//! A language plugs in three things:
//!
//! - a token vocabulary ([`TokenKind`]) and a [`Classifier`] automaton that turns characters into tokens
//! - a type vocabulary ([`TypeTag`])
//! - a [`Grammar`] whose recognizers drive the [`Parser`] and call the [`SemanticContext`] hooks
//!
//! The engine supplies the rest: line-buffered scanning with positions, a symbol model with nested scopes,
//! fail-fast or recovering error handling, and diagnostics sorted by source position.
//!
//! ## Panic Policy
//!
//! Library code does not panic on malformed input: lexical, syntax, and semantic problems all become
//! [`CompileError`]s in the report returned by [`Parser::parse`]. `.unwrap()` is reserved for tests.

pub mod diagnostics;
pub mod parser;
pub mod scanner;
pub mod scope;
pub mod semantics;
pub mod symbols;
pub mod token;

#[cfg(test)]
mod test_support;

pub use diagnostics::{CompileError, Diagnostics, Expected};
pub use parser::{Abort, Grammar, ParseReport, Parsed, Parser, Strategy};
pub use scanner::{Classifier, Cursor, END_OF_LINE, END_OF_STREAM, LineSource, Scanner, lines_of};
pub use scope::{Bindings, Scope, ScopeStack, SymbolTable};
pub use semantics::SemanticContext;
pub use symbols::{ArrayInfo, Bounds, FunctionInfo, Param, Symbol, SymbolKind, TypeTag};
pub use token::{Position, Token, TokenKind};
