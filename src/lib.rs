#![forbid(unsafe_code)]
//! Descent: a checker for the Simple teaching language, built on the `descent_core` front-end engine.
//!
//! `descent_core` provides the language-independent pieces (scanner driver, recursive-descent engine with
//! fail-fast and recovering strategies, scoped symbol tables, sorted diagnostics). This crate supplies a concrete
//! language on top of it and the `descent` command-line tool.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Malformed programs** never panic: every problem becomes a diagnostic in the returned report.

pub mod cli;
pub mod simple;

pub use descent_core::{CompileError, ParseReport, Strategy};
pub use simple::{CheckOutcome, check, check_reader};
