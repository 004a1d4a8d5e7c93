//! Simple: a small block-structured language built on the `descent_core` engine.
//!
//! ```text
//! PROGRAM demo
//! WITH n = 10, v AS ARRAY[1:10] OF REAL, i AS INTEGER
//! IN
//!     i = 1
//!     WHILE i <= n DO
//!         v[i] = 0.5
//!         i = i + 1
//!     END
//! END
//! ```
//!
//! ## Module Structure
//!
//! - `tokens` - Token kinds and the keyword table
//! - `types` - Type tags
//! - `lexer` - The character automaton
//! - `grammar` - Recursive-descent recognizers
//! - `semantics` - Type rules called from the recognizers

pub mod grammar;
pub mod lexer;
pub mod semantics;
pub mod tokens;
pub mod types;

use std::io::BufRead;

use descent_core::{CompileError, LineSource, ParseReport, Parser, Strategy, Symbol, lines_of};

pub use grammar::SimpleGrammar;
pub use lexer::Lexer;
pub use tokens::Kind;
pub use types::Type;

/// Result of checking one Simple source.
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: ParseReport<Kind, Type>,
    /// Symbols accepted into a scope, in declaration order.
    pub declarations: Vec<Symbol<Kind, Type>>,
}

impl CheckOutcome {
    pub fn succeeded(&self) -> bool {
        self.report.succeeded()
    }

    /// Diagnostics ordered by position.
    pub fn errors(&self) -> &[CompileError<Kind, Type>] {
        self.report.errors()
    }

    /// Rendered diagnostics, one per error.
    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(|e| e.to_string()).collect()
    }
}

/// Parse and check a Simple program held in memory.
pub fn check(source: &str, strategy: Strategy) -> CheckOutcome {
    check_lines(lines_of(source), strategy)
}

/// Parse and check a Simple program read line by line.
///
/// A read failure is reported as an I/O diagnostic and ends the input.
pub fn check_reader<R: BufRead + Send + 'static>(reader: R, strategy: Strategy) -> CheckOutcome {
    check_lines(reader.lines(), strategy)
}

pub fn check_lines(source: impl LineSource + Send + 'static, strategy: Strategy) -> CheckOutcome {
    let mut grammar = SimpleGrammar::new();
    let report = Parser::new(Lexer, strategy).parse(&mut grammar, source);
    CheckOutcome {
        report,
        declarations: grammar.into_declarations(),
    }
}
