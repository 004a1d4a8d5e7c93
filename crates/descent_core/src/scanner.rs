//! Lexical scanning driver.
//!
//! The driver owns a [`Cursor`] over a pull-based [`LineSource`] and defers classification to a language-supplied
//! [`Classifier`]: a finite-state automaton that consumes characters through the cursor primitives and returns
//! exactly one token per call.
//!
//! ## Cursor model
//!
//! ```text
//! [line buffer] "x = 1\n"     one source line plus the END_OF_LINE sentinel
//!                ^ pos        current_char() / consume_input(n)
//! buffer exhausted → pull next line from the source
//! source exhausted or failed → current_char() == END_OF_STREAM forever
//! ```
//!
//! ## Notes
//! - Lexical errors (tokens whose kind reports [`TokenKind::is_invalid`]) are recorded in the sink and scanning
//!   continues with the next character.
//! - A failing source is recorded once as an I/O error and then behaves as if it had ended.

use std::io;

use crate::diagnostics::{CompileError, Diagnostics};
use crate::symbols::TypeTag;
use crate::token::{Position, Token, TokenKind};

/// Sentinel appended to every buffered line.
pub const END_OF_LINE: char = '\n';

/// Sentinel returned by [`Cursor::current_char`] once the source is exhausted.
pub const END_OF_STREAM: char = '\0';

/// Pull-based source of text lines.
///
/// Lines are returned without their terminator. `None` signals the end of the stream.
pub trait LineSource {
    fn next_line(&mut self) -> Option<io::Result<String>>;
}

impl<I> LineSource for I
where
    I: Iterator<Item = io::Result<String>>,
{
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.next()
    }
}

/// Build an owned line source over `text`.
///
/// ## Examples
/// ```rust
/// use descent_core::scanner::{LineSource, lines_of};
///
/// let mut source = lines_of("a\nb");
/// assert_eq!(source.next_line().unwrap().unwrap(), "a");
/// ```
pub fn lines_of(text: &str) -> std::vec::IntoIter<io::Result<String>> {
    text.lines()
        .map(|line| Ok(line.to_string()))
        .collect::<Vec<io::Result<String>>>()
        .into_iter()
}

/// Character cursor over a line-buffered source.
pub struct Cursor {
    source: Box<dyn LineSource + Send>,
    buffer: Vec<char>,
    pos: usize,
    line: usize,
    exhausted: bool,
    /// Total characters consumed so far.
    consumed: usize,
    failure: Option<(Position, io::Error)>,
}

impl Cursor {
    /// Create a cursor and buffer the first line.
    pub fn new(source: Box<dyn LineSource + Send>) -> Self {
        let mut cursor = Self {
            source,
            buffer: Vec::new(),
            pos: 0,
            line: 0,
            exhausted: false,
            consumed: 0,
            failure: None,
        };
        cursor.fill();
        cursor
    }

    /// Line of the current character (1-based).
    pub fn line(&self) -> usize {
        self.line.max(1)
    }

    /// Column of the current character (1-based).
    ///
    /// Once the source is exhausted this is the column just past the last line's text.
    pub fn column(&self) -> usize {
        self.pos + 1
    }

    pub fn position(&self) -> Position {
        Position::new(self.line(), self.column())
    }

    /// The character under the cursor, or [`END_OF_STREAM`] once the source is exhausted.
    pub fn current_char(&self) -> char {
        if self.exhausted {
            END_OF_STREAM
        } else {
            self.buffer.get(self.pos).copied().unwrap_or(END_OF_STREAM)
        }
    }

    /// The character `offset` places after the current one, staying within the buffered line.
    ///
    /// Past the end of the line this is [`END_OF_LINE`]; once exhausted it is [`END_OF_STREAM`].
    pub fn peek_char(&self, offset: usize) -> char {
        if self.exhausted {
            return END_OF_STREAM;
        }
        self.line_remaining().get(offset).copied().unwrap_or(END_OF_LINE)
    }

    /// The unconsumed rest of the buffered line, including its [`END_OF_LINE`] sentinel.
    pub fn line_remaining(&self) -> &[char] {
        if self.exhausted {
            return &[];
        }
        self.buffer.get(self.pos..).unwrap_or(&[])
    }

    /// Consume `n` characters, pulling further lines as the buffer runs out.
    ///
    /// Consuming past the end of the source is a no-op.
    pub fn consume_input(&mut self, n: usize) {
        for _ in 0..n {
            if self.exhausted {
                return;
            }
            self.pos += 1;
            self.consumed += 1;
            if self.pos >= self.buffer.len() {
                self.fill();
            }
        }
    }

    /// Return `true` once the source has been exhausted (or has failed).
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Total characters consumed so far, across lines.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn take_failure(&mut self) -> Option<(Position, io::Error)> {
        self.failure.take()
    }

    fn fill(&mut self) {
        if self.exhausted {
            return;
        }
        match self.source.next_line() {
            Some(Ok(text)) => {
                self.buffer.clear();
                self.buffer.extend(text.chars());
                self.buffer.push(END_OF_LINE);
                self.pos = 0;
                self.line += 1;
            }
            Some(Err(cause)) => {
                self.end_stream();
                self.failure = Some((self.position(), cause));
            }
            None => self.end_stream(),
        }
    }

    /// Park the cursor just past the last line's text.
    fn end_stream(&mut self) {
        self.exhausted = true;
        self.pos = self.buffer.len().saturating_sub(1);
    }
}

/// Language-supplied classification automaton.
///
/// ## Contract
/// - Consume the lexeme's characters through the cursor and return exactly one token.
/// - Maximal munch: keep accumulating while the current character extends the lexeme, and stop *without*
///   consuming the first character that does not.
/// - Return a [`TokenKind::EOF`] token once [`Cursor::current_char`] is [`END_OF_STREAM`] and the cursor reports
///   [`Cursor::is_exhausted`].
pub trait Classifier {
    type Kind: TokenKind;

    fn classify(&mut self, cursor: &mut Cursor) -> Token<Self::Kind>;
}

/// Per-source state, present once [`Scanner::init`] has run.
struct Active<K, T> {
    cursor: Cursor,
    sink: Diagnostics<K, T>,
    current: Option<Token<K>>,
}

/// Generic token-production loop around a [`Classifier`].
///
/// `T` is the type tag of the diagnostics recorded in the sink.
pub struct Scanner<C: Classifier, T> {
    classifier: C,
    active: Option<Active<C::Kind, T>>,
}

impl<C: Classifier, T: TypeTag> Scanner<C, T> {
    /// Create an uninitialized scanner.
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            active: None,
        }
    }

    /// Attach a source and the sink lexical and I/O errors are recorded in.
    ///
    /// Must precede every other call; re-initializing discards the previous source.
    pub fn init(&mut self, source: Box<dyn LineSource + Send>, sink: Diagnostics<C::Kind, T>) {
        let mut cursor = Cursor::new(source);
        let mut sink = sink;
        if let Some((position, cause)) = cursor.take_failure() {
            sink.push(CompileError::io(position, cause));
        }
        self.active = Some(Active {
            cursor,
            sink,
            current: None,
        });
    }

    /// The most recently produced token; `None` before the first [`Scanner::next_token`] or before `init`.
    pub fn current_token(&self) -> Option<&Token<C::Kind>> {
        self.active.as_ref().and_then(|a| a.current.as_ref())
    }

    /// Return `true` once the end-of-file token has been produced.
    pub fn is_at_end(&self) -> bool {
        self.current_token().is_some_and(|t| t.is_eof())
    }

    /// Produce the next token.
    ///
    /// Before `init` this does nothing and returns `None`. At end of file it keeps returning the same EOF token.
    pub fn next_token(&mut self) -> Option<&Token<C::Kind>> {
        let active = self.active.as_mut()?;
        if active.current.as_ref().is_some_and(|t| t.is_eof()) {
            return active.current.as_ref();
        }

        let before = active.cursor.consumed();
        let token = self.classifier.classify(&mut active.cursor);
        if !token.is_eof() && active.cursor.consumed() == before {
            // A classifier that consumes nothing would stall the parser; force progress.
            tracing::warn!(text = %token.text, line = token.line, column = token.column, "classifier consumed no input");
            active.cursor.consume_input(1);
        }

        if let Some((position, cause)) = active.cursor.take_failure() {
            tracing::debug!(%position, error = %cause, "line source failed; treating as end of input");
            active.sink.push(CompileError::io(position, cause));
        }
        if token.kind.is_invalid() {
            active.sink.push(CompileError::Lexical { token: token.clone() });
        }

        tracing::trace!(kind = ?token.kind, text = %token.text, line = token.line, column = token.column, "token");
        active.current = Some(token);
        active.current.as_ref()
    }

    pub fn diagnostics(&self) -> Option<&Diagnostics<C::Kind, T>> {
        self.active.as_ref().map(|a| &a.sink)
    }

    pub fn diagnostics_mut(&mut self) -> Option<&mut Diagnostics<C::Kind, T>> {
        self.active.as_mut().map(|a| &mut a.sink)
    }

    /// Detach the source and return the sink.
    pub fn finish(&mut self) -> Option<Diagnostics<C::Kind, T>> {
        self.active.take().map(|a| a.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Kind, Lexer, Ty};

    fn scanner(text: &str) -> Scanner<Lexer, Ty> {
        let mut scanner = Scanner::new(Lexer);
        scanner.init(Box::new(lines_of(text)), Diagnostics::new());
        scanner
    }

    fn drain(scanner: &mut Scanner<Lexer, Ty>) -> Vec<(Kind, String, usize, usize)> {
        let mut out = Vec::new();
        while let Some(t) = scanner.next_token() {
            out.push((t.kind, t.text.clone(), t.line, t.column));
            if t.is_eof() {
                break;
            }
        }
        out
    }

    #[test]
    fn test_uninitialized_scanner_is_inert() {
        let mut scanner = Scanner::<Lexer, Ty>::new(Lexer);
        assert!(scanner.next_token().is_none());
        assert!(scanner.current_token().is_none());
        assert!(!scanner.is_at_end());
        assert!(scanner.diagnostics().is_none());
    }

    #[test]
    fn test_tokens_carry_line_and_column() {
        let mut s = scanner("ab (cd)\n  ef;");
        let tokens = drain(&mut s);
        assert_eq!(
            tokens,
            vec![
                (Kind::Word, "ab".to_string(), 1, 1),
                (Kind::LParen, "(".to_string(), 1, 4),
                (Kind::Word, "cd".to_string(), 1, 5),
                (Kind::RParen, ")".to_string(), 1, 7),
                (Kind::Word, "ef".to_string(), 2, 3),
                (Kind::Semi, ";".to_string(), 2, 5),
                (Kind::Eof, String::new(), 2, 6),
            ]
        );
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut s = scanner("a");
        drain(&mut s);
        assert!(s.is_at_end());
        let again = s.next_token().cloned().unwrap();
        assert!(again.is_eof());
        assert_eq!(s.next_token().cloned(), Some(again));
    }

    #[test]
    fn test_stray_character_is_recorded_and_scanning_resumes() {
        let mut s = scanner("ab $cd");
        let tokens = drain(&mut s);
        assert_eq!(tokens[1], (Kind::Invalid, "$".to_string(), 1, 4));
        assert_eq!(tokens[2], (Kind::Word, "cd".to_string(), 1, 5));

        let sink = s.finish().unwrap();
        assert_eq!(sink.len(), 1);
        assert!(matches!(sink.iter().next(), Some(CompileError::Lexical { token }) if token.text == "$"));
    }

    #[test]
    fn test_empty_source_yields_eof_at_origin() {
        let mut s = scanner("");
        let tokens = drain(&mut s);
        assert_eq!(tokens, vec![(Kind::Eof, String::new(), 1, 1)]);
    }

    #[test]
    fn test_failing_source_records_io_error_and_ends() {
        let lines = vec![
            Ok("ab".to_string()),
            Err(io::Error::other("disk on fire")),
            Ok("never read".to_string()),
        ];
        let mut s = Scanner::<Lexer, Ty>::new(Lexer);
        s.init(Box::new(lines.into_iter()), Diagnostics::new());

        let kinds: Vec<_> = drain(&mut s).into_iter().map(|t| t.0).collect();
        assert_eq!(kinds, vec![Kind::Word, Kind::Eof]);

        let errors = s.finish().unwrap().into_sorted();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CompileError::Io { .. }));
        assert!(errors[0].to_string().contains("disk on fire"));
    }

    #[test]
    fn test_cursor_primitives() {
        let mut cursor = Cursor::new(Box::new(lines_of("xy\nz")));
        assert_eq!(cursor.current_char(), 'x');
        assert_eq!(cursor.peek_char(1), 'y');
        assert_eq!(cursor.line_remaining(), &['x', 'y', END_OF_LINE]);

        cursor.consume_input(2);
        assert_eq!(cursor.current_char(), END_OF_LINE);
        assert_eq!(cursor.peek_char(1), END_OF_LINE);

        cursor.consume_input(1);
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        assert_eq!(cursor.current_char(), 'z');

        cursor.consume_input(5);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current_char(), END_OF_STREAM);
        assert!(cursor.line_remaining().is_empty());
        assert_eq!(cursor.consumed(), 5);
    }
}
