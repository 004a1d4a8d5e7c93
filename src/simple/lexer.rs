//! Lexer for Simple.
//!
//! A finite-state automaton driven through the engine's [`Cursor`]. Each call skips blanks and `//` comments, then
//! follows transitions until the current character cannot extend the lexeme (maximal munch); the boundary
//! character is left for the next call.

use descent_core::{Classifier, Cursor, END_OF_LINE, Token};

use super::tokens::Kind;

// ============================================================================
// AUTOMATON
// ----------------------------------------------------------------------------
//
// [Start] ─letter─▶ [Word] ─letter/digit─▶ [Word]
//    │
//    ├─digit─▶ [Integer] ─digit─▶ [Integer]
//    │             └─'.'─▶ [Point] ─digit─▶ [Fraction] ─digit─▶ [Fraction]
//    │                        (accepting [Point] yields an invalid token)
//    ├─'<'─▶ [Less] ─'='─▶ <=   ─'>'─▶ <>
//    ├─'>'─▶ [Greater] ─'='─▶ >=
//    ├─'='─▶ [Equals] ─'='─▶ ==
//    └─other─▶ single-character token, or an invalid character
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Word,
    Integer,
    Point,
    Fraction,
    Less,
    Greater,
    Equals,
    /// Accepting state with no further transitions.
    Done(Kind),
}

fn step(state: State, c: char) -> Option<State> {
    let next = match state {
        State::Start => match c {
            c if c.is_ascii_alphabetic() => State::Word,
            c if c.is_ascii_digit() => State::Integer,
            '<' => State::Less,
            '>' => State::Greater,
            '=' => State::Equals,
            ',' => State::Done(Kind::Comma),
            ':' => State::Done(Kind::Colon),
            '[' => State::Done(Kind::LBracket),
            ']' => State::Done(Kind::RBracket),
            '(' => State::Done(Kind::LParen),
            ')' => State::Done(Kind::RParen),
            '+' => State::Done(Kind::Plus),
            '-' => State::Done(Kind::Minus),
            '*' => State::Done(Kind::Star),
            '/' => State::Done(Kind::Slash),
            _ => State::Done(Kind::InvalidChar),
        },
        State::Word if c.is_ascii_alphanumeric() => State::Word,
        State::Integer if c.is_ascii_digit() => State::Integer,
        State::Integer if c == '.' => State::Point,
        State::Point | State::Fraction if c.is_ascii_digit() => State::Fraction,
        State::Less if c == '=' => State::Done(Kind::LtEq),
        State::Less if c == '>' => State::Done(Kind::NotEq),
        State::Greater if c == '=' => State::Done(Kind::GtEq),
        State::Equals if c == '=' => State::Done(Kind::EqEq),
        _ => return None,
    };
    Some(next)
}

fn accept(state: State, text: &str) -> Kind {
    match state {
        State::Word => Kind::keyword(text).unwrap_or(Kind::Ident),
        State::Integer => Kind::IntLiteral,
        State::Point => Kind::InvalidToken,
        State::Fraction => Kind::RealLiteral,
        State::Less => Kind::Lt,
        State::Greater => Kind::Gt,
        State::Equals => Kind::Assign,
        State::Done(kind) => kind,
        State::Start => Kind::InvalidChar,
    }
}

/// Skip blanks, line ends, and `//` comments.
fn skip_trivia(cursor: &mut Cursor) {
    loop {
        match cursor.current_char() {
            ' ' | '\t' | '\r' | END_OF_LINE => cursor.consume_input(1),
            '/' if cursor.peek_char(1) == '/' => {
                // Stop on the line's END_OF_LINE sentinel; the next pass consumes it.
                let rest = cursor.line_remaining().len().saturating_sub(1);
                cursor.consume_input(rest);
            }
            _ => return,
        }
    }
}

/// The Simple classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Classifier for Lexer {
    type Kind = Kind;

    fn classify(&mut self, cursor: &mut Cursor) -> Token<Kind> {
        skip_trivia(cursor);

        let (line, column) = (cursor.line(), cursor.column());
        if cursor.is_exhausted() {
            return Token::new(Kind::Eof, Kind::Eof.as_str(), line, column);
        }

        let mut state = State::Start;
        let mut text = String::new();
        while let Some(next) = step(state, cursor.current_char()) {
            text.push(cursor.current_char());
            cursor.consume_input(1);
            state = next;
        }

        Token::new(accept(state, &text), text, line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simple::types::Type;
    use descent_core::{Diagnostics, Scanner, lines_of};

    fn lex(source: &str) -> (Vec<(Kind, String)>, Vec<String>) {
        let mut scanner = Scanner::<Lexer, Type>::new(Lexer);
        scanner.init(Box::new(lines_of(source)), Diagnostics::new());
        let mut tokens = Vec::new();
        while let Some(token) = scanner.next_token() {
            if token.is_eof() {
                break;
            }
            tokens.push((token.kind, token.text.clone()));
        }
        let errors = scanner
            .finish()
            .map(|sink| sink.into_sorted().iter().map(|e| e.to_string()).collect())
            .unwrap_or_default();
        (tokens, errors)
    }

    fn kinds(source: &str) -> Vec<Kind> {
        lex(source).0.into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("PROGRAM demo WITH x1 AS INTEGER IN END"),
            vec![
                Kind::Program,
                Kind::Ident,
                Kind::With,
                Kind::Ident,
                Kind::As,
                Kind::Integer,
                Kind::In,
                Kind::End,
            ]
        );
        // Keywords are case-sensitive.
        assert_eq!(kinds("program"), vec![Kind::Ident]);
    }

    #[test]
    fn test_maximal_munch_operators() {
        assert_eq!(
            kinds("a==b<>c<=d>=e<f>g=h"),
            vec![
                Kind::Ident,
                Kind::EqEq,
                Kind::Ident,
                Kind::NotEq,
                Kind::Ident,
                Kind::LtEq,
                Kind::Ident,
                Kind::GtEq,
                Kind::Ident,
                Kind::Lt,
                Kind::Ident,
                Kind::Gt,
                Kind::Ident,
                Kind::Assign,
                Kind::Ident,
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        let (tokens, errors) = lex("42 3.25 7.");
        assert_eq!(
            tokens,
            vec![
                (Kind::IntLiteral, "42".to_string()),
                (Kind::RealLiteral, "3.25".to_string()),
                (Kind::InvalidToken, "7.".to_string()),
            ]
        );
        assert_eq!(errors, vec!["(1,9): Invalid token '7.'"]);
    }

    #[test]
    fn test_comments_run_to_end_of_line() {
        let (tokens, errors) = lex("x = 1 // trailing $ junk\n// whole line\ny");
        let texts: Vec<_> = tokens.iter().map(|(_, text)| text.as_str()).collect();
        assert_eq!(texts, ["x", "=", "1", "y"]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_single_slash_is_division() {
        assert_eq!(kinds("a / b"), vec![Kind::Ident, Kind::Slash, Kind::Ident]);
    }

    #[test]
    fn test_stray_character_resumes_on_next() {
        let (tokens, errors) = lex("a ? b");
        assert_eq!(
            tokens,
            vec![
                (Kind::Ident, "a".to_string()),
                (Kind::InvalidChar, "?".to_string()),
                (Kind::Ident, "b".to_string()),
            ]
        );
        assert_eq!(errors, vec!["(1,3): Invalid token '?'"]);
    }
}
