//! Token vocabulary of Simple.

use std::fmt;

use descent_core::TokenKind;

/// Token kinds of Simple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    // ========== Keywords ==========
    Program,
    With,
    As,
    In,
    End,
    Integer,
    Real,
    Boolean,
    Array,
    Of,
    If,
    Then,
    Else,
    While,
    Do,
    Read,
    Write,
    True,
    False,
    And,
    Or,
    Not,

    // ========== Identifiers and Literals ==========
    Ident,
    IntLiteral,
    RealLiteral,

    // ========== Operators and Punctuation ==========
    Assign,   // =
    Comma,    // ,
    Colon,    // :
    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    EqEq,     // ==
    NotEq,    // <>
    Lt,       // <
    LtEq,     // <=
    Gt,       // >
    GtEq,     // >=

    // ========== Special ==========
    /// A character that starts no token.
    InvalidChar,
    /// A malformed lexeme, such as a real literal without fractional digits.
    InvalidToken,
    Eof,
}

impl Kind {
    /// Map source text to a keyword kind. Keywords are upper-case and case-sensitive.
    pub fn keyword(text: &str) -> Option<Kind> {
        let kind = match text {
            "PROGRAM" => Kind::Program,
            "WITH" => Kind::With,
            "AS" => Kind::As,
            "IN" => Kind::In,
            "END" => Kind::End,
            "INTEGER" => Kind::Integer,
            "REAL" => Kind::Real,
            "BOOLEAN" => Kind::Boolean,
            "ARRAY" => Kind::Array,
            "OF" => Kind::Of,
            "IF" => Kind::If,
            "THEN" => Kind::Then,
            "ELSE" => Kind::Else,
            "WHILE" => Kind::While,
            "DO" => Kind::Do,
            "READ" => Kind::Read,
            "WRITE" => Kind::Write,
            "TRUE" => Kind::True,
            "FALSE" => Kind::False,
            "AND" => Kind::And,
            "OR" => Kind::Or,
            "NOT" => Kind::Not,
            _ => return None,
        };
        Some(kind)
    }

    /// Source spelling, for keywords and punctuation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Program => "PROGRAM",
            Kind::With => "WITH",
            Kind::As => "AS",
            Kind::In => "IN",
            Kind::End => "END",
            Kind::Integer => "INTEGER",
            Kind::Real => "REAL",
            Kind::Boolean => "BOOLEAN",
            Kind::Array => "ARRAY",
            Kind::Of => "OF",
            Kind::If => "IF",
            Kind::Then => "THEN",
            Kind::Else => "ELSE",
            Kind::While => "WHILE",
            Kind::Do => "DO",
            Kind::Read => "READ",
            Kind::Write => "WRITE",
            Kind::True => "TRUE",
            Kind::False => "FALSE",
            Kind::And => "AND",
            Kind::Or => "OR",
            Kind::Not => "NOT",
            Kind::Ident => "identifier",
            Kind::IntLiteral => "integer literal",
            Kind::RealLiteral => "real literal",
            Kind::Assign => "=",
            Kind::Comma => ",",
            Kind::Colon => ":",
            Kind::LBracket => "[",
            Kind::RBracket => "]",
            Kind::LParen => "(",
            Kind::RParen => ")",
            Kind::Plus => "+",
            Kind::Minus => "-",
            Kind::Star => "*",
            Kind::Slash => "/",
            Kind::EqEq => "==",
            Kind::NotEq => "<>",
            Kind::Lt => "<",
            Kind::LtEq => "<=",
            Kind::Gt => ">",
            Kind::GtEq => ">=",
            Kind::InvalidChar => "invalid character",
            Kind::InvalidToken => "invalid token",
            Kind::Eof => "<EOF>",
        }
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Kind::EqEq | Kind::NotEq | Kind::Lt | Kind::LtEq | Kind::Gt | Kind::GtEq
        )
    }
}

impl TokenKind for Kind {
    const EOF: Self = Kind::Eof;

    fn is_invalid(&self) -> bool {
        matches!(self, Kind::InvalidChar | Kind::InvalidToken)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(Kind::keyword("WHILE"), Some(Kind::While));
        assert_eq!(Kind::keyword("while"), None);
        assert_eq!(Kind::keyword("While"), None);
    }

    #[test]
    fn test_keyword_spelling_round_trips() {
        for kind in [Kind::Program, Kind::Boolean, Kind::Not, Kind::Of] {
            assert_eq!(Kind::keyword(kind.as_str()), Some(kind));
        }
    }
}
