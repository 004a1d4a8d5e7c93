//! Type vocabulary of Simple.

use std::fmt;

use descent_core::TypeTag;

use super::tokens::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Unresolved or erroneous; never conflicts with anything.
    Undefined,
    Integer,
    Real,
    Boolean,
}

impl Type {
    /// The type named by a base-type keyword.
    pub fn from_keyword(kind: Kind) -> Option<Type> {
        match kind {
            Kind::Integer => Some(Type::Integer),
            Kind::Real => Some(Type::Real),
            Kind::Boolean => Some(Type::Boolean),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Real)
    }
}

impl TypeTag for Type {
    const UNDEFINED: Self = Type::Undefined;
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Undefined => "Undefined",
            Type::Integer => "Integer",
            Type::Real => "Real",
            Type::Boolean => "Boolean",
        };
        f.write_str(name)
    }
}
