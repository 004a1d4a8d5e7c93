//! Type rules of Simple.
//!
//! Each check receives the operands the grammar has already recognized and reports through the engine's
//! [`SemanticContext`], so the active error strategy decides what happens to the diagnostic. Checks return the
//! type of the construct; [`Type::Undefined`] marks a construct that is already wrong and silences every check
//! that later sees it.

use descent_core::{CompileError, Parsed, SemanticContext, Symbol, Token, TypeTag};

use super::tokens::Kind;
use super::types::Type;

/// A recognized (sub-)expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub ty: Type,
    /// First token of the expression; diagnostics about the operand point here.
    pub token: Token<Kind>,
    /// Value of an integer literal (possibly negated), for static bounds checks.
    pub constant: Option<i64>,
}

impl Operand {
    pub fn new(ty: Type, token: Token<Kind>) -> Self {
        Self {
            ty,
            token,
            constant: None,
        }
    }

    pub fn integer(token: Token<Kind>, value: i64) -> Self {
        Self {
            ty: Type::Integer,
            token,
            constant: Some(value),
        }
    }

    /// Placeholder for an operand that could not be recognized.
    pub fn undefined(token: Token<Kind>) -> Self {
        Self::new(Type::Undefined, token)
    }
}

type Ctx = dyn SemanticContext<Kind = Kind, Type = Type>;

/// An assignment or `READ` target must not be a constant.
pub fn check_target(ctx: &mut Ctx, name: &Token<Kind>, symbol: Option<&Symbol<Kind, Type>>) -> Parsed {
    if symbol.is_some_and(Symbol::is_const) {
        ctx.report(CompileError::custom(
            name.clone(),
            format!("Constant '{}' cannot be assigned", name.text),
        ))?;
    }
    Ok(())
}

/// Type of a name used without an index list.
pub fn unindexed(ctx: &mut Ctx, name: &Token<Kind>, symbol: Option<&Symbol<Kind, Type>>) -> Parsed<Type> {
    let Some(symbol) = symbol else {
        return Ok(Type::Undefined);
    };
    if symbol.as_array().is_some() {
        ctx.report(CompileError::custom(
            name.clone(),
            format!("Array '{}' must be indexed", name.text),
        ))?;
        return Ok(Type::Undefined);
    }
    Ok(symbol.ty)
}

/// Element type of `name[indices]`.
///
/// Indices must be Integer and match the dimension count; literal indices are also checked against the bounds.
pub fn index(
    ctx: &mut Ctx,
    name: &Token<Kind>,
    symbol: Option<&Symbol<Kind, Type>>,
    indices: &[Operand],
) -> Parsed<Type> {
    let Some(symbol) = symbol else {
        return Ok(Type::Undefined);
    };
    let Some(info) = symbol.as_array() else {
        ctx.report(CompileError::custom(
            name.clone(),
            format!("'{}' is a {}, not an array", name.text, symbol.kind_name()),
        ))?;
        return Ok(Type::Undefined);
    };

    if indices.len() != info.dimensions() {
        ctx.report(CompileError::custom(
            name.clone(),
            format!(
                "Array '{}' has {} dimension(s) but {} index(es) given",
                name.text,
                info.dimensions(),
                indices.len()
            ),
        ))?;
    }

    for (d, operand) in (1..).zip(indices) {
        ctx.expect_type(&operand.token, operand.ty, Type::Integer)?;
        let Some(value) = operand.constant else { continue };
        if let Some(bounds) = info.bounds(d).filter(|b| !b.contains(value)) {
            ctx.report(CompileError::custom(
                operand.token.clone(),
                format!(
                    "Index {} is out of bounds {}:{} of '{}'",
                    value, bounds.lower, bounds.upper, name.text
                ),
            ))?;
        }
    }
    Ok(symbol.ty)
}

/// `+ - * /`: numeric operands of one type; the result has that type.
pub fn arithmetic(ctx: &mut Ctx, op: &Token<Kind>, left: &Operand, right: &Operand) -> Parsed<Type> {
    if left.ty.is_undefined() || right.ty.is_undefined() {
        return Ok(Type::Undefined);
    }
    if !left.ty.is_numeric() {
        report_non_numeric(ctx, op)?;
        return Ok(Type::Undefined);
    }
    if !ctx.expect_type(&right.token, right.ty, left.ty)? {
        return Ok(Type::Undefined);
    }
    Ok(left.ty)
}

/// `AND OR`: Boolean operands, Boolean result.
pub fn logical(ctx: &mut Ctx, left: &Operand, right: &Operand) -> Parsed<Type> {
    ctx.expect_type(&left.token, left.ty, Type::Boolean)?;
    ctx.expect_type(&right.token, right.ty, Type::Boolean)?;
    Ok(Type::Boolean)
}

/// `== <>` compare any two operands of one type; `< <= > >=` also require them to be numeric. The result is
/// always Boolean.
pub fn relational(ctx: &mut Ctx, op: &Token<Kind>, left: &Operand, right: &Operand) -> Parsed<Type> {
    if left.ty.is_undefined() || right.ty.is_undefined() {
        return Ok(Type::Boolean);
    }
    let ordering = !matches!(op.kind, Kind::EqEq | Kind::NotEq);
    if ordering && !left.ty.is_numeric() {
        report_non_numeric(ctx, op)?;
        return Ok(Type::Boolean);
    }
    ctx.expect_type(&right.token, right.ty, left.ty)?;
    Ok(Type::Boolean)
}

/// Unary minus.
pub fn negate(ctx: &mut Ctx, op: &Token<Kind>, operand: &Operand) -> Parsed<Type> {
    if operand.ty.is_undefined() {
        return Ok(Type::Undefined);
    }
    if !operand.ty.is_numeric() {
        report_non_numeric(ctx, op)?;
        return Ok(Type::Undefined);
    }
    Ok(operand.ty)
}

/// `NOT`
pub fn not(ctx: &mut Ctx, operand: &Operand) -> Parsed<Type> {
    ctx.expect_type(&operand.token, operand.ty, Type::Boolean)?;
    Ok(Type::Boolean)
}

/// `IF` and `WHILE` conditions.
pub fn condition(ctx: &mut Ctx, operand: &Operand) -> Parsed {
    ctx.expect_type(&operand.token, operand.ty, Type::Boolean)?;
    Ok(())
}

pub fn assignment(ctx: &mut Ctx, target: Type, value: &Operand) -> Parsed {
    ctx.expect_type(&value.token, value.ty, target)?;
    Ok(())
}

fn report_non_numeric(ctx: &mut Ctx, op: &Token<Kind>) -> Parsed {
    ctx.report(CompileError::custom(
        op.clone(),
        format!("Operator '{}' requires numeric operands", op.text),
    ))
}
