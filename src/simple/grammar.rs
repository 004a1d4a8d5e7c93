//! Recursive-descent recognizers for Simple.
//!
//! ```text
//! Program    = "PROGRAM" Ident [ "WITH" DeclList ] "IN" StmtList "END" .
//! DeclList   = Decl { "," Decl } .
//! Decl       = Ident ( "AS" TypeSpec | "=" Literal ) .
//! TypeSpec   = BaseType | "ARRAY" "[" Dim { "," Dim } "]" "OF" BaseType .
//! Dim        = IntLit [ ":" IntLit ] .
//! StmtList   = { Statement } .
//! Statement  = Assignment | If | While | Read | Write | Block .
//! Block      = "WITH" DeclList "IN" StmtList "END" .
//! Expression = SimpleExpr [ RelOp SimpleExpr ] .
//! SimpleExpr = [ "-" ] Term { ( "+" | "-" | "OR" ) Term } .
//! Term       = Factor { ( "*" | "/" | "AND" ) Factor } .
//! Factor     = Ident [ "[" ExprList "]" ] | IntLit | RealLit | "TRUE" | "FALSE" | "NOT" Factor | "(" Expression ")" .
//! ```
//!
//! One method per rule. Each recognizer calls the type rules in [`super::semantics`] as soon as its operands are
//! known, so checking happens in the same single pass as parsing.

use descent_core::{Bounds, CompileError, Expected, Grammar, Parsed, Parser, SemanticContext, Symbol, Token};

use super::lexer::Lexer;
use super::semantics::{self, Operand};
use super::tokens::Kind;
use super::types::Type;

type P = Parser<Lexer, Type>;

/// Grammar state: the symbols declared so far, in declaration order.
#[derive(Debug, Default)]
pub struct SimpleGrammar {
    declarations: Vec<Symbol<Kind, Type>>,
}

impl SimpleGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every symbol that was accepted into a scope, in declaration order. Rejected duplicates are not included.
    pub fn into_declarations(self) -> Vec<Symbol<Kind, Type>> {
        self.declarations
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn program(&mut self, p: &mut P) -> Parsed {
        p.must_be(Kind::Program)?;
        p.must_be(Kind::Ident)?;
        p.open_scope();
        if p.have(Kind::With) {
            p.advance();
            self.decl_list(p)?;
        }
        p.must_be(Kind::In)?;
        self.stmt_list(p)?;
        p.must_be(Kind::End)?;
        p.close_scope();
        Ok(())
    }

    fn decl_list(&mut self, p: &mut P) -> Parsed {
        self.decl(p)?;
        while p.have(Kind::Comma) {
            p.advance();
            self.decl(p)?;
        }
        Ok(())
    }

    fn decl(&mut self, p: &mut P) -> Parsed {
        let Some(name) = p.must_be(Kind::Ident)? else {
            return Ok(());
        };

        let symbol = if p.have(Kind::As) {
            p.advance();
            self.type_spec(p, name)?
        } else if p.have(Kind::Assign) {
            p.advance();
            let ty = self.literal(p)?;
            Symbol::constant(name, ty)
        } else {
            p.syntax_error(Expected::description("'AS' or '='"))?;
            return Ok(());
        };

        if p.declare(symbol.clone())? {
            tracing::trace!(name = symbol.name(), ty = %symbol.ty, kind = symbol.kind_name(), "declared");
            self.declarations.push(symbol);
        }
        Ok(())
    }

    fn type_spec(&mut self, p: &mut P, name: Token<Kind>) -> Parsed<Symbol<Kind, Type>> {
        if !p.have(Kind::Array) {
            let ty = self.base_type(p)?;
            return Ok(Symbol::var(name, ty));
        }

        p.advance();
        p.must_be(Kind::LBracket)?;
        let mut dims = vec![self.dim(p)?];
        while p.have(Kind::Comma) {
            p.advance();
            dims.push(self.dim(p)?);
        }
        p.must_be(Kind::RBracket)?;
        p.must_be(Kind::Of)?;
        let ty = self.base_type(p)?;
        Ok(Symbol::array(name, ty, dims))
    }

    /// `size` (indices `0..size-1`) or `lower:upper`.
    fn dim(&mut self, p: &mut P) -> Parsed<Bounds> {
        let start = p.current().clone();
        let first = self.int_constant(p)?;
        if !p.have(Kind::Colon) {
            if first <= 0 {
                p.report(CompileError::custom(start, format!("Array size {} must be positive", first)))?;
            }
            return Ok(Bounds::of_size(first));
        }

        p.advance();
        let last = self.int_constant(p)?;
        if first > last {
            p.report(CompileError::custom(
                start,
                format!("Lower bound {} exceeds upper bound {}", first, last),
            ))?;
        }
        Ok(Bounds::new(first, last))
    }

    /// Optionally negated integer literal in a declaration.
    fn int_constant(&mut self, p: &mut P) -> Parsed<i64> {
        let negative = p.have(Kind::Minus);
        if negative {
            p.advance();
        }
        let Some(token) = p.must_be(Kind::IntLiteral)? else {
            return Ok(0);
        };
        let value = int_value(p, &token)?;
        Ok(if negative { -value } else { value })
    }

    fn base_type(&mut self, p: &mut P) -> Parsed<Type> {
        if let Some(ty) = Type::from_keyword(p.current().kind) {
            p.advance();
            return Ok(ty);
        }
        p.syntax_error(Expected::description("a type"))?;
        Ok(Type::Undefined)
    }

    /// Literal initializer of a constant.
    fn literal(&mut self, p: &mut P) -> Parsed<Type> {
        let negative = p.have(Kind::Minus);
        if negative {
            p.advance();
        }
        let ty = match p.current().kind {
            Kind::IntLiteral => Type::Integer,
            Kind::RealLiteral => Type::Real,
            Kind::True | Kind::False if !negative => Type::Boolean,
            _ => {
                p.syntax_error(Expected::description("a literal"))?;
                return Ok(Type::Undefined);
            }
        };
        let token = p.advance();
        if ty == Type::Integer {
            int_value(p, &token)?;
        }
        Ok(ty)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn stmt_list(&mut self, p: &mut P) -> Parsed {
        while !p.have_any(&[Kind::End, Kind::Else, Kind::Eof]) {
            self.statement(p)?;
        }
        Ok(())
    }

    fn statement(&mut self, p: &mut P) -> Parsed {
        match p.current().kind {
            Kind::Ident => self.assignment(p),
            Kind::If => self.if_statement(p),
            Kind::While => self.while_statement(p),
            Kind::Read => self.read_statement(p),
            Kind::Write => self.write_statement(p),
            Kind::With => self.block(p),
            _ => {
                p.syntax_error(Expected::description("a statement"))?;
                // Skip the offending token so the statement list always makes progress.
                p.advance();
                Ok(())
            }
        }
    }

    fn assignment(&mut self, p: &mut P) -> Parsed {
        let name = p.advance();
        let symbol = p.resolve(&name)?;
        semantics::check_target(p, &name, symbol.as_ref())?;
        let target = self.designator(p, &name, symbol.as_ref())?;
        p.must_be(Kind::Assign)?;
        let value = self.expression(p)?;
        semantics::assignment(p, target, &value)
    }

    fn if_statement(&mut self, p: &mut P) -> Parsed {
        p.advance();
        let cond = self.expression(p)?;
        semantics::condition(p, &cond)?;
        p.must_be(Kind::Then)?;
        self.stmt_list(p)?;
        if p.have(Kind::Else) {
            p.advance();
            self.stmt_list(p)?;
        }
        p.must_be(Kind::End)?;
        Ok(())
    }

    fn while_statement(&mut self, p: &mut P) -> Parsed {
        p.advance();
        let cond = self.expression(p)?;
        semantics::condition(p, &cond)?;
        p.must_be(Kind::Do)?;
        self.stmt_list(p)?;
        p.must_be(Kind::End)?;
        Ok(())
    }

    fn read_statement(&mut self, p: &mut P) -> Parsed {
        p.advance();
        let Some(name) = p.must_be(Kind::Ident)? else {
            return Ok(());
        };
        let symbol = p.resolve(&name)?;
        semantics::check_target(p, &name, symbol.as_ref())?;
        semantics::unindexed(p, &name, symbol.as_ref())?;
        Ok(())
    }

    fn write_statement(&mut self, p: &mut P) -> Parsed {
        p.advance();
        self.expression(p)?;
        Ok(())
    }

    /// `WITH` block: its declarations live in a nested scope that ends with the block.
    fn block(&mut self, p: &mut P) -> Parsed {
        p.advance();
        p.open_scope();
        self.decl_list(p)?;
        p.must_be(Kind::In)?;
        self.stmt_list(p)?;
        p.must_be(Kind::End)?;
        p.close_scope();
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self, p: &mut P) -> Parsed<Operand> {
        let left = self.simple_expression(p)?;
        if !p.current().kind.is_relational() {
            return Ok(left);
        }
        let op = p.advance();
        let right = self.simple_expression(p)?;
        let ty = semantics::relational(p, &op, &left, &right)?;
        Ok(Operand::new(ty, left.token))
    }

    fn simple_expression(&mut self, p: &mut P) -> Parsed<Operand> {
        let mut left = if p.have(Kind::Minus) {
            let op = p.advance();
            let operand = self.term(p)?;
            let ty = semantics::negate(p, &op, &operand)?;
            Operand {
                ty,
                token: op,
                constant: operand.constant.map(|value| -value),
            }
        } else {
            self.term(p)?
        };

        while p.have_any(&[Kind::Plus, Kind::Minus, Kind::Or]) {
            let op = p.advance();
            let right = self.term(p)?;
            let ty = match op.kind {
                Kind::Or => semantics::logical(p, &left, &right)?,
                _ => semantics::arithmetic(p, &op, &left, &right)?,
            };
            left = Operand::new(ty, left.token);
        }
        Ok(left)
    }

    fn term(&mut self, p: &mut P) -> Parsed<Operand> {
        let mut left = self.factor(p)?;
        while p.have_any(&[Kind::Star, Kind::Slash, Kind::And]) {
            let op = p.advance();
            let right = self.factor(p)?;
            let ty = match op.kind {
                Kind::And => semantics::logical(p, &left, &right)?,
                _ => semantics::arithmetic(p, &op, &left, &right)?,
            };
            left = Operand::new(ty, left.token);
        }
        Ok(left)
    }

    fn factor(&mut self, p: &mut P) -> Parsed<Operand> {
        match p.current().kind {
            Kind::Ident => {
                let name = p.advance();
                let symbol = p.resolve(&name)?;
                let ty = self.designator(p, &name, symbol.as_ref())?;
                Ok(Operand::new(ty, name))
            }
            Kind::IntLiteral => {
                let token = p.advance();
                let value = int_value(p, &token)?;
                Ok(Operand::integer(token, value))
            }
            Kind::RealLiteral => Ok(Operand::new(Type::Real, p.advance())),
            Kind::True | Kind::False => Ok(Operand::new(Type::Boolean, p.advance())),
            Kind::Not => {
                let op = p.advance();
                let operand = self.factor(p)?;
                let ty = semantics::not(p, &operand)?;
                Ok(Operand::new(ty, op))
            }
            Kind::LParen => {
                p.advance();
                let inner = self.expression(p)?;
                p.must_be(Kind::RParen)?;
                Ok(inner)
            }
            _ => {
                let token = p.current().clone();
                p.syntax_error(Expected::description("an expression"))?;
                Ok(Operand::undefined(token))
            }
        }
    }

    /// A name, optionally followed by an index list; returns the type it denotes.
    fn designator(&mut self, p: &mut P, name: &Token<Kind>, symbol: Option<&Symbol<Kind, Type>>) -> Parsed<Type> {
        if !p.have(Kind::LBracket) {
            return semantics::unindexed(p, name, symbol);
        }
        p.advance();
        let mut indices = vec![self.expression(p)?];
        while p.have(Kind::Comma) {
            p.advance();
            indices.push(self.expression(p)?);
        }
        p.must_be(Kind::RBracket)?;
        semantics::index(p, name, symbol, &indices)
    }
}

impl Grammar for SimpleGrammar {
    type Classifier = Lexer;
    type Type = Type;

    fn start(&mut self, parser: &mut P) -> Parsed {
        self.program(parser)
    }
}

/// Value of an integer literal token; out-of-range literals are reported and read as 0.
fn int_value(p: &mut P, token: &Token<Kind>) -> Parsed<i64> {
    match token.text.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(_) => {
            p.report(CompileError::custom(
                token.clone(),
                format!("Integer literal '{}' is out of range", token.text),
            ))?;
            Ok(0)
        }
    }
}
