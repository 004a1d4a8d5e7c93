//! Semantic hooks grammars call while recognizing declarations and uses.
//!
//! [`SemanticContext`] is implemented by [`Parser`]; grammars bring it into scope and call `declare`, `resolve`,
//! and `expect_type` from their recognizers. Every check reports through [`SemanticContext::report`], so the
//! active [`Strategy`](crate::parser::Strategy) decides whether the error aborts, is recorded, or is suppressed.

use crate::diagnostics::CompileError;
use crate::parser::{Parsed, Parser};
use crate::scanner::Classifier;
use crate::scope::{Bindings, ScopeStack};
use crate::symbols::{Symbol, TypeTag};
use crate::token::{Token, TokenKind};

pub trait SemanticContext {
    type Kind: TokenKind;
    type Type: TypeTag;

    fn scopes(&self) -> &ScopeStack<Self::Kind, Self::Type>;

    fn scopes_mut(&mut self) -> &mut ScopeStack<Self::Kind, Self::Type>;

    fn is_recovering(&self) -> bool;

    /// Hand a semantic error to the error strategy.
    fn report(&mut self, error: CompileError<Self::Kind, Self::Type>) -> Parsed;

    fn open_scope(&mut self) {
        self.scopes_mut().open_scope();
    }

    /// Returns `false` when no scope was open.
    fn close_scope(&mut self) -> bool {
        self.scopes_mut().close_scope()
    }

    /// Bind `symbol` in the innermost scope.
    ///
    /// A name already bound at that level is reported as [`CompileError::AlreadyDeclared`] and the scope keeps
    /// the first binding. With no scope open, an outermost scope is opened first.
    fn declare(&mut self, symbol: Symbol<Self::Kind, Self::Type>) -> Parsed<bool> {
        let original = self
            .scopes()
            .current()
            .and_then(|scope| scope.local(symbol.name()))
            .cloned();
        if let Some(original) = original {
            self.report(CompileError::AlreadyDeclared {
                token: symbol.token,
                original,
            })?;
            return Ok(false);
        }

        let scopes = self.scopes_mut();
        if scopes.is_empty() {
            tracing::warn!(name = symbol.name(), "declaration with no open scope; opening one");
            scopes.open_scope();
        }
        Ok(scopes.current_mut().is_some_and(|scope| scope.add(symbol)))
    }

    /// Look `token` up through all enclosing scopes, reporting [`CompileError::NotDeclared`] when it is unbound.
    fn resolve(&mut self, token: &Token<Self::Kind>) -> Parsed<Option<Symbol<Self::Kind, Self::Type>>> {
        let found = self
            .scopes()
            .current()
            .and_then(|scope| scope.get(&token.text))
            .cloned();
        if found.is_none() {
            self.report(CompileError::NotDeclared { token: token.clone() })?;
        }
        Ok(found)
    }

    /// Check `found` against `expected`.
    ///
    /// An undefined type on either side has already been reported (or cannot be known) and is accepted silently.
    fn expect_type(
        &mut self,
        token: &Token<Self::Kind>,
        found: Self::Type,
        expected: Self::Type,
    ) -> Parsed<bool> {
        if found == expected || found.is_undefined() || expected.is_undefined() {
            return Ok(true);
        }
        self.report(CompileError::TypeConflict {
            token: token.clone(),
            found,
            expected,
        })?;
        Ok(false)
    }
}

impl<C: Classifier, T: TypeTag> SemanticContext for Parser<C, T> {
    type Kind = C::Kind;
    type Type = T;

    fn scopes(&self) -> &ScopeStack<C::Kind, T> {
        self.scope_stack()
    }

    fn scopes_mut(&mut self) -> &mut ScopeStack<C::Kind, T> {
        self.scope_stack_mut()
    }

    fn is_recovering(&self) -> bool {
        Parser::is_recovering(self)
    }

    fn report(&mut self, error: CompileError<C::Kind, T>) -> Parsed {
        self.semantic_error(error)
    }
}
