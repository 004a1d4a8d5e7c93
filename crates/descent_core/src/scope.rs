//! Symbol tables and the scope stack.
//!
//! A [`SymbolTable`] binds names for one lexical level. A [`Scope`] owns one table plus its enclosing scope, and
//! answers lookups by walking outward. The [`ScopeStack`] is the "current scope" of one compilation; it is owned by
//! the parser rather than shared process-wide, so independent compilations never see each other's bindings.
//!
//! ## Notes
//! - `add` always targets the innermost level, so an inner declaration shadows (never replaces) an outer one.
//! - Closing a scope drops its table; reopening at the same nesting level starts empty.

use std::collections::HashMap;

use crate::symbols::Symbol;

/// Capability set shared by flat tables and nested scopes.
pub trait Bindings<K, T> {
    /// Look up a binding visible from this level.
    fn get(&self, name: &str) -> Option<&Symbol<K, T>>;

    /// Bind `symbol` at this level.
    ///
    /// Returns `false`, leaving the level unchanged, if its name is already bound at this level.
    fn add(&mut self, symbol: Symbol<K, T>) -> bool;

    /// Iterate the symbols bound at this level, in declaration order.
    fn symbols<'a>(&'a self) -> impl Iterator<Item = &'a Symbol<K, T>>
    where
        K: 'a,
        T: 'a;

    fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Flat name → symbol mapping for one lexical level.
#[derive(Debug, Clone)]
pub struct SymbolTable<K, T> {
    symbols: Vec<Symbol<K, T>>,
    index: HashMap<String, usize>,
}

impl<K, T> Default for SymbolTable<K, T> {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K, T> SymbolTable<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<K, T> Bindings<K, T> for SymbolTable<K, T> {
    fn get(&self, name: &str) -> Option<&Symbol<K, T>> {
        self.index.get(name).and_then(|&id| self.symbols.get(id))
    }

    fn add(&mut self, symbol: Symbol<K, T>) -> bool {
        if self.index.contains_key(symbol.token.text.as_str()) {
            return false;
        }
        self.index.insert(symbol.token.text.clone(), self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    fn symbols<'a>(&'a self) -> impl Iterator<Item = &'a Symbol<K, T>>
    where
        K: 'a,
        T: 'a,
    {
        self.symbols.iter()
    }
}

/// One lexical level plus the scope enclosing it.
#[derive(Debug, Clone)]
pub struct Scope<K, T> {
    table: SymbolTable<K, T>,
    outer: Option<Box<Scope<K, T>>>,
}

impl<K, T> Scope<K, T> {
    fn with_outer(outer: Option<Box<Scope<K, T>>>) -> Self {
        Self {
            table: SymbolTable::new(),
            outer,
        }
    }

    /// The bindings of this level only.
    pub fn table(&self) -> &SymbolTable<K, T> {
        &self.table
    }

    pub fn outer(&self) -> Option<&Scope<K, T>> {
        self.outer.as_deref()
    }

    /// Look up a binding at this level only, ignoring enclosing scopes.
    pub fn local(&self, name: &str) -> Option<&Symbol<K, T>> {
        self.table.get(name)
    }

    /// How many levels outward `name` is bound.
    ///
    /// 0 if bound here, otherwise one more than the enclosing scope's answer. The outermost scope answers 0 whether
    /// or not it binds the name, so a name bound nowhere yields the number of enclosing levels.
    pub fn depth(&self, name: &str) -> usize {
        if self.table.is_defined(name) {
            return 0;
        }
        match &self.outer {
            Some(outer) => 1 + outer.depth(name),
            None => 0,
        }
    }
}

impl<K, T> Bindings<K, T> for Scope<K, T> {
    fn get(&self, name: &str) -> Option<&Symbol<K, T>> {
        let mut scope = self;
        loop {
            if let Some(symbol) = scope.table.get(name) {
                return Some(symbol);
            }
            scope = scope.outer.as_deref()?;
        }
    }

    fn add(&mut self, symbol: Symbol<K, T>) -> bool {
        self.table.add(symbol)
    }

    fn symbols<'a>(&'a self) -> impl Iterator<Item = &'a Symbol<K, T>>
    where
        K: 'a,
        T: 'a,
    {
        self.table.symbols()
    }
}

/// Stack of open scopes for one compilation.
#[derive(Debug, Clone)]
pub struct ScopeStack<K, T> {
    current: Option<Box<Scope<K, T>>>,
    level: usize,
}

impl<K, T> Default for ScopeStack<K, T> {
    fn default() -> Self {
        Self { current: None, level: 0 }
    }
}

impl<K, T> ScopeStack<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a fresh, empty level and return it.
    pub fn open_scope(&mut self) -> &mut Scope<K, T> {
        let outer = self.current.take();
        self.level += 1;
        tracing::trace!(level = self.level, "open scope");
        self.current.insert(Box::new(Scope::with_outer(outer)))
    }

    /// Pop to the enclosing level, dropping the innermost table.
    ///
    /// Closing with no scope open is a no-op; the return value tells the two cases apart (`false` means nothing
    /// was open).
    pub fn close_scope(&mut self) -> bool {
        match self.current.take() {
            Some(scope) => {
                self.current = scope.outer;
                self.level -= 1;
                tracing::trace!(level = self.level, "close scope");
                true
            }
            None => {
                tracing::warn!("close_scope called with no open scope");
                false
            }
        }
    }

    /// The innermost open scope.
    pub fn current(&self) -> Option<&Scope<K, T>> {
        self.current.as_deref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Scope<K, T>> {
        self.current.as_deref_mut()
    }

    /// Number of open scopes.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
