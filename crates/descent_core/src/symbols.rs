//! Symbol model: what a declared name stands for.
//!
//! A [`Symbol`] ties the declaring token to a type tag and a [`SymbolKind`]. The variants are closed; languages that
//! need more information keep it alongside the symbol rather than subclassing it.

use std::fmt;

use crate::token::Token;

/// Type tag of a symbol, supplied by the concrete language.
pub trait TypeTag: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Sentinel for "no type known": out-of-range parameter queries and unresolved names.
    const UNDEFINED: Self;

    fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }
}

/// Inclusive index range of one array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub lower: i64,
    pub upper: i64,
}

impl Bounds {
    /// Degenerate dimension used in place of malformed bounds.
    pub const DEGENERATE: Bounds = Bounds { lower: 0, upper: 0 };

    /// Explicit bounds; `lower > upper` is coerced to [`Bounds::DEGENERATE`].
    pub fn new(lower: i64, upper: i64) -> Self {
        if lower > upper {
            Self::DEGENERATE
        } else {
            Self { lower, upper }
        }
    }

    /// Zero-based bounds for `size` elements; a non-positive size is coerced to [`Bounds::DEGENERATE`].
    pub fn of_size(size: i64) -> Self {
        if size <= 0 {
            Self::DEGENERATE
        } else {
            Self { lower: 0, upper: size - 1 }
        }
    }

    /// Number of indices in `lower..=upper`, saturating at `u64::MAX` for the full `i64` range.
    pub fn size(&self) -> u64 {
        if self.lower > self.upper {
            return 0;
        }
        self.upper.abs_diff(self.lower).saturating_add(1)
    }

    pub fn contains(&self, index: i64) -> bool {
        (self.lower..=self.upper).contains(&index)
    }
}

/// Shape of an array symbol. Dimensions are queried 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    dims: Vec<Bounds>,
}

impl ArrayInfo {
    pub fn new(dims: Vec<Bounds>) -> Self {
        Self { dims }
    }

    pub fn dimensions(&self) -> usize {
        self.dims.len()
    }

    /// Bounds of dimension `d` (1-based), if it exists.
    pub fn bounds(&self, d: usize) -> Option<Bounds> {
        d.checked_sub(1).and_then(|i| self.dims.get(i)).copied()
    }

    /// Number of elements in dimension `d`; 0 for an out-of-range `d`.
    pub fn size(&self, d: usize) -> u64 {
        self.bounds(d).map_or(0, |b| b.size())
    }

    pub fn lower_bound(&self, d: usize) -> i64 {
        self.bounds(d).map_or(0, |b| b.lower)
    }

    pub fn upper_bound(&self, d: usize) -> i64 {
        self.bounds(d).map_or(0, |b| b.upper)
    }

    /// Return `true` if `index` is valid for dimension `d`; `false` for an out-of-range `d`.
    pub fn in_bounds(&self, d: usize, index: i64) -> bool {
        self.bounds(d).is_some_and(|b| b.contains(index))
    }
}

/// One formal parameter of a function symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param<T> {
    pub ty: T,
    pub name: String,
}

/// Signature of a function symbol. Parameters are queried 1-based.
///
/// ## Notes
/// - Parameters carry elementary type tags only; array parameters are not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo<T> {
    params: Vec<Param<T>>,
}

impl<T: TypeTag> FunctionInfo<T> {
    pub fn new(params: Vec<Param<T>>) -> Self {
        Self { params }
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Type of parameter `i` (1-based); [`TypeTag::UNDEFINED`] when out of range.
    pub fn param_type(&self, i: usize) -> T {
        self.param(i).map_or(T::UNDEFINED, |p| p.ty)
    }

    /// Name of parameter `i` (1-based); empty when out of range.
    pub fn param_name(&self, i: usize) -> &str {
        self.param(i).map_or("", |p| p.name.as_str())
    }

    pub fn params(&self) -> &[Param<T>] {
        &self.params
    }

    fn param(&self, i: usize) -> Option<&Param<T>> {
        i.checked_sub(1).and_then(|i| self.params.get(i))
    }
}

/// Kind of symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind<T> {
    Var,
    Const,
    Array(ArrayInfo),
    /// The symbol's own type is the return type.
    Function(FunctionInfo<T>),
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol<K, T> {
    /// The declaring token; its text is the symbol's name.
    pub token: Token<K>,
    pub ty: T,
    pub kind: SymbolKind<T>,
}

impl<K, T: TypeTag> Symbol<K, T> {
    pub fn var(token: Token<K>, ty: T) -> Self {
        Self {
            token,
            ty,
            kind: SymbolKind::Var,
        }
    }

    pub fn constant(token: Token<K>, ty: T) -> Self {
        Self {
            token,
            ty,
            kind: SymbolKind::Const,
        }
    }

    /// Array with explicit bounds per dimension. `ty` is the element type.
    pub fn array(token: Token<K>, ty: T, dims: Vec<Bounds>) -> Self {
        Self {
            token,
            ty,
            kind: SymbolKind::Array(ArrayInfo::new(dims)),
        }
    }

    /// Array from `(lower, upper)` pairs; malformed pairs become degenerate.
    pub fn array_of_bounds(token: Token<K>, ty: T, bounds: impl IntoIterator<Item = (i64, i64)>) -> Self {
        let dims = bounds.into_iter().map(|(lower, upper)| Bounds::new(lower, upper)).collect();
        Self::array(token, ty, dims)
    }

    /// Array from dimension sizes, each dimension starting at 0.
    pub fn array_of_sizes(token: Token<K>, ty: T, sizes: impl IntoIterator<Item = i64>) -> Self {
        let dims = sizes.into_iter().map(Bounds::of_size).collect();
        Self::array(token, ty, dims)
    }

    /// Function returning `ty`, with `(type, name)` parameters in declaration order.
    pub fn function(token: Token<K>, ty: T, params: impl IntoIterator<Item = (T, String)>) -> Self {
        let params = params.into_iter().map(|(ty, name)| Param { ty, name }).collect();
        Self {
            token,
            ty,
            kind: SymbolKind::Function(FunctionInfo::new(params)),
        }
    }

    pub fn name(&self) -> &str {
        &self.token.text
    }

    pub fn as_array(&self) -> Option<&ArrayInfo> {
        match &self.kind {
            SymbolKind::Array(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionInfo<T>> {
        match &self.kind {
            SymbolKind::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, SymbolKind::Const)
    }

    /// Human-readable kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SymbolKind::Var => "variable",
            SymbolKind::Const => "constant",
            SymbolKind::Array(_) => "array",
            SymbolKind::Function(_) => "function",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Kind, Ty};
    use proptest::prelude::*;

    fn name(text: &str) -> Token<Kind> {
        Token::new(Kind::Word, text, 1, 1)
    }

    #[test]
    fn test_array_from_sizes_is_zero_based() {
        let sym = Symbol::array_of_sizes(name("grid"), Ty::Int, [5, 10]);
        let info = sym.as_array().unwrap();

        assert_eq!(info.dimensions(), 2);
        assert_eq!((info.lower_bound(1), info.upper_bound(1)), (0, 4));
        assert_eq!((info.lower_bound(2), info.upper_bound(2)), (0, 9));
        assert_eq!(info.size(1), 5);
        assert_eq!(info.size(2), 10);
    }

    #[test]
    fn test_array_out_of_range_dimension_is_zero() {
        let sym = Symbol::array_of_bounds(name("v"), Ty::Real, [(1, 3)]);
        let info = sym.as_array().unwrap();

        assert_eq!(info.size(0), 0);
        assert_eq!(info.size(2), 0);
        assert_eq!(info.lower_bound(0), 0);
        assert_eq!(info.upper_bound(7), 0);
        assert!(!info.in_bounds(0, 1));
        assert!(!info.in_bounds(2, 1));
    }

    #[test]
    fn test_malformed_bounds_are_degenerate() {
        let sym = Symbol::array_of_bounds(name("v"), Ty::Int, [(5, 2), (-3, 3)]);
        let info = sym.as_array().unwrap();
        assert_eq!(info.bounds(1), Some(Bounds::DEGENERATE));
        assert_eq!(info.size(1), 1);
        assert_eq!(info.bounds(2), Some(Bounds::new(-3, 3)));
        assert_eq!(info.size(2), 7);

        let sym = Symbol::array_of_sizes(name("w"), Ty::Int, [0, -4]);
        let info = sym.as_array().unwrap();
        assert_eq!(info.bounds(1), Some(Bounds::DEGENERATE));
        assert_eq!(info.bounds(2), Some(Bounds::DEGENERATE));
    }

    #[test]
    fn test_size_of_wide_bounds_does_not_overflow() {
        let sym = Symbol::array_of_bounds(name("v"), Ty::Int, [(i64::MIN, i64::MAX), (-5, i64::MAX)]);
        let info = sym.as_array().unwrap();
        assert_eq!(info.size(1), u64::MAX);
        assert_eq!(info.size(2), i64::MAX as u64 + 6);
        assert!(info.in_bounds(1, i64::MIN));
        assert!(info.in_bounds(1, i64::MAX));

        let by_size = Symbol::array_of_sizes(name("w"), Ty::Int, [i64::MAX]);
        assert_eq!(by_size.as_array().unwrap().size(1), i64::MAX as u64);
    }

    #[test]
    fn test_in_bounds_is_inclusive() {
        let sym = Symbol::array_of_bounds(name("v"), Ty::Int, [(1, 10)]);
        let info = sym.as_array().unwrap();
        assert!(info.in_bounds(1, 1));
        assert!(info.in_bounds(1, 10));
        assert!(!info.in_bounds(1, 0));
        assert!(!info.in_bounds(1, 11));
    }

    #[test]
    fn test_function_params_are_one_based() {
        let sym = Symbol::function(
            name("area"),
            Ty::Real,
            [(Ty::Real, "w".to_string()), (Ty::Int, "h".to_string())],
        );
        let info = sym.as_function().unwrap();

        assert_eq!(sym.ty, Ty::Real);
        assert_eq!(info.param_count(), 2);
        assert_eq!(info.param_type(1), Ty::Real);
        assert_eq!(info.param_name(2), "h");
        assert_eq!(info.param_type(0), Ty::Undefined);
        assert_eq!(info.param_type(3), Ty::Undefined);
        assert_eq!(info.param_name(3), "");
        assert_eq!(sym.kind_name(), "function");
    }

    #[test]
    fn test_scalar_symbols() {
        let v = Symbol::var(name("x"), Ty::Int);
        let c = Symbol::constant(name("n"), Ty::Int);
        assert_eq!(v.name(), "x");
        assert!(!v.is_const());
        assert!(c.is_const());
        assert!(v.as_array().is_none());
        assert!(c.as_function().is_none());
    }

    proptest! {
        /// Explicit bounds give `size == upper - lower + 1` and inclusive membership.
        #[test]
        fn array_bounds_are_inclusive(lower in -1000i64..1000, extent in 0i64..1000) {
            let upper = lower + extent;
            let sym = Symbol::array_of_bounds(name("v"), Ty::Real, [(lower, upper)]);
            let info = sym.as_array().unwrap();

            prop_assert_eq!(info.size(1), extent as u64 + 1);
            prop_assert!(info.in_bounds(1, lower));
            prop_assert!(info.in_bounds(1, upper));
            prop_assert!(!info.in_bounds(1, upper + 1));
            prop_assert!(!info.in_bounds(1, lower - 1));
            prop_assert_eq!(info.size(2), 0);
        }

        /// Size-only dimensions start at zero.
        #[test]
        fn sized_arrays_are_zero_based(size in 1i64..10_000) {
            let sym = Symbol::array_of_sizes(name("v"), Ty::Int, [size]);
            let info = sym.as_array().unwrap();
            prop_assert_eq!((info.lower_bound(1), info.upper_bound(1)), (0, size - 1));
            prop_assert_eq!(info.size(1), size as u64);
        }
    }
}
