//! Postfix formulas.
//!
//! Role
//! - [`Formula`] stores the reverse-Polish token sequence of a symbolic formula. The tree
//!   structure is never rebuilt; hashing and comparison only walk the flat sequence.
//! - [`FormulaPair`] keys tables indexed by two formulas at once (e.g. a path condition
//!   together with a value).
//!
//! Example
//! ```
//! use hyrpn::prelude::*;
//!
//! let x = Ident::new(0, 4, 1, 8);
//! let f = Formula::ident(x)
//!     .apply_binary(Formula::constant(1), Operator::Add)
//!     .apply_binary(Formula::constant(0), Operator::Ne);
//! assert_eq!(f.to_string(), "@0:4.1/8 1 add 0 ne");
//! assert!(f.validate().is_ok());
//! ```
pub mod token;

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::formula::token::{Ident, Operator, Token};
use crate::hash::{StructuralEq, StructuralHash, hash_combine};

/// Formula in postfix order.
///
/// Equality semantics
/// - Two formulas are equal iff their token sequences have the same length and are equal
///   element-wise. Logically equivalent formulas with different token sequences differ.
#[derive(Debug, Clone)]
pub struct Formula {
    rpn: SmallVec<Token, 8>,
}

impl Formula {
    /// Create an empty formula.
    pub fn new() -> Self {
        Self {
            rpn: SmallVec::new(),
        }
    }

    /// Create a formula from tokens already in postfix order.
    pub fn from_tokens<I: IntoIterator<Item = Token>>(tokens: I) -> Self {
        Self {
            rpn: tokens.into_iter().collect(),
        }
    }

    /// Single identifier.
    pub fn ident(id: Ident) -> Self {
        Self::from_tokens([Token::Identifier(id)])
    }

    /// Single integer constant.
    pub fn constant(value: i32) -> Self {
        Self::from_tokens([Token::Constant(value)])
    }

    /// Single boolean value.
    pub fn boolean(value: bool) -> Self {
        Self::from_tokens([Token::boolean(value)])
    }

    /// Append a token at the end of the sequence.
    #[inline]
    pub fn push(&mut self, token: Token) {
        self.rpn.push(token);
    }

    /// `op(self)`.
    pub fn apply_unary(mut self, op: Operator) -> Self {
        debug_assert_eq!(op.arity(), 1, "`{op}` is not a unary operator");
        self.push(Token::Op(op));
        self
    }

    /// `op(self, rhs)`.
    pub fn apply_binary(mut self, rhs: Formula, op: Operator) -> Self {
        debug_assert_eq!(op.arity(), 2, "`{op}` is not a binary operator");
        self.rpn.extend(rhs.rpn);
        self.push(Token::Op(op));
        self
    }

    /// The token sequence in postfix order.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.rpn
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens().iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rpn.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rpn.is_empty()
    }

    /// Check that the sequence evaluates to exactly one value.
    ///
    /// Hashing and comparison do not require a well-formed formula; this is only a
    /// sanity check for producers.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyFormula);
        }

        let mut depth = 0usize;
        for (position, token) in self.iter().enumerate() {
            let (pop, push) = token.stack_effect();
            if depth < pop {
                let Token::Op(op) = token else {
                    unreachable!("only operators pop values")
                };
                return Err(Error::StackUnderflow {
                    position,
                    op: *op,
                    arity: pop,
                    available: depth,
                });
            }
            depth = depth - pop + push;
        }

        match depth {
            1 => Ok(()),
            remaining => Err(Error::UnbalancedFormula { remaining }),
        }
    }
}

impl Default for Formula {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Token> for Formula {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}

impl<'a> IntoIterator for &'a Formula {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, token) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

impl StructuralHash for Formula {
    #[inline]
    fn structural_hash(&self) -> u64 {
        self.tokens().structural_hash()
    }
}

impl StructuralEq for Formula {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self.tokens() == other.tokens()
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

/// Ordered pair of formulas used as a single key.
///
/// `(a, b)` and `(b, a)` are different keys unless `a == b`.
#[derive(Debug, Clone)]
pub struct FormulaPair {
    pub first: Formula,
    pub second: Formula,
}

impl FormulaPair {
    pub fn new(first: Formula, second: Formula) -> Self {
        Self { first, second }
    }

    /// Swap the two components.
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

impl From<(Formula, Formula)> for FormulaPair {
    fn from((first, second): (Formula, Formula)) -> Self {
        Self { first, second }
    }
}

impl From<FormulaPair> for (Formula, Formula) {
    fn from(pair: FormulaPair) -> Self {
        (pair.first, pair.second)
    }
}

impl StructuralHash for FormulaPair {
    #[inline]
    fn structural_hash(&self) -> u64 {
        hash_combine(self.first.structural_hash(), self.second.structural_hash())
    }
}

impl StructuralEq for FormulaPair {
    // Must agree with `Formula`'s equality.
    fn structural_eq(&self, other: &Self) -> bool {
        self.first.tokens() == other.first.tokens() && self.second.tokens() == other.second.tokens()
    }
}

impl PartialEq for FormulaPair {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl Eq for FormulaPair {}

impl Hash for FormulaPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}
