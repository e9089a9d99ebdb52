//! Hyrpn: structural hashing and equality for postfix-encoded formulas.
//!
//! Formulas produced by the symbolic executor are flat, reverse-Polish token
//! sequences (identifiers, constants, boolean values and operators). This crate
//! gives them hash and equality semantics suitable for keys of hash tables used
//! to deduplicate or memoize formulas during state-space exploration.
//!
//! Layers
//!  - [`hash::hash_combine`]: order-sensitive fold step every composite hash is built from.
//!  - [`hash::StructuralHash`] / [`hash::StructuralEq`]: capability traits implemented for
//!    integers, pairs, sequences, tokens, formulas and formula pairs.
//!  - [`key`]: a pass-through hasher so std collections bucket keys by their structural hash.
//!  - [`table::FormulaTable`]: thread-safe deduplicating registry handing out stable refs.
//!
//! Two formulas that are logically equivalent but structurally different hash and compare
//! differently. Only the token sequence matters.
//!
//! Example
//! ```
//! use hyrpn::prelude::*;
//!
//! let x = Ident::new(0, 0, 0, 32);
//! let f1 = Formula::ident(x).apply_binary(Formula::constant(5), Operator::Add);
//! let f2 = Formula::from_tokens([Token::Identifier(x), Token::Constant(5), Token::Op(Operator::Add)]);
//!
//! assert!(f1.structural_eq(&f2));
//! assert_eq!(f1.structural_hash(), f2.structural_hash());
//!
//! let mut seen: StructuralSet<Formula> = StructuralSet::default();
//! assert!(seen.insert(f1));
//! assert!(!seen.insert(f2));
//! ```

/// Error type for formula well-formedness checks.
pub mod error;
/// Token model and the postfix formula container.
pub mod formula;
/// Hash-combination primitive and the structural capability traits.
pub mod hash;
/// Hasher adapters for std hash-based collections.
pub mod key;
/// Deduplicating formula table.
pub mod table;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::formula::{
        Formula, FormulaPair,
        token::{Ident, Operator, Token},
    };
    pub use crate::hash::{StructuralEq, StructuralHash, hash_combine};
    pub use crate::key::{
        PassThroughHasher, StructuralBuildHasher, StructuralMap, StructuralSet, spread,
    };
    pub use crate::table::{FormulaRef, FormulaTable};
}
