//! Formula tokens.
//!
//! A [`Token`] is one element of a postfix formula: an operator, a boolean value, an
//! integer constant, or an identifier naming a memory location at a given generation.
use std::hash::{Hash, Hasher};

use strum::{EnumIs, EnumIter, EnumTryAs, FromRepr, IntoEnumIterator};

use crate::hash::{StructuralEq, StructuralHash, hash_combine};

/// Identifier of a symbolic value.
///
/// Identifies the `generation`-th version of the `bw`-bit wide value stored at offset `off` of
/// segment `seg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ident {
    pub seg: u16,
    pub off: u16,
    pub generation: u16,
    pub bw: u8,
}

impl Ident {
    pub const fn new(seg: u16, off: u16, generation: u16, bw: u8) -> Self {
        Self {
            seg,
            off,
            generation,
            bw,
        }
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}:{}.{}/{}", self.seg, self.off, self.generation, self.bw)
    }
}

impl StructuralHash for Ident {
    fn structural_hash(&self) -> u64 {
        let mut h = 0;
        h = hash_combine(h, self.seg.structural_hash());
        h = hash_combine(h, self.off.structural_hash());
        h = hash_combine(h, self.generation.structural_hash());
        h = hash_combine(h, self.bw.structural_hash());
        h
    }
}

impl StructuralEq for Ident {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

/// Operators that may appear in a formula.
///
/// The discriminant is the operator code; it is what the operator hashes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr)]
#[repr(u8)]
pub enum Operator {
    /// Wrapping addition
    Add = 0,
    /// Wrapping subtraction
    Sub,
    /// Wrapping multiplication
    Mul,
    /// Unsigned division
    UDiv,
    /// Signed division
    SDiv,
    /// Unsigned remainder
    URem,
    /// Signed remainder
    SRem,
    /// Bitwise and
    BitAnd,
    /// Bitwise or
    BitOr,
    /// Bitwise xor
    BitXor,
    /// Bitwise complement
    BitNot,
    /// Shift left
    Shl,
    /// Logical shift right
    LShr,
    /// Arithmetic shift right
    AShr,
    /// Two's complement negation
    Neg,
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Unsigned less than
    Ult,
    /// Unsigned less than or equal
    Ule,
    /// Unsigned greater than
    Ugt,
    /// Unsigned greater than or equal
    Uge,
    /// Signed less than
    Slt,
    /// Signed less than or equal
    Sle,
    /// Signed greater than
    Sgt,
    /// Signed greater than or equal
    Sge,
    /// Boolean conjunction
    And,
    /// Boolean disjunction
    Or,
    /// Boolean negation
    Not,
    /// Boolean implication
    Implies,
    /// Zero extension to the width of the second operand
    ZExt,
    /// Sign extension to the width of the second operand
    SExt,
    /// Truncation to the width of the second operand
    Trunc,
}

impl Operator {
    /// Creates an [`Operator`] from its mnemonic.
    pub fn from_str(s: &str) -> Option<Self> {
        Operator::iter().find(|op| op.to_str() == s)
    }

    /// Creates an [`Operator`] from its code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Returns the operator code.
    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Number of operands popped from the evaluation stack.
    pub fn arity(&self) -> usize {
        match self {
            Operator::BitNot | Operator::Neg | Operator::Not => 1,
            _ => 2,
        }
    }

    /// Returns the mnemonic of the [`Operator`].
    pub fn to_str(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::UDiv => "udiv",
            Operator::SDiv => "sdiv",
            Operator::URem => "urem",
            Operator::SRem => "srem",
            Operator::BitAnd => "band",
            Operator::BitOr => "bor",
            Operator::BitXor => "bxor",
            Operator::BitNot => "bnot",
            Operator::Shl => "shl",
            Operator::LShr => "lshr",
            Operator::AShr => "ashr",
            Operator::Neg => "neg",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Ult => "ult",
            Operator::Ule => "ule",
            Operator::Ugt => "ugt",
            Operator::Uge => "uge",
            Operator::Slt => "slt",
            Operator::Sle => "sle",
            Operator::Sgt => "sgt",
            Operator::Sge => "sge",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Implies => "implies",
            Operator::ZExt => "zext",
            Operator::SExt => "sext",
            Operator::Trunc => "trunc",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

impl StructuralHash for Operator {
    #[inline]
    fn structural_hash(&self) -> u64 {
        self.code().structural_hash()
    }
}

impl StructuralEq for Operator {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// One element of a postfix formula.
///
/// Equality always compares the kind first: `BoolVal(1)` and `Constant(1)` are different
/// tokens even though they hash to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs, EnumTryAs)]
pub enum Token {
    /// Operator applied to the topmost values of the evaluation stack.
    Op(Operator),
    /// Boolean value; any non-zero payload is true.
    BoolVal(i32),
    /// Integer constant.
    Constant(i32),
    /// Reference to a symbolic value.
    Identifier(Ident),
}

impl Token {
    /// Boolean literal token.
    pub fn boolean(value: bool) -> Self {
        Token::BoolVal(value as i32)
    }

    /// Stack effect of this token: values popped, values pushed.
    pub fn stack_effect(&self) -> (usize, usize) {
        match self {
            Token::Op(op) => (op.arity(), 1),
            Token::BoolVal(_) | Token::Constant(_) | Token::Identifier(_) => (0, 1),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Op(op) => write!(f, "{}", op),
            Token::BoolVal(0) => f.write_str("false"),
            Token::BoolVal(_) => f.write_str("true"),
            Token::Constant(value) => write!(f, "{}", value),
            Token::Identifier(id) => write!(f, "{}", id),
        }
    }
}

impl StructuralHash for Token {
    fn structural_hash(&self) -> u64 {
        match self {
            Token::Op(op) => op.structural_hash(),
            // Booleans and constants share the integer path; equality tells them apart.
            Token::BoolVal(value) | Token::Constant(value) => value.structural_hash(),
            Token::Identifier(id) => id.structural_hash(),
        }
    }
}

impl StructuralEq for Token {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Op(op)
    }
}

impl From<Ident> for Token {
    fn from(id: Ident) -> Self {
        Token::Identifier(id)
    }
}
