use thiserror::Error;

use crate::formula::token::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A formula must produce exactly one value; an empty sequence produces none.
    #[error("The formula is empty. A well-formed postfix formula contains at least one token.")]
    EmptyFormula,

    /// An operator needs more operands than the evaluation stack holds.
    #[error(
        "Operator `{op}` at position {position} requires {arity} operand(s), but only {available} value(s) are available on the stack."
    )]
    StackUnderflow {
        position: usize,
        op: Operator,
        arity: usize,
        available: usize,
    },

    /// Evaluation leaves more than one value on the stack.
    #[error(
        "The formula leaves {remaining} values on the evaluation stack. A well-formed postfix formula reduces to exactly one value."
    )]
    UnbalancedFormula { remaining: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
