//! Error taxonomy shared by every armory operation.

use thiserror::Error;

use crate::item::WeaponType;

/// Failures raised by ledgers, shops, inventories and combat.
///
/// Nothing in this crate retries or recovers; callers decide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArmoryError {
    /// A caller-supplied value was rejected (negative amount, unaffordable purchase).
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    /// The operation is not allowed in the ledger's current state.
    #[error("cannot {operation} an empty ledger")]
    InvalidState { operation: &'static str },

    /// Indexed lookup past the end of a collection.
    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    /// No price or template registered for the weapon type.
    #[error("no {registry} entry for {kind}")]
    NotFound {
        registry: &'static str,
        kind: WeaponType,
    },

    /// Earning would exceed the representable balance.
    #[error("ledger overflow: {value} + {amount}")]
    Overflow { value: i64, amount: i64 },
}

impl ArmoryError {
    pub(crate) fn negative(argument: &'static str, value: i64) -> Self {
        Self::InvalidArgument {
            argument,
            reason: format!("must not be negative, got {value}"),
        }
    }
}

pub type ArmoryResult<T> = Result<T, ArmoryError>;
