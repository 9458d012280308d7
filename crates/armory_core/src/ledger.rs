//! Non-negative counters backing both health and money.

use tracing::{debug, warn};

use crate::error::{ArmoryError, ArmoryResult};

/// A guarded, non-negative integer counter.
///
/// Health is a capped ledger whose cap is its starting value; a wallet is
/// uncapped. The value only changes through [`Ledger::spend`] and
/// [`Ledger::earn`].
///
/// Once a ledger reaches zero it is empty for good as far as `spend` is
/// concerned: the hit that takes it to zero succeeds (clamped), any later
/// `spend` fails with [`ArmoryError::InvalidState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    value: i64,
    cap: Option<i64>,
}

impl Ledger {
    pub fn new(start: i64, cap: Option<i64>) -> ArmoryResult<Self> {
        if start < 0 {
            return Err(ArmoryError::negative("start", start));
        }
        if let Some(cap) = cap {
            if start > cap {
                return Err(ArmoryError::InvalidArgument {
                    argument: "start",
                    reason: format!("{start} exceeds cap {cap}"),
                });
            }
        }
        Ok(Self { value: start, cap })
    }

    /// Health-style ledger, capped at its starting value.
    pub fn health(start: i64) -> ArmoryResult<Self> {
        Self::new(start, Some(start))
    }

    /// Wallet-style ledger with no upper bound.
    pub fn wallet(start: i64) -> ArmoryResult<Self> {
        Self::new(start, None)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn cap(&self) -> Option<i64> {
        self.cap
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    pub fn can_spend(&self, amount: i64) -> ArmoryResult<bool> {
        if amount < 0 {
            return Err(ArmoryError::negative("amount", amount));
        }
        Ok(self.value >= amount)
    }

    /// Decreases the value by `amount`, flooring at zero. Returns the new value.
    pub fn spend(&mut self, amount: i64) -> ArmoryResult<i64> {
        if amount < 0 {
            return Err(ArmoryError::negative("amount", amount));
        }
        if self.is_empty() {
            warn!(target: "armory_core.ledger", amount, "spend on empty ledger");
            return Err(ArmoryError::InvalidState { operation: "spend" });
        }
        self.value = (self.value - amount).max(0);
        debug!(target: "armory_core.ledger", amount, value = self.value, "ledger spent");
        Ok(self.value)
    }

    /// Validates an `earn` without applying it. Returns the unclamped sum.
    pub fn check_earn(&self, amount: i64) -> ArmoryResult<i64> {
        if amount < 0 {
            return Err(ArmoryError::negative("amount", amount));
        }
        self.value.checked_add(amount).ok_or(ArmoryError::Overflow {
            value: self.value,
            amount,
        })
    }

    /// Increases the value by `amount`. Capped ledgers clamp at their cap and
    /// refuse to come back from empty. Returns the new value.
    pub fn earn(&mut self, amount: i64) -> ArmoryResult<i64> {
        let raised = self.check_earn(amount)?;
        self.value = match self.cap {
            Some(_) if self.is_empty() => {
                warn!(target: "armory_core.ledger", amount, "earn on empty capped ledger");
                return Err(ArmoryError::InvalidState { operation: "restore" });
            }
            Some(cap) => raised.min(cap),
            None => raised,
        };
        debug!(target: "armory_core.ledger", amount, value = self.value, "ledger earned");
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_spend_leaves_remainder() {
        let mut hp = Ledger::health(100).unwrap();
        assert_eq!(70, hp.spend(30).unwrap());
        assert!(!hp.is_empty());
    }

    #[test]
    fn overkill_clamps_to_zero() {
        let mut hp = Ledger::health(30).unwrap();
        assert_eq!(0, hp.spend(50).unwrap());
        assert!(hp.is_empty());
    }

    #[test]
    fn spend_on_empty_fails_regardless_of_amount() {
        let mut hp = Ledger::health(0).unwrap();
        for amount in [0, 1, 1_000] {
            assert_eq!(
                Err(ArmoryError::InvalidState { operation: "spend" }),
                hp.spend(amount)
            );
        }
    }

    #[test]
    fn exact_spend_for_every_amount_up_to_value() {
        for amount in 0..=12 {
            let mut wallet = Ledger::wallet(12).unwrap();
            assert_eq!(12 - amount, wallet.spend(amount).unwrap());
        }
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut wallet = Ledger::wallet(10).unwrap();
        assert!(matches!(wallet.spend(-1), Err(ArmoryError::InvalidArgument { .. })));
        assert!(matches!(wallet.earn(-5), Err(ArmoryError::InvalidArgument { .. })));
        assert!(matches!(wallet.can_spend(-2), Err(ArmoryError::InvalidArgument { .. })));
        assert_eq!(10, wallet.value());
    }

    #[test]
    fn can_spend_compares_against_balance() {
        let wallet = Ledger::wallet(40).unwrap();
        assert!(wallet.can_spend(40).unwrap());
        assert!(!wallet.can_spend(41).unwrap());
    }

    #[test]
    fn wallet_is_uncapped_but_checks_overflow() {
        let mut wallet = Ledger::wallet(0).unwrap();
        assert_eq!(1_000_000, wallet.earn(1_000_000).unwrap());
        let mut rich = Ledger::wallet(i64::MAX).unwrap();
        assert!(matches!(rich.earn(1), Err(ArmoryError::Overflow { .. })));
        assert_eq!(i64::MAX, rich.value());
    }

    #[test]
    fn check_earn_does_not_mutate() {
        let wallet = Ledger::wallet(i64::MAX - 1).unwrap();
        assert_eq!(i64::MAX, wallet.check_earn(1).unwrap());
        assert!(matches!(wallet.check_earn(2), Err(ArmoryError::Overflow { .. })));
        assert!(matches!(wallet.check_earn(-1), Err(ArmoryError::InvalidArgument { .. })));
        assert_eq!(i64::MAX - 1, wallet.value());
    }

    #[test]
    fn health_restores_up_to_cap_but_never_resurrects() {
        let mut hp = Ledger::health(50).unwrap();
        hp.spend(20).unwrap();
        assert_eq!(50, hp.earn(100).unwrap());
        hp.spend(60).unwrap();
        assert_eq!(
            Err(ArmoryError::InvalidState { operation: "restore" }),
            hp.earn(10)
        );
    }

    #[test]
    fn construction_validates_start() {
        assert!(Ledger::wallet(-1).is_err());
        assert!(Ledger::new(11, Some(10)).is_err());
        assert_eq!(Some(10), Ledger::health(10).unwrap().cap());
    }
}
