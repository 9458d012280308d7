//! The player: health, wallet, arsenal and the glue between them.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::combat::{self, AttackOutcome, Detector, FirstAlive, Squad};
use crate::error::{ArmoryError, ArmoryResult};
use crate::inventory::Inventory;
use crate::item::{Weapon, WeaponType};
use crate::ledger::Ledger;
use crate::shop::{ItemFactory, Shop};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletReason {
    KillReward,
    Purchase,
}

/// Delivered to wallet observers after a committed balance change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WalletChange {
    pub reason: WalletReason,
    pub delta: i64,
    pub balance: i64,
}

/// Delivered to health observers after the player takes a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HealthChange {
    pub damage: i64,
    pub remaining: i64,
    pub dead: bool,
}

type WalletObserver = Box<dyn FnMut(&WalletChange)>;
type HealthObserver = Box<dyn FnMut(&HealthChange)>;

pub struct Player {
    health: Ledger,
    wallet: Ledger,
    arsenal: Inventory<Weapon>,
    current: usize,
    kill_reward: i64,
    wallet_observers: Vec<WalletObserver>,
    health_observers: Vec<HealthObserver>,
}

impl Player {
    pub fn new(
        start_health: i64,
        start_money: i64,
        kill_reward: i64,
        starting_weapon: Weapon,
    ) -> ArmoryResult<Self> {
        if kill_reward < 0 {
            return Err(ArmoryError::negative("kill_reward", kill_reward));
        }
        Ok(Self {
            health: Ledger::health(start_health)?,
            wallet: Ledger::wallet(start_money)?,
            arsenal: Inventory::from(vec![starting_weapon]),
            current: 0,
            kill_reward,
            wallet_observers: Vec::new(),
            health_observers: Vec::new(),
        })
    }

    pub fn health(&self) -> &Ledger {
        &self.health
    }

    pub fn wallet(&self) -> &Ledger {
        &self.wallet
    }

    pub fn money(&self) -> i64 {
        self.wallet.value()
    }

    pub fn kill_reward(&self) -> i64 {
        self.kill_reward
    }

    pub fn arsenal(&self) -> &Inventory<Weapon> {
        &self.arsenal
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_weapon(&self) -> ArmoryResult<&Weapon> {
        self.arsenal.get(self.current)
    }

    pub fn owns(&self, kind: WeaponType) -> bool {
        self.arsenal.iter().any(|w| w.kind() == kind)
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_empty()
    }

    /// Registers a wallet observer. Observers run in registration order,
    /// synchronously, after the balance change has been applied. Failed
    /// operations notify nobody.
    pub fn on_wallet_change(&mut self, observer: impl FnMut(&WalletChange) + 'static) {
        self.wallet_observers.push(Box::new(observer));
    }

    /// Registers a health observer, called in registration order after each
    /// hit lands. The lethal hit reports `dead: true`; hits on a dead player
    /// fail and notify nobody.
    pub fn on_health_change(&mut self, observer: impl FnMut(&HealthChange) + 'static) {
        self.health_observers.push(Box::new(observer));
    }

    /// Attacks the first living enemy with the current weapon.
    pub fn attack(&mut self, squad: &mut Squad) -> ArmoryResult<Option<AttackOutcome>> {
        self.attack_with(&mut FirstAlive, squad)
    }

    /// Attacks whatever `detector` picks. Returns `None` when there is no
    /// target; pays the kill reward when the hit is lethal.
    ///
    /// A lethal hit is refused up front if the reward could not be paid,
    /// so the target is never killed without the reward landing.
    pub fn attack_with(
        &mut self,
        detector: &mut impl Detector,
        squad: &mut Squad,
    ) -> ArmoryResult<Option<AttackOutcome>> {
        let Some(target) = detector.detect(squad) else {
            return Ok(None);
        };
        let weapon = self.arsenal.get(self.current)?;
        if !target.is_dead() && weapon.damage() >= target.health().value() {
            self.wallet.check_earn(self.kill_reward)?;
        }
        let outcome = combat::attack(weapon, target)?;
        if outcome.killed {
            let balance = self.wallet.earn(self.kill_reward)?;
            info!(target: "armory_core.player", reward = self.kill_reward, balance, "kill reward paid");
            self.notify(WalletChange {
                reason: WalletReason::KillReward,
                delta: self.kill_reward,
                balance,
            });
        }
        Ok(Some(outcome))
    }

    /// Buys `kind` from `shop` and stores it; returns its arsenal index.
    pub fn buy<F>(&mut self, shop: &mut Shop<F>, kind: WeaponType) -> ArmoryResult<usize>
    where
        F: ItemFactory<Item = Weapon>,
    {
        let before = self.wallet.value();
        let weapon = shop.buy(kind, &mut self.wallet)?;
        let index = self.arsenal.put(weapon);
        let balance = self.wallet.value();
        self.notify(WalletChange {
            reason: WalletReason::Purchase,
            delta: balance - before,
            balance,
        });
        Ok(index)
    }

    pub fn next_weapon(&mut self) -> &Weapon {
        self.current = (self.current + 1) % self.arsenal.len();
        &self.arsenal.as_slice()[self.current]
    }

    pub fn previous_weapon(&mut self) -> &Weapon {
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.arsenal.len() - 1);
        &self.arsenal.as_slice()[self.current]
    }

    pub fn select_weapon(&mut self, index: usize) -> ArmoryResult<&Weapon> {
        self.arsenal.get(index)?;
        self.current = index;
        self.arsenal.get(index)
    }

    pub fn take_damage(&mut self, amount: i64) -> ArmoryResult<i64> {
        let remaining = self.health.spend(amount)?;
        let change = HealthChange {
            damage: amount,
            remaining,
            dead: remaining == 0,
        };
        for observer in &mut self.health_observers {
            observer(&change);
        }
        Ok(remaining)
    }

    fn notify(&mut self, change: WalletChange) {
        for observer in &mut self.wallet_observers {
            observer(&change);
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("health", &self.health)
            .field("wallet", &self.wallet)
            .field("arsenal", &self.arsenal)
            .field("current", &self.current)
            .field("kill_reward", &self.kill_reward)
            .field("wallet_observers", &self.wallet_observers.len())
            .field("health_observers", &self.health_observers.len())
            .finish()
    }
}
