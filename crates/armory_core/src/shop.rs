//! Purchase transactions: price check, item creation, wallet debit.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::error::{ArmoryError, ArmoryResult};
use crate::item::{Weapon, WeaponTemplate, WeaponType};
use crate::ledger::Ledger;
use crate::price_list::PriceList;

/// Produces a fresh item for a weapon type.
pub trait ItemFactory {
    type Item;

    fn create(&mut self, kind: WeaponType) -> ArmoryResult<Self::Item>;
}

/// Clones weapons from registered templates, stamping each with a new serial.
#[derive(Clone, Debug)]
pub struct WeaponFactory {
    templates: BTreeMap<WeaponType, WeaponTemplate>,
    next_serial: u64,
}

impl WeaponFactory {
    pub fn new(templates: impl IntoIterator<Item = WeaponTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.kind, t)).collect(),
            next_serial: 1,
        }
    }

    pub fn contains(&self, kind: WeaponType) -> bool {
        self.templates.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = WeaponType> + '_ {
        self.templates.keys().copied()
    }
}

impl Default for WeaponFactory {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl ItemFactory for WeaponFactory {
    type Item = Weapon;

    fn create(&mut self, kind: WeaponType) -> ArmoryResult<Weapon> {
        let template = self.templates.get(&kind).ok_or(ArmoryError::NotFound {
            registry: "weapon factory",
            kind,
        })?;
        let weapon = Weapon::from_template(template, self.next_serial);
        self.next_serial += 1;
        Ok(weapon)
    }
}

pub struct Shop<F> {
    factory: F,
    prices: PriceList,
}

impl<F: ItemFactory> Shop<F> {
    pub fn new(factory: F, prices: PriceList) -> Self {
        Self { factory, prices }
    }

    pub fn price(&self, kind: WeaponType) -> ArmoryResult<i64> {
        self.prices.get(kind)
    }

    pub fn prices(&self) -> &PriceList {
        &self.prices
    }

    pub fn can_buy(&self, kind: WeaponType, wallet: &Ledger) -> ArmoryResult<bool> {
        wallet.can_spend(self.prices.get(kind)?)
    }

    /// Sells one `kind` to the owner of `wallet`.
    ///
    /// The item is created before the wallet is touched; if the factory
    /// fails the balance is unchanged. Free items are not debited.
    pub fn buy(&mut self, kind: WeaponType, wallet: &mut Ledger) -> ArmoryResult<F::Item> {
        let price = self.prices.get(kind)?;
        if !wallet.can_spend(price)? {
            warn!(target: "armory_core.shop", %kind, price, balance = wallet.value(), "purchase refused");
            return Err(ArmoryError::InvalidArgument {
                argument: "wallet",
                reason: format!("balance {} cannot cover {kind} at {price}", wallet.value()),
            });
        }
        let item = self.factory.create(kind)?;
        if price > 0 {
            wallet.spend(price)?;
        }
        info!(target: "armory_core.shop", %kind, price, balance = wallet.value(), "purchase completed");
        Ok(item)
    }
}
