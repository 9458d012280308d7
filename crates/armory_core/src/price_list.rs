use std::collections::BTreeMap;

use crate::error::{ArmoryError, ArmoryResult};
use crate::item::WeaponType;

/// Immutable weapon-type to price mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceList {
    prices: BTreeMap<WeaponType, i64>,
}

impl PriceList {
    pub fn new(prices: impl IntoIterator<Item = (WeaponType, i64)>) -> ArmoryResult<Self> {
        let mut map = BTreeMap::new();
        for (kind, price) in prices {
            if price < 0 {
                return Err(ArmoryError::negative("price", price));
            }
            map.insert(kind, price);
        }
        Ok(Self { prices: map })
    }

    pub fn get(&self, kind: WeaponType) -> ArmoryResult<i64> {
        self.prices
            .get(&kind)
            .copied()
            .ok_or(ArmoryError::NotFound {
                registry: "price list",
                kind,
            })
    }

    /// True when every kind in `kinds` has a price.
    pub fn covers(&self, kinds: impl IntoIterator<Item = WeaponType>) -> bool {
        kinds.into_iter().all(|kind| self.prices.contains_key(&kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeaponType, i64)> + '_ {
        self.prices.iter().map(|(kind, price)| (*kind, *price))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_missing_kind() {
        let prices = PriceList::new([(WeaponType::Sword, 50)]).unwrap();
        assert_eq!(50, prices.get(WeaponType::Sword).unwrap());
        assert_eq!(
            Err(ArmoryError::NotFound {
                registry: "price list",
                kind: WeaponType::Bow
            }),
            prices.get(WeaponType::Bow)
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(matches!(
            PriceList::new([(WeaponType::Rifle, -1)]),
            Err(ArmoryError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn covers_and_ordered_iteration() {
        let prices = PriceList::new([(WeaponType::Rifle, 90), (WeaponType::Sword, 50)]).unwrap();
        assert!(prices.covers([WeaponType::Sword, WeaponType::Rifle]));
        assert!(!prices.covers(WeaponType::ALL));
        let kinds: Vec<_> = prices.iter().map(|(kind, _)| kind).collect();
        assert_eq!(vec![WeaponType::Sword, WeaponType::Rifle], kinds);
    }
}
