//! Weapon kinds and the weapons the shop hands out.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArmoryError, ArmoryResult};
use crate::ledger::Ledger;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    Sword,
    Bow,
    Pistol,
    Rifle,
}

impl WeaponType {
    pub const ALL: [WeaponType; 4] = [
        WeaponType::Sword,
        WeaponType::Bow,
        WeaponType::Pistol,
        WeaponType::Rifle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Sword => "sword",
            WeaponType::Bow => "bow",
            WeaponType::Pistol => "pistol",
            WeaponType::Rifle => "rifle",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for WeaponType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeaponType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown weapon type `{s}`"))
    }
}

/// Blueprint a factory clones weapons from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponTemplate {
    pub kind: WeaponType,
    pub damage: i64,
}

impl WeaponTemplate {
    pub fn new(kind: WeaponType, damage: i64) -> ArmoryResult<Self> {
        if damage < 0 {
            return Err(ArmoryError::negative("damage", damage));
        }
        Ok(Self { kind, damage })
    }
}

/// A concrete weapon instance. `serial` is unique per factory, so two
/// purchases of the same kind never yield the same weapon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Weapon {
    serial: u64,
    kind: WeaponType,
    damage: i64,
}

impl Weapon {
    pub(crate) fn from_template(template: &WeaponTemplate, serial: u64) -> Self {
        Self {
            serial,
            kind: template.kind,
            damage: template.damage,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn kind(&self) -> WeaponType {
        self.kind
    }

    pub fn damage(&self) -> i64 {
        self.damage
    }

    /// Applies this weapon's fixed damage to `target`, returning what is left.
    pub fn strike(&self, target: &mut Ledger) -> ArmoryResult<i64> {
        target.spend(self.damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Ok(WeaponType::Rifle), "RIFLE".parse::<WeaponType>());
        assert!("trebuchet".parse::<WeaponType>().is_err());
    }

    #[test]
    fn template_rejects_negative_damage() {
        assert!(WeaponTemplate::new(WeaponType::Bow, -3).is_err());
    }

    #[test]
    fn strike_spends_target() {
        let sword = Weapon::from_template(&WeaponTemplate::new(WeaponType::Sword, 25).unwrap(), 1);
        let mut hp = Ledger::health(40).unwrap();
        assert_eq!(15, sword.strike(&mut hp).unwrap());
    }
}
