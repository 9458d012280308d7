//! Damage resolution between weapons and combatants.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ArmoryError, ArmoryResult};
use crate::item::Weapon;
use crate::ledger::Ledger;

/// Anything with health that can be hit. `damage` is what it deals back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    name: String,
    health: Ledger,
    damage: i64,
}

impl Combatant {
    pub fn new(name: impl Into<String>, start_health: i64, damage: i64) -> ArmoryResult<Self> {
        if damage < 0 {
            return Err(ArmoryError::negative("damage", damage));
        }
        Ok(Self {
            name: name.into(),
            health: Ledger::health(start_health)?,
            damage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> &Ledger {
        &self.health
    }

    pub fn damage(&self) -> i64 {
        self.damage
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_empty()
    }

    /// Fails with `InvalidState` when already dead.
    pub fn take_damage(&mut self, amount: i64) -> ArmoryResult<i64> {
        self.health.spend(amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttackOutcome {
    pub target: String,
    pub damage: i64,
    pub remaining: i64,
    pub killed: bool,
}

/// Hits `target` with `weapon`. Attacking a dead target is an error, not a no-op.
pub fn attack(weapon: &Weapon, target: &mut Combatant) -> ArmoryResult<AttackOutcome> {
    let remaining = weapon.strike(&mut target.health)?;
    let killed = target.is_dead();
    if killed {
        info!(target: "armory_core.combat", enemy = %target.name, weapon = %weapon.kind(), "kill confirmed");
    } else {
        debug!(target: "armory_core.combat", enemy = %target.name, remaining, "hit");
    }
    Ok(AttackOutcome {
        target: target.name.clone(),
        damage: weapon.damage(),
        remaining,
        killed,
    })
}

/// Ordered group of enemies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Squad {
    members: Vec<Combatant>,
}

impl Squad {
    pub fn new(members: Vec<Combatant>) -> Self {
        Self { members }
    }

    /// First member still alive. Dead members are never returned.
    pub fn first_alive(&mut self) -> Option<&mut Combatant> {
        self.members.iter_mut().find(|m| !m.is_dead())
    }

    /// Raw access, dead or alive.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.members.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Combatant> {
        self.members.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter().filter(|m| !m.is_dead())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn is_defeated(&self) -> bool {
        self.alive_count() == 0
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Picks the next target from a squad.
pub trait Detector {
    fn detect<'a>(&mut self, squad: &'a mut Squad) -> Option<&'a mut Combatant>;
}

/// Targets the first living member in squad order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstAlive;

impl Detector for FirstAlive {
    fn detect<'a>(&mut self, squad: &'a mut Squad) -> Option<&'a mut Combatant> {
        squad.first_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{WeaponTemplate, WeaponType};

    fn weapon(damage: i64) -> Weapon {
        Weapon::from_template(&WeaponTemplate::new(WeaponType::Rifle, damage).unwrap(), 7)
    }

    #[test]
    fn lethal_hit_reports_kill_and_second_hit_fails() {
        let rifle = weapon(100);
        let mut enemy = Combatant::new("grunt", 100, 0).unwrap();
        let outcome = attack(&rifle, &mut enemy).unwrap();
        assert!(outcome.killed);
        assert_eq!(0, outcome.remaining);
        assert!(enemy.is_dead());
        assert_eq!(
            Err(ArmoryError::InvalidState { operation: "spend" }),
            attack(&rifle, &mut enemy)
        );
    }

    #[test]
    fn negative_enemy_damage_is_rejected() {
        assert!(matches!(
            Combatant::new("imp", 10, -1),
            Err(ArmoryError::InvalidArgument { argument: "damage", .. })
        ));
    }

    #[test]
    fn partial_hit_is_not_a_kill() {
        let mut enemy = Combatant::new("brute", 150, 5).unwrap();
        let outcome = attack(&weapon(40), &mut enemy).unwrap();
        assert!(!outcome.killed);
        assert_eq!(110, outcome.remaining);
    }

    #[test]
    fn detector_skips_the_dead() {
        let mut squad = Squad::new(vec![
            Combatant::new("a", 10, 0).unwrap(),
            Combatant::new("b", 10, 0).unwrap(),
        ]);
        let rifle = weapon(10);
        let first = FirstAlive.detect(&mut squad).unwrap();
        attack(&rifle, first).unwrap();
        assert_eq!("b", FirstAlive.detect(&mut squad).unwrap().name());
        let second = FirstAlive.detect(&mut squad).unwrap();
        attack(&rifle, second).unwrap();
        assert!(FirstAlive.detect(&mut squad).is_none());
        assert!(squad.is_defeated());
    }

    #[test]
    fn raw_access_still_reaches_corpses() {
        let mut squad = Squad::new(vec![Combatant::new("a", 0, 0).unwrap()]);
        let corpse = squad.get_mut(0).unwrap();
        assert!(matches!(
            attack(&weapon(1), corpse),
            Err(ArmoryError::InvalidState { .. })
        ));
    }
}
