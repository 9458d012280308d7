use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{self, Context, Result};
use serde::{Deserialize, Serialize};

use crate::combat::{Combatant, Squad};
use crate::encounter::{Encounter, EncounterParams};
use crate::error::ArmoryResult;
use crate::item::{WeaponTemplate, WeaponType};
use crate::player::Player;
use crate::price_list::PriceList;
use crate::shop::{ItemFactory, Shop, WeaponFactory};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArmoryConfig {
    pub player: PlayerConfig,
    #[serde(default)]
    pub weapons: Vec<WeaponConfig>,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub encounter: Option<EncounterConfig>,
}

impl ArmoryConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let cfg: ArmoryConfig = toml::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let player = &self.player;
        for (label, value) in [
            ("player.start_health", player.start_health),
            ("player.start_money", player.start_money),
            ("player.kill_reward", player.kill_reward),
        ] {
            anyhow::ensure!(value >= 0, "{label} must not be negative, got {value}");
        }

        let mut seen = BTreeSet::new();
        for weapon in &self.weapons {
            anyhow::ensure!(seen.insert(weapon.kind), "weapon {} listed twice", weapon.kind);
            anyhow::ensure!(weapon.damage >= 0, "weapon {} has negative damage", weapon.kind);
            anyhow::ensure!(weapon.price >= 0, "weapon {} has negative price", weapon.kind);
        }
        if !seen.contains(&player.starting_weapon) {
            anyhow::bail!(
                "starting weapon {} has no [[weapons]] entry",
                player.starting_weapon
            );
        }

        for enemy in &self.enemies {
            anyhow::ensure!(enemy.health >= 0, "enemy {} has negative health", enemy.name);
            anyhow::ensure!(enemy.damage >= 0, "enemy {} has negative damage", enemy.name);
        }
        Ok(())
    }

    pub fn price_list(&self) -> ArmoryResult<PriceList> {
        PriceList::new(self.weapons.iter().map(|w| (w.kind, w.price)))
    }

    pub fn weapon_factory(&self) -> ArmoryResult<WeaponFactory> {
        let templates = self
            .weapons
            .iter()
            .map(|w| WeaponTemplate::new(w.kind, w.damage))
            .collect::<ArmoryResult<Vec<_>>>()?;
        Ok(WeaponFactory::new(templates))
    }

    /// Builds the player, drawing the starting weapon from `factory`.
    pub fn player(&self, factory: &mut WeaponFactory) -> ArmoryResult<Player> {
        let cfg = &self.player;
        let weapon = factory.create(cfg.starting_weapon)?;
        Player::new(cfg.start_health, cfg.start_money, cfg.kill_reward, weapon)
    }

    pub fn squad(&self) -> ArmoryResult<Squad> {
        let members = self
            .enemies
            .iter()
            .map(|e| Combatant::new(e.name.clone(), e.health, e.damage))
            .collect::<ArmoryResult<Vec<_>>>()?;
        Ok(Squad::new(members))
    }

    /// Encounter parameters: configured values, then environment overrides.
    pub fn encounter_params(&self) -> EncounterParams {
        self.encounter_params_with(|key| std::env::var(key).ok())
    }

    /// [`ArmoryConfig::encounter_params`] with overrides resolved through `lookup`.
    pub fn encounter_params_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> EncounterParams {
        let mut base = EncounterParams::default();
        if let Some(cfg) = &self.encounter {
            base.seed = cfg.seed.unwrap_or(base.seed);
            base.max_turns = cfg.max_turns.unwrap_or(base.max_turns);
        }
        EncounterParams::from_lookup(base, lookup)
    }

    pub fn shop(&self) -> ArmoryResult<Shop<WeaponFactory>> {
        Ok(Shop::new(self.weapon_factory()?, self.price_list()?))
    }

    pub fn encounter(&self, params: EncounterParams) -> ArmoryResult<Encounter> {
        let mut factory = self.weapon_factory()?;
        let player = self.player(&mut factory)?;
        let shop = Shop::new(factory, self.price_list()?);
        Ok(Encounter::new(player, self.squad()?, shop, params))
    }
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        let weapon = |kind, damage, price| WeaponConfig {
            kind,
            damage,
            price,
        };
        let enemy = |name: &str, health, damage| EnemyConfig {
            name: name.to_owned(),
            health,
            damage,
        };
        Self {
            player: PlayerConfig {
                start_health: 200,
                start_money: 0,
                kill_reward: DEFAULT_KILL_REWARD,
                starting_weapon: WeaponType::Sword,
            },
            weapons: vec![
                weapon(WeaponType::Sword, 25, 20),
                weapon(WeaponType::Bow, 35, 40),
                weapon(WeaponType::Pistol, 50, 60),
                weapon(WeaponType::Rifle, 100, 120),
            ],
            enemies: vec![
                enemy("grunt", 60, 4),
                enemy("sentinel", 100, 6),
                enemy("brute", 150, 8),
            ],
            encounter: None,
        }
    }
}

pub const DEFAULT_KILL_REWARD: i64 = 50;

fn default_kill_reward() -> i64 {
    DEFAULT_KILL_REWARD
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    pub start_health: i64,
    #[serde(default)]
    pub start_money: i64,
    #[serde(default = "default_kill_reward")]
    pub kill_reward: i64,
    pub starting_weapon: WeaponType,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeaponConfig {
    pub kind: WeaponType,
    pub damage: i64,
    pub price: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnemyConfig {
    pub name: String,
    pub health: i64,
    #[serde(default)]
    pub damage: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EncounterConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_turns: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[player]
start_health = 80
start_money = 15
starting_weapon = "sword"

[[weapons]]
kind = "sword"
damage = 30
price = 10

[[weapons]]
kind = "rifle"
damage = 90
price = 75

[[enemies]]
name = "grunt"
health = 60
damage = 3

[encounter]
seed = 9
"#;

    #[test]
    fn parses_sample_and_builds_parts() {
        let cfg = ArmoryConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(DEFAULT_KILL_REWARD, cfg.player.kill_reward);
        assert_eq!(75, cfg.price_list().unwrap().get(WeaponType::Rifle).unwrap());
        let mut factory = cfg.weapon_factory().unwrap();
        let player = cfg.player(&mut factory).unwrap();
        assert_eq!(15, player.money());
        assert_eq!(80, player.health().value());
        assert_eq!(1, cfg.squad().unwrap().len());
        assert_eq!(Some(9), cfg.encounter.as_ref().and_then(|e| e.seed));
    }

    #[test]
    fn encounter_params_layer_defaults_config_then_env() {
        let cfg = ArmoryConfig::from_toml_str(SAMPLE).unwrap();
        let configured = cfg.encounter_params_with(|_| None);
        assert_eq!(9, configured.seed);
        assert_eq!(crate::encounter::DEFAULT_MAX_TURNS, configured.max_turns);

        let overridden = cfg.encounter_params_with(|key| {
            (key == "ARMORY_SEED").then(|| "1234".to_owned())
        });
        assert_eq!(1234, overridden.seed);
        assert_eq!(crate::encounter::DEFAULT_MAX_TURNS, overridden.max_turns);

        let unparsable = cfg.encounter_params_with(|_| Some("lots".to_owned()));
        assert_eq!(configured, unparsable);

        let stock = ArmoryConfig::default().encounter_params_with(|_| None);
        assert_eq!(EncounterParams::default(), stock);
    }

    #[test]
    fn starting_weapon_must_be_listed() {
        let broken = SAMPLE.replace("starting_weapon = \"sword\"", "starting_weapon = \"bow\"");
        let err = ArmoryConfig::from_toml_str(&broken).unwrap_err();
        assert!(err.to_string().contains("starting weapon bow"));
    }

    #[test]
    fn duplicate_weapons_are_rejected() {
        let broken = SAMPLE.replace("kind = \"rifle\"", "kind = \"sword\"");
        assert!(ArmoryConfig::from_toml_str(&broken).is_err());
    }

    #[test]
    fn unknown_weapon_kind_fails_to_parse() {
        let broken = SAMPLE.replace("kind = \"rifle\"", "kind = \"trebuchet\"");
        assert!(ArmoryConfig::from_toml_str(&broken).is_err());
    }

    #[test]
    fn example_file_parses() {
        let cfg = ArmoryConfig::from_toml_str(include_str!("../../../config/armory.example.toml"))
            .unwrap();
        assert_eq!(4, cfg.price_list().unwrap().len());
        assert_eq!(3, cfg.squad().unwrap().alive_count());
    }

    #[test]
    fn default_config_is_valid_and_prices_everything() {
        let cfg = ArmoryConfig::default();
        cfg.validate().unwrap();
        assert!(cfg.price_list().unwrap().covers(WeaponType::ALL));
    }
}
