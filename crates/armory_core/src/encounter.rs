//! Deterministic turn driver tying player, squad and shop together.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::Squad;
use crate::error::ArmoryResult;
use crate::item::WeaponType;
use crate::player::Player;
use crate::report::{EncounterReport, EncounterSummary};
use crate::shop::{Shop, WeaponFactory};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_TURNS: u32 = 64;
const BUY_CHANCE: u32 = 40;
const SWITCH_CHANCE: u32 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EncounterParams {
    pub seed: u64,
    pub max_turns: u32,
}

impl EncounterParams {
    /// Reads `ARMORY_SEED` and `ARMORY_MAX_TURNS`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_env_or(Self::default())
    }

    /// Like [`EncounterParams::from_env`] with `fallback` for unset variables.
    pub fn from_env_or(fallback: Self) -> Self {
        Self::from_lookup(fallback, |key| std::env::var(key).ok())
    }

    /// Resolves overrides through `lookup`; missing or unparsable values
    /// keep the fallback.
    pub fn from_lookup(fallback: Self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("ARMORY_SEED")
            .and_then(|val| val.parse().ok())
            .unwrap_or(fallback.seed);
        let max_turns = lookup("ARMORY_MAX_TURNS")
            .and_then(|val| val.parse().ok())
            .unwrap_or(fallback.max_turns);
        Self { seed, max_turns }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

impl Default for EncounterParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Attack,
    Buy(WeaponType),
    NextWeapon,
    PreviousWeapon,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EncounterEvent {
    Attack {
        turn: u32,
        weapon: WeaponType,
        target: String,
        damage: i64,
        remaining: i64,
        killed: bool,
    },
    Reward {
        turn: u32,
        amount: i64,
        balance: i64,
    },
    Purchase {
        turn: u32,
        kind: WeaponType,
        price: i64,
        balance: i64,
    },
    SwitchWeapon {
        turn: u32,
        weapon: WeaponType,
    },
    EnemyStrike {
        turn: u32,
        enemy: String,
        damage: i64,
        remaining: i64,
    },
    PlayerDown {
        turn: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    Stalemate,
}

pub struct Encounter {
    player: Player,
    squad: Squad,
    shop: Shop<WeaponFactory>,
    params: EncounterParams,
    rng: StdRng,
    turn: u32,
    kills: u32,
    events: Vec<EncounterEvent>,
}

impl Encounter {
    pub fn new(
        player: Player,
        squad: Squad,
        shop: Shop<WeaponFactory>,
        params: EncounterParams,
    ) -> Self {
        Self {
            player,
            squad,
            shop,
            params,
            rng: StdRng::seed_from_u64(params.seed),
            turn: 0,
            kills: 0,
            events: Vec::new(),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn squad(&self) -> &Squad {
        &self.squad
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn events(&self) -> &[EncounterEvent] {
        &self.events
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        if self.player.is_dead() {
            Some(EncounterOutcome::Defeat)
        } else if self.squad.is_defeated() {
            Some(EncounterOutcome::Victory)
        } else if self.turn >= self.params.max_turns {
            Some(EncounterOutcome::Stalemate)
        } else {
            None
        }
    }

    /// Applies one player action, then lets every living enemy strike back.
    /// A finished encounter ignores further actions. A rejected action
    /// consumes no turn.
    pub fn step(&mut self, action: Action) -> ArmoryResult<Option<EncounterOutcome>> {
        if let Some(outcome) = self.outcome() {
            return Ok(Some(outcome));
        }
        let turn = self.turn + 1;
        debug!(target: "armory_core.encounter", turn, ?action, "turn started");

        match action {
            Action::Attack => {
                let weapon = self.player.current_weapon()?.kind();
                if let Some(hit) = self.player.attack(&mut self.squad)? {
                    let killed = hit.killed;
                    self.events.push(EncounterEvent::Attack {
                        turn,
                        weapon,
                        target: hit.target,
                        damage: hit.damage,
                        remaining: hit.remaining,
                        killed,
                    });
                    if killed {
                        self.kills += 1;
                        self.events.push(EncounterEvent::Reward {
                            turn,
                            amount: self.player.kill_reward(),
                            balance: self.player.money(),
                        });
                    }
                }
            }
            Action::Buy(kind) => {
                let price = self.shop.price(kind)?;
                self.player.buy(&mut self.shop, kind)?;
                self.events.push(EncounterEvent::Purchase {
                    turn,
                    kind,
                    price,
                    balance: self.player.money(),
                });
            }
            Action::NextWeapon => {
                let weapon = self.player.next_weapon().kind();
                self.events.push(EncounterEvent::SwitchWeapon { turn, weapon });
            }
            Action::PreviousWeapon => {
                let weapon = self.player.previous_weapon().kind();
                self.events.push(EncounterEvent::SwitchWeapon { turn, weapon });
            }
        }

        self.turn = turn;
        self.retaliate()?;
        Ok(self.outcome())
    }

    /// Runs seeded turns until the encounter is decided.
    pub fn run(&mut self) -> ArmoryResult<EncounterOutcome> {
        loop {
            if let Some(outcome) = self.outcome() {
                info!(
                    target: "armory_core.encounter",
                    ?outcome,
                    turns = self.turn,
                    kills = self.kills,
                    money = self.player.money(),
                    "encounter finished"
                );
                return Ok(outcome);
            }
            let action = self.choose_action()?;
            self.step(action)?;
        }
    }

    pub fn report(&self, id: impl Into<String>) -> EncounterReport {
        let summary = EncounterSummary {
            outcome: self.outcome(),
            turns: self.turn,
            kills: self.kills,
            money: self.player.money(),
            health: self.player.health().value(),
            arsenal: self.player.arsenal().iter().map(|w| w.kind()).collect(),
        };
        EncounterReport::new(id, self.params.seed, summary, self.events.clone())
    }

    fn choose_action(&mut self) -> ArmoryResult<Action> {
        let mut affordable = Vec::new();
        for (kind, _) in self.shop.prices().iter() {
            if !self.player.owns(kind) && self.shop.can_buy(kind, self.player.wallet())? {
                affordable.push(kind);
            }
        }
        let roll = self.rng.gen_range(0..100);
        let action = if !affordable.is_empty() && roll < BUY_CHANCE {
            Action::Buy(affordable[self.rng.gen_range(0..affordable.len())])
        } else if self.player.arsenal().len() > 1 && roll < BUY_CHANCE + SWITCH_CHANCE {
            Action::NextWeapon
        } else {
            Action::Attack
        };
        Ok(action)
    }

    fn retaliate(&mut self) -> ArmoryResult<()> {
        let strikes: Vec<(String, i64)> = self
            .squad
            .alive()
            .filter(|enemy| enemy.damage() > 0)
            .map(|enemy| (enemy.name().to_owned(), enemy.damage()))
            .collect();
        for (enemy, damage) in strikes {
            if self.player.is_dead() {
                break;
            }
            let remaining = self.player.take_damage(damage)?;
            self.events.push(EncounterEvent::EnemyStrike {
                turn: self.turn,
                enemy,
                damage,
                remaining,
            });
            if remaining == 0 {
                info!(target: "armory_core.encounter", turn = self.turn, "player down");
                self.events.push(EncounterEvent::PlayerDown { turn: self.turn });
            }
        }
        Ok(())
    }
}
