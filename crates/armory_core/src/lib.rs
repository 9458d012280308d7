//! Resource ledgers, weapon shop transactions and combat resolution for a
//! small attack/earn/buy gameplay loop. Engine concerns (input, rendering,
//! scene management) stay with the host; everything here is plain,
//! synchronous, single-owner state.

pub mod combat;
pub mod config;
pub mod encounter;
pub mod error;
pub mod inventory;
pub mod item;
pub mod ledger;
pub mod player;
pub mod price_list;
pub mod report;
pub mod shop;

pub use combat::{attack, AttackOutcome, Combatant, Detector, FirstAlive, Squad};
pub use config::{ArmoryConfig, EncounterConfig, EnemyConfig, PlayerConfig, WeaponConfig};
pub use encounter::{Action, Encounter, EncounterEvent, EncounterOutcome, EncounterParams};
pub use error::{ArmoryError, ArmoryResult};
pub use inventory::Inventory;
pub use item::{Weapon, WeaponTemplate, WeaponType};
pub use ledger::Ledger;
pub use player::{HealthChange, Player, WalletChange, WalletReason};
pub use price_list::PriceList;
pub use report::{EncounterReport, EncounterSummary};
pub use shop::{ItemFactory, Shop, WeaponFactory};
