use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::encounter::{EncounterEvent, EncounterOutcome};
use crate::item::WeaponType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterReport {
    pub id: String,
    pub timestamp: String,
    pub seed: u64,
    pub summary: EncounterSummary,
    pub events: Vec<EncounterEvent>,
}

impl EncounterReport {
    pub fn new(
        id: impl Into<String>,
        seed: u64,
        summary: EncounterSummary,
        events: Vec<EncounterEvent>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now().to_rfc3339(),
            seed,
            summary,
            events,
        }
    }
}

/// `outcome` is `None` while the encounter is still undecided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub outcome: Option<EncounterOutcome>,
    pub turns: u32,
    pub kills: u32,
    pub money: i64,
    pub health: i64,
    pub arsenal: Vec<WeaponType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let summary = EncounterSummary {
            outcome: Some(EncounterOutcome::Victory),
            turns: 2,
            kills: 1,
            money: 10,
            health: 45,
            arsenal: vec![WeaponType::Sword],
        };
        let events = vec![EncounterEvent::Reward {
            turn: 2,
            amount: 10,
            balance: 10,
        }];
        let report = EncounterReport::new("run-1", 42, summary.clone(), events.clone());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!("victory", json["summary"]["outcome"]);
        assert_eq!("reward", json["events"][0]["event"]);

        let back: EncounterReport = serde_json::from_value(json).unwrap();
        assert_eq!(summary, back.summary);
        assert_eq!(events, back.events);
    }
}
