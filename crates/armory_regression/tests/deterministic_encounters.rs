use armory_core::{EncounterEvent, EncounterOutcome};
use armory_regression::{sampled_seeds, seeded_run, DEFAULT_SEED};

#[test]
fn seeded_runs_are_deterministic() {
    let baseline = seeded_run(DEFAULT_SEED).unwrap();
    let repeat = seeded_run(DEFAULT_SEED).unwrap();
    assert_eq!(baseline, repeat, "same seed should match");

    let traces: Vec<_> = sampled_seeds(DEFAULT_SEED, 8)
        .into_iter()
        .map(|seed| seeded_run(seed).unwrap().1)
        .collect();
    assert!(
        traces.iter().any(|trace| trace != &traces[0]),
        "different seeds should diverge"
    );
}

#[test]
fn kills_are_always_followed_by_rewards() {
    for seed in [DEFAULT_SEED, 7, 1234] {
        let (_, events) = seeded_run(seed).unwrap();
        for (idx, event) in events.iter().enumerate() {
            if let EncounterEvent::Attack { killed: true, turn, .. } = event {
                assert!(
                    matches!(events.get(idx + 1), Some(EncounterEvent::Reward { turn: t, .. }) if t == turn),
                    "seed {seed}: kill at event {idx} without reward"
                );
            }
        }
    }
}

#[test]
fn runs_terminate_with_a_consistent_outcome() {
    for seed in 0..16 {
        let (outcome, events) = seeded_run(seed).unwrap();
        let downed = events
            .iter()
            .any(|event| matches!(event, EncounterEvent::PlayerDown { .. }));
        assert_eq!(downed, outcome == EncounterOutcome::Defeat, "seed {seed}");
    }
}

#[test]
fn purchases_never_overdraw() {
    for seed in sampled_seeds(DEFAULT_SEED, 16) {
        let (_, events) = seeded_run(seed).unwrap();
        for event in events {
            if let EncounterEvent::Purchase { balance, .. } = event {
                assert!(balance >= 0, "seed {seed}");
            }
        }
    }
}
