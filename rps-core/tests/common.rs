#![allow(dead_code)]

use rps_core::{RoundMachine, RoundTiming, RuleTable, ScoredRound, ScriptedOpponent};
use rps_types::{Choice, Player, PlayerStats};

/// Creates a persisted test player with zeroed stats
pub fn create_test_player(name: &str) -> Player {
    Player {
        id: Some(uuid::Uuid::new_v4()),
        ..Player::new(name, "🦊")
    }
}

/// Creates a persisted test player carrying existing stats
pub fn create_test_player_with_stats(name: &str, stats: PlayerStats) -> Player {
    Player {
        stats,
        ..create_test_player(name)
    }
}

/// Creates a machine whose opponent plays `moves` in order
pub fn create_scripted_machine(rules: RuleTable, moves: &[Choice]) -> RoundMachine {
    RoundMachine::new(
        rules,
        RoundTiming::instant(),
        Box::new(ScriptedOpponent::new(moves.iter().copied())),
    )
}

/// Runs one full round and returns the scored result
pub fn play_round(machine: &mut RoundMachine, choice: Choice) -> ScoredRound {
    let plan = machine.submit_choice(choice).expect("choice accepted");
    machine.reveal(plan.round_id).expect("reveal");
    let scored = machine.score(plan.round_id).expect("score");
    machine.finish(plan.round_id).expect("finish");
    scored
}
