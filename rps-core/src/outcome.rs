use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rps_types::{Choice, Outcome};
use std::collections::VecDeque;
use tracing::warn;

use crate::rules::RuleTable;

pub struct OutcomeResolver;

impl OutcomeResolver {
    /// Decide a round. Pure: the same three inputs always give the same verdict.
    ///
    /// A pair the table does not decide either way resolves as a tie and logs a
    /// warning instead of failing the round.
    pub fn resolve(player: Choice, computer: Choice, table: &RuleTable) -> Outcome {
        if player == computer {
            return Outcome::Tie;
        }

        if table.beats(player, computer) {
            return Outcome::PlayerWins;
        }

        if table.beats(computer, player) {
            return Outcome::ComputerWins;
        }

        warn!(
            "Rule table '{}' does not decide {} vs {}; scoring the round as a tie",
            table.mode(),
            player,
            computer
        );
        Outcome::Tie
    }
}

/// Source of the computer's move.
pub trait OpponentStrategy: Send {
    /// Pick one of `choices`, or `None` if there is nothing to pick from.
    fn pick(&mut self, choices: &[Choice]) -> Option<Choice>;
}

/// Uniform random opponent: one draw over every valid choice.
#[derive(Debug, Clone)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    /// Seeded from the OS's random data source.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl OpponentStrategy for RandomOpponent {
    fn pick(&mut self, choices: &[Choice]) -> Option<Choice> {
        choices.choose(&mut self.rng).copied()
    }
}

/// Replays a fixed list of moves, then falls back to the first valid choice.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOpponent {
    moves: VecDeque<Choice>,
}

impl ScriptedOpponent {
    pub fn new(moves: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }
}

impl OpponentStrategy for ScriptedOpponent {
    fn pick(&mut self, choices: &[Choice]) -> Option<Choice> {
        match self.moves.pop_front() {
            Some(choice) if choices.contains(&choice) => Some(choice),
            Some(choice) => {
                warn!("Scripted opponent move '{}' is not in play; skipping it", choice);
                choices.first().copied()
            }
            None => choices.first().copied(),
        }
    }
}
