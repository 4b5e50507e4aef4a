use rps_types::{Choice, Outcome, Player, PlayerId, PlayerStats, Side};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{CoreConfig, RoundTiming};
use crate::game_events::{AnimationCue, CountdownTick, RevealedChoice, TimedCue};
use crate::outcome::{OpponentStrategy, OutcomeResolver};
use crate::rules::RuleTable;
use crate::stats::{ScoreBoard, StatsAggregator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundPhase {
    Disabled, // no active player (or the player record is being reloaded)
    Idle,
    Countdown,
    Revealing,
    Animating,
    Scoring,
}

impl RoundPhase {
    pub fn is_round_in_flight(&self) -> bool {
        matches!(
            self,
            RoundPhase::Countdown | RoundPhase::Revealing | RoundPhase::Animating | RoundPhase::Scoring
        )
    }
}

/// Why a user intent was ignored. None of these are faults: callers treat a
/// rejection as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputRejected {
    #[error("no player is loaded")]
    NoPlayer,
    #[error("a round is already in flight ({0:?})")]
    RoundInFlight(RoundPhase),
    #[error("choice '{0}' is not part of the active rule table")]
    ChoiceNotInPlay(Choice),
    #[error("the active rule table offers no choices")]
    NoChoices,
    #[error("the player has not been persisted yet")]
    PlayerNotPersisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("expected phase {expected:?}, machine is in {actual:?}")]
    UnexpectedPhase {
        expected: RoundPhase,
        actual: RoundPhase,
    },
    #[error("round {0} is not the pending round")]
    NoPendingRound(u64),
    #[error("no player is loaded")]
    NoPlayer,
}

#[derive(Debug, Clone, Copy)]
struct PendingRound {
    id: u64,
    player_choice: Choice,
    computer_choice: Choice,
    outcome: Outcome,
}

/// What an accepted choice set in motion. The outcome is already decided; the
/// countdown is presentation only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPlan {
    /// Ticket for `reveal`, `score` and `finish`; unique per machine.
    pub round_id: u64,
    pub round: u32,
    pub player_choice: Choice,
    pub outcome: Outcome,
    pub countdown: Vec<CountdownTick>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    pub player: RevealedChoice,
    pub computer: RevealedChoice,
    pub cues: Vec<TimedCue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRound {
    pub player_id: Option<PlayerId>,
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub outcome: Outcome,
    pub stats: PlayerStats,
    pub scoreboard: ScoreBoard,
}

/// Drives one round at a time from input through countdown, reveal, animation
/// and scoring back to idle.
///
/// The machine owns the current player. It never waits itself: every step is a
/// method call, and the host decides when to make the next one.
pub struct RoundMachine {
    rules: RuleTable,
    timing: RoundTiming,
    opponent: Box<dyn OpponentStrategy>,
    phase: RoundPhase,
    player: Option<Player>,
    opponent_history: Vec<Choice>,
    pending: Option<PendingRound>,
    next_round_id: u64,
    scoreboard: ScoreBoard,
}

impl RoundMachine {
    pub fn new(rules: RuleTable, timing: RoundTiming, opponent: Box<dyn OpponentStrategy>) -> Self {
        Self {
            rules,
            timing,
            opponent,
            phase: RoundPhase::Disabled,
            player: None,
            opponent_history: Vec::new(),
            pending: None,
            next_round_id: 1,
            scoreboard: ScoreBoard::default(),
        }
    }

    pub fn from_config(config: &CoreConfig, opponent: Box<dyn OpponentStrategy>) -> Self {
        Self::new(
            RuleTable::for_mode(config.mode),
            config.timing.clone(),
            opponent,
        )
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn timing(&self) -> &RoundTiming {
        &self.timing
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    /// Computer moves seen during this session, oldest first.
    pub fn opponent_history(&self) -> &[Choice] {
        &self.opponent_history
    }

    /// Swap the whole rule table. Refused while a round is in flight.
    pub fn set_rules(&mut self, rules: RuleTable) -> Result<(), InputRejected> {
        if self.phase.is_round_in_flight() {
            return Err(InputRejected::RoundInFlight(self.phase));
        }
        info!("Switching rule table to '{}'", rules.mode());
        self.rules = rules;
        self.refresh_scoreboard();
        Ok(())
    }

    /// Make `player` the active player. Refused while a round is in flight:
    /// an accepted round always finishes for the player who started it.
    pub fn load_player(&mut self, player: Player) -> Result<(), InputRejected> {
        if self.phase.is_round_in_flight() {
            return Err(InputRejected::RoundInFlight(self.phase));
        }
        self.install_player(player);
        Ok(())
    }

    fn install_player(&mut self, player: Player) {
        self.pending = None;
        info!("Loaded player '{}' ({:?})", player.name, player.id);
        self.player = Some(player);
        self.phase = RoundPhase::Idle;
        self.refresh_scoreboard();
    }

    pub fn unload_player(&mut self) -> Option<Player> {
        self.pending = None;
        self.phase = RoundPhase::Disabled;
        self.scoreboard = ScoreBoard::default();
        self.player.take()
    }

    /// Accept the player's move: draw the opponent, resolve, start the countdown.
    pub fn submit_choice(&mut self, choice: Choice) -> Result<RoundPlan, InputRejected> {
        let Some(player) = self.player.as_ref() else {
            return Err(InputRejected::NoPlayer);
        };
        if self.phase != RoundPhase::Idle {
            return Err(InputRejected::RoundInFlight(self.phase));
        }
        if !self.rules.contains(choice) {
            return Err(InputRejected::ChoiceNotInPlay(choice));
        }

        let round = player.stats.total_rounds + 1;
        let computer_choice = self
            .opponent
            .pick(self.rules.all_choices())
            .ok_or(InputRejected::NoChoices)?;
        let outcome = OutcomeResolver::resolve(choice, computer_choice, &self.rules);

        let round_id = self.next_round_id;
        self.next_round_id += 1;

        self.opponent_history.push(computer_choice);
        self.pending = Some(PendingRound {
            id: round_id,
            player_choice: choice,
            computer_choice,
            outcome,
        });
        self.phase = RoundPhase::Countdown;

        debug!(
            "Round {} accepted: {} vs {} -> {:?}",
            round, choice, computer_choice, outcome
        );

        Ok(RoundPlan {
            round_id,
            round,
            player_choice: choice,
            outcome,
            countdown: countdown_ticks(&self.timing),
        })
    }

    /// End of the countdown: reveal both moves and hand back the cue list.
    /// Passes through `Revealing` and lands in `Animating`.
    pub fn reveal(&mut self, round_id: u64) -> Result<Reveal, RoundError> {
        self.expect_phase(RoundPhase::Countdown)?;
        let pending = self.pending_round(round_id)?;

        self.phase = RoundPhase::Revealing;
        let player = self.revealed(Side::Player, pending.player_choice);
        let computer = self.revealed(Side::Computer, pending.computer_choice);
        let cues = animation_cues(pending.outcome, &self.timing);
        self.phase = RoundPhase::Animating;

        Ok(Reveal {
            player,
            computer,
            cues,
        })
    }

    /// Animation done: fold the round into the player's stats.
    pub fn score(&mut self, round_id: u64) -> Result<ScoredRound, RoundError> {
        self.expect_phase(RoundPhase::Animating)?;
        let pending = self.pending_round(round_id)?;
        let player = self.player.as_mut().ok_or(RoundError::NoPlayer)?;

        self.phase = RoundPhase::Scoring;
        StatsAggregator::record_round(
            &mut player.stats,
            pending.player_choice,
            pending.computer_choice,
            pending.outcome,
        );
        let player_id = player.id;
        let stats = player.stats.clone();
        self.refresh_scoreboard();

        info!(
            "Round {} scored for {:?}: {:?}",
            stats.total_rounds, player_id, pending.outcome
        );

        Ok(ScoredRound {
            player_id,
            player_choice: pending.player_choice,
            computer_choice: pending.computer_choice,
            outcome: pending.outcome,
            stats,
            scoreboard: self.scoreboard.clone(),
        })
    }

    /// Leave `Scoring` and accept input again.
    pub fn finish(&mut self, round_id: u64) -> Result<(), RoundError> {
        self.expect_phase(RoundPhase::Scoring)?;
        self.pending_round(round_id)?;
        self.pending = None;
        self.phase = self.resting_phase();
        Ok(())
    }

    /// Drop whatever round is pending and return to rest.
    pub fn abandon_round(&mut self) {
        if self.pending.take().is_some() {
            debug!("Abandoned round in phase {:?}", self.phase);
        }
        self.phase = self.resting_phase();
    }

    /// Start a stats reset. Only allowed from `Idle` with a persisted player;
    /// input stays disabled until the reset completes or is cancelled.
    pub fn begin_reset(&mut self) -> Result<PlayerId, InputRejected> {
        let Some(player) = self.player.as_ref() else {
            return Err(InputRejected::NoPlayer);
        };
        if self.phase != RoundPhase::Idle {
            return Err(InputRejected::RoundInFlight(self.phase));
        }
        let id = player.id.ok_or(InputRejected::PlayerNotPersisted)?;
        self.phase = RoundPhase::Disabled;
        Ok(id)
    }

    /// Install the reloaded player record and forget the opponent moves seen so far.
    pub fn complete_reset(&mut self, player: Player) {
        self.opponent_history.clear();
        self.install_player(player);
    }

    pub fn cancel_reset(&mut self) {
        if self.phase == RoundPhase::Disabled {
            self.phase = self.resting_phase();
        }
    }

    fn resting_phase(&self) -> RoundPhase {
        if self.player.is_some() {
            RoundPhase::Idle
        } else {
            RoundPhase::Disabled
        }
    }

    fn pending_round(&self, round_id: u64) -> Result<PendingRound, RoundError> {
        self.pending
            .filter(|pending| pending.id == round_id)
            .ok_or(RoundError::NoPendingRound(round_id))
    }

    fn expect_phase(&self, expected: RoundPhase) -> Result<(), RoundError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RoundError::UnexpectedPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn revealed(&self, side: Side, choice: Choice) -> RevealedChoice {
        let (symbol, name) = match self.rules.definition(choice) {
            Some(definition) => (definition.symbol.clone(), definition.name.clone()),
            None => ("?".to_string(), choice.to_string()),
        };
        RevealedChoice {
            side,
            choice,
            symbol,
            name,
        }
    }

    fn refresh_scoreboard(&mut self) {
        self.scoreboard = match &self.player {
            Some(player) => StatsAggregator::scoreboard(&player.stats, &self.rules),
            None => ScoreBoard::default(),
        };
    }
}

/// "3", "2", "1", go text, then a blank once the go text has been held.
pub fn countdown_ticks(timing: &RoundTiming) -> Vec<CountdownTick> {
    let mut ticks: Vec<CountdownTick> = (1..=timing.countdown_from)
        .rev()
        .enumerate()
        .map(|(index, count)| CountdownTick {
            text: count.to_string(),
            delay_ms: if index == 0 { 0 } else { timing.countdown_tick_ms },
        })
        .collect();

    ticks.push(CountdownTick {
        text: timing.go_text.clone(),
        delay_ms: if ticks.is_empty() {
            0
        } else {
            timing.countdown_tick_ms
        },
    });
    ticks.push(CountdownTick {
        text: String::new(),
        delay_ms: timing.go_hold_ms,
    });
    ticks
}

/// Ordered cue list for an outcome; each delay is relative to the previous cue.
pub fn animation_cues(outcome: Outcome, timing: &RoundTiming) -> Vec<TimedCue> {
    let cue = |cue, delay_ms| TimedCue { cue, delay_ms };

    match (outcome.winner(), outcome.loser()) {
        (Some(winner), Some(loser)) => vec![
            cue(AnimationCue::ResetArena, timing.cue_initial_ms),
            cue(AnimationCue::ZoomArena, timing.cue_initial_ms),
            cue(AnimationCue::AdvanceMoves { winner }, timing.cue_show_moves_ms),
            cue(
                AnimationCue::VanishLoser { loser },
                timing.cue_vanish_ms.saturating_sub(timing.cue_show_moves_ms),
            ),
        ],
        _ => vec![
            cue(AnimationCue::ResetArena, timing.cue_initial_ms),
            cue(AnimationCue::Shake, timing.cue_show_moves_ms),
            cue(AnimationCue::StopShake, timing.shake_ms),
        ],
    }
}
