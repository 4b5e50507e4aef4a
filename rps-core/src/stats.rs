use rps_types::{Choice, Outcome, PlayerStats, Side};
use serde::Serialize;

use crate::rules::RuleTable;

/// How many trailing moves the history display shows.
pub const RECENT_MOVES: usize = 5;

/// Display placeholder for an empty history.
pub const NO_DATA: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceSummary {
    pub most_frequent: Option<Choice>,
    pub display: String,
}

/// Derived, display-ready view of a player's stats for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    pub player_score: u32,
    pub computer_score: u32,
    pub total_rounds: u32,
    pub player_win_rate: u32,
    pub computer_win_rate: u32,
    pub player_most_used: String,
    pub computer_most_used: String,
    pub player_recent: String,
    pub computer_recent: String,
}

pub struct StatsAggregator;

impl StatsAggregator {
    /// Fold one resolved round into the cumulative record.
    pub fn record_round(
        stats: &mut PlayerStats,
        player: Choice,
        computer: Choice,
        outcome: Outcome,
    ) {
        stats.player_history.push(player);
        stats.computer_history.push(computer);
        stats.total_rounds += 1;

        if let Some(winner) = outcome.winner() {
            Self::award(stats, winner);
        }
    }

    /// Score and win counters always move together.
    fn award(stats: &mut PlayerStats, side: Side) {
        match side {
            Side::Player => {
                stats.player_score += 1;
                stats.player_wins += 1;
            }
            Side::Computer => {
                stats.computer_score += 1;
                stats.computer_wins += 1;
            }
        }
    }

    /// Most frequent choice in `history`.
    ///
    /// When several choices share the highest count, the one that appears first
    /// in the history wins the tie.
    pub fn summarize(history: &[Choice], table: &RuleTable) -> ChoiceSummary {
        let mut counts: Vec<(Choice, usize)> = Vec::new();
        for choice in history {
            match counts.iter_mut().find(|(seen, _)| seen == choice) {
                Some((_, count)) => *count += 1,
                None => counts.push((*choice, 1)),
            }
        }

        let mut best: Option<(Choice, usize)> = None;
        for (choice, count) in counts {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((choice, count));
            }
        }

        match best {
            Some((choice, _)) => {
                let display = match table.definition(choice) {
                    Some(definition) => format!("{} {}", definition.symbol, definition.name),
                    None => choice.to_string(),
                };
                ChoiceSummary {
                    most_frequent: Some(choice),
                    display,
                }
            }
            None => ChoiceSummary {
                most_frequent: None,
                display: NO_DATA.to_string(),
            },
        }
    }

    /// Percentage of rounds won, rounded half-up to an integer; 0 with no rounds.
    /// Counters that claim more wins than rounds are capped at 100.
    pub fn win_rate(wins: u32, total_rounds: u32) -> u32 {
        if total_rounds == 0 {
            return 0;
        }
        let wins = u64::from(wins.min(total_rounds));
        let total = u64::from(total_rounds);
        u32::try_from((wins * 200 + total) / (total * 2)).unwrap_or(100)
    }

    /// Symbols of the last few moves, oldest first.
    pub fn recent_display(history: &[Choice], table: &RuleTable) -> String {
        let start = history.len().saturating_sub(RECENT_MOVES);
        history[start..]
            .iter()
            .map(|choice| table.symbol(*choice))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn scoreboard(stats: &PlayerStats, table: &RuleTable) -> ScoreBoard {
        ScoreBoard {
            player_score: stats.player_score,
            computer_score: stats.computer_score,
            total_rounds: stats.total_rounds,
            player_win_rate: Self::win_rate(stats.player_wins, stats.total_rounds),
            computer_win_rate: Self::win_rate(stats.computer_wins, stats.total_rounds),
            player_most_used: Self::summarize(&stats.player_history, table).display,
            computer_most_used: Self::summarize(&stats.computer_history, table).display,
            player_recent: Self::recent_display(&stats.player_history, table),
            computer_recent: Self::recent_display(&stats.computer_history, table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_counts() {
        let mut stats = PlayerStats::default();
        let rounds = [
            (Choice::Rock, Choice::Scissors, Outcome::PlayerWins),
            (Choice::Paper, Choice::Paper, Outcome::Tie),
            (Choice::Rock, Choice::Paper, Outcome::ComputerWins),
            (Choice::Scissors, Choice::Paper, Outcome::PlayerWins),
        ];

        for (n, (player, computer, outcome)) in rounds.into_iter().enumerate() {
            StatsAggregator::record_round(&mut stats, player, computer, outcome);
            assert_eq!(stats.total_rounds as usize, n + 1);
            assert!(stats.is_consistent());
        }

        assert_eq!(stats.player_wins, 2);
        assert_eq!(stats.player_score, 2);
        assert_eq!(stats.computer_wins, 1);
        assert_eq!(stats.computer_score, 1);
        assert_eq!(stats.ties(), 1);
        assert_eq!(stats.player_history[1], Choice::Paper);
    }

    #[test]
    fn test_tie_leaves_counters_alone() {
        let mut stats = PlayerStats {
            player_score: 3,
            player_wins: 3,
            computer_score: 1,
            computer_wins: 1,
            player_history: vec![Choice::Rock; 4],
            computer_history: vec![Choice::Scissors; 4],
            total_rounds: 4,
        };

        StatsAggregator::record_round(&mut stats, Choice::Paper, Choice::Paper, Outcome::Tie);

        assert_eq!(
            (stats.player_score, stats.player_wins, stats.computer_score, stats.computer_wins),
            (3, 3, 1, 1)
        );
        assert_eq!(stats.total_rounds, 5);
    }

    #[test]
    fn test_win_rate_rounds_half_up() {
        assert_eq!(StatsAggregator::win_rate(0, 0), 0);
        assert_eq!(StatsAggregator::win_rate(1, 3), 33);
        assert_eq!(StatsAggregator::win_rate(2, 3), 67);
        assert_eq!(StatsAggregator::win_rate(1, 8), 13); // 12.5 rounds up
        assert_eq!(StatsAggregator::win_rate(5, 5), 100);
    }

    #[test]
    fn test_win_rate_caps_impossible_counters() {
        assert_eq!(StatsAggregator::win_rate(7, 5), 100);
        assert_eq!(StatsAggregator::win_rate(u32::MAX, 1), 100);
    }

    #[test]
    fn test_summarize_breaks_ties_by_first_seen() {
        let table = RuleTable::classic();
        let history = [Choice::Paper, Choice::Rock, Choice::Rock, Choice::Paper];

        let summary = StatsAggregator::summarize(&history, &table);
        assert_eq!(summary.most_frequent, Some(Choice::Paper));
        assert_eq!(summary.display, "✋ Paper");

        let history = [Choice::Paper, Choice::Rock, Choice::Rock];
        let summary = StatsAggregator::summarize(&history, &table);
        assert_eq!(summary.most_frequent, Some(Choice::Rock));
    }

    #[test]
    fn test_summarize_empty_history() {
        let summary = StatsAggregator::summarize(&[], &RuleTable::classic());
        assert_eq!(summary.most_frequent, None);
        assert_eq!(summary.display, NO_DATA);
    }

    #[test]
    fn test_recent_display_keeps_last_five() {
        let table = RuleTable::classic();
        let history = [
            Choice::Scissors,
            Choice::Rock,
            Choice::Rock,
            Choice::Paper,
            Choice::Rock,
            Choice::Paper,
        ];

        assert_eq!(
            StatsAggregator::recent_display(&history, &table),
            "✊ ✊ ✋ ✊ ✋"
        );
        assert_eq!(StatsAggregator::recent_display(&[], &table), "");
    }

    #[test]
    fn test_scoreboard_for_fresh_stats() {
        let board = StatsAggregator::scoreboard(&PlayerStats::default(), &RuleTable::classic());

        assert_eq!(board.player_win_rate, 0);
        assert_eq!(board.computer_win_rate, 0);
        assert_eq!(board.player_most_used, NO_DATA);
        assert_eq!(board.computer_recent, "");
    }
}
