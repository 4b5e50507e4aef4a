use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// One discrete move in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
    Well,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
            Choice::Well => "well",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown choice '{0}'")]
pub struct UnknownChoice(pub String);

impl FromStr for Choice {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Ok(Choice::Rock),
            "paper" => Ok(Choice::Paper),
            "scissors" => Ok(Choice::Scissors),
            "well" => Ok(Choice::Well),
            _ => Err(UnknownChoice(s.to_string())),
        }
    }
}

/// Named rule set selecting which choices are in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum GameMode {
    #[default]
    Classic, // rock, paper, scissors
    Extended, // adds well
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Extended => "extended",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode '{0}' (expected 'classic' or 'extended')")]
pub struct UnknownGameMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownGameMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "extended" => Ok(GameMode::Extended),
            _ => Err(UnknownGameMode(s.to_string())),
        }
    }
}

/// Verdict of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Outcome {
    Tie,
    PlayerWins,
    ComputerWins,
}

impl Outcome {
    /// The side that took the round, if any.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Tie => None,
            Outcome::PlayerWins => Some(Side::Player),
            Outcome::ComputerWins => Some(Side::Computer),
        }
    }

    pub fn loser(&self) -> Option<Side> {
        self.winner().map(|side| side.opponent())
    }

    pub fn is_decisive(&self) -> bool {
        !matches!(self, Outcome::Tie)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_parsing_is_case_insensitive() {
        assert_eq!("Rock".parse::<Choice>().unwrap(), Choice::Rock);
        assert_eq!(" scissors ".parse::<Choice>().unwrap(), Choice::Scissors);
        assert_eq!("WELL".parse::<Choice>().unwrap(), Choice::Well);
        assert!("lizard".parse::<Choice>().is_err());
    }

    #[test]
    fn test_choice_wire_format() {
        let json = serde_json::to_string(&vec![Choice::Rock, Choice::Well]).unwrap();
        assert_eq!(json, r#"["rock","well"]"#);
    }

    #[test]
    fn test_outcome_sides() {
        assert_eq!(Outcome::PlayerWins.winner(), Some(Side::Player));
        assert_eq!(Outcome::PlayerWins.loser(), Some(Side::Computer));
        assert_eq!(Outcome::ComputerWins.winner(), Some(Side::Computer));
        assert_eq!(Outcome::Tie.winner(), None);
        assert!(!Outcome::Tie.is_decisive());
        assert_eq!(
            serde_json::to_string(&Outcome::ComputerWins).unwrap(),
            r#""computerWins""#
        );
    }

    #[test]
    fn test_game_mode_parsing() {
        assert_eq!("extended".parse::<GameMode>().unwrap(), GameMode::Extended);
        assert_eq!("Classic".parse::<GameMode>().unwrap(), GameMode::Classic);
        assert!("turbo".parse::<GameMode>().is_err());
    }
}
