use rps_types::{Choice, GameMode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Display data and victories of a single choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceDefinition {
    pub name: String,
    pub symbol: String,
    pub beats: Vec<Choice>,
}

impl ChoiceDefinition {
    pub fn new(name: &str, symbol: &str, beats: &[Choice]) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            beats: beats.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleTableError {
    #[error("rule table has no choices")]
    Empty,
    #[error("choice '{0}' is defined more than once")]
    DuplicateChoice(Choice),
    #[error("choice '{0}' cannot beat itself")]
    SelfVictory(Choice),
    #[error("choice '{choice}' beats '{target}', which is not part of the table")]
    UnknownTarget { choice: Choice, target: Choice },
    #[error("'{a}' and '{b}' both beat each other")]
    MutualVictory { a: Choice, b: Choice },
}

/// The "beats" relation over the active choice set.
///
/// The relation may be non-transitive (in extended mode "well" beats both rock
/// and scissors) but is always irreflexive and never decides a pair both ways.
/// A table may still leave some pairs undecided; see [`RuleTable::is_complete`].
#[derive(Debug, Clone)]
pub struct RuleTable {
    mode: GameMode,
    order: Vec<Choice>,
    definitions: HashMap<Choice, ChoiceDefinition>,
}

impl RuleTable {
    /// Build and validate a table. Choices keep the order they are given in.
    pub fn new(
        mode: GameMode,
        definitions: Vec<(Choice, ChoiceDefinition)>,
    ) -> Result<Self, RuleTableError> {
        if definitions.is_empty() {
            return Err(RuleTableError::Empty);
        }

        let mut order = Vec::with_capacity(definitions.len());
        let mut map = HashMap::with_capacity(definitions.len());
        for (choice, definition) in definitions {
            if map.insert(choice, definition).is_some() {
                return Err(RuleTableError::DuplicateChoice(choice));
            }
            order.push(choice);
        }

        for choice in &order {
            for target in &map[choice].beats {
                if target == choice {
                    return Err(RuleTableError::SelfVictory(*choice));
                }
                let Some(target_definition) = map.get(target) else {
                    return Err(RuleTableError::UnknownTarget {
                        choice: *choice,
                        target: *target,
                    });
                };
                if target_definition.beats.contains(choice) {
                    return Err(RuleTableError::MutualVictory {
                        a: *choice,
                        b: *target,
                    });
                }
            }
        }

        let table = Self {
            mode,
            order,
            definitions: map,
        };

        if !table.is_complete() {
            warn!(
                "Rule table '{}' leaves some choice pairs undecided; they will resolve as ties",
                mode
            );
        }

        Ok(table)
    }

    /// Rock, paper, scissors.
    pub fn classic() -> Self {
        Self::builtin(GameMode::Classic)
    }

    /// Classic plus "well", which beats rock and scissors and is covered by paper.
    ///
    /// Paper over well is our own addition. The four-move variant this table
    /// follows never decides that pair, so earlier clients scored paper vs
    /// well as a tie. Deciding it keeps the table complete.
    pub fn extended() -> Self {
        Self::builtin(GameMode::Extended)
    }

    pub fn for_mode(mode: GameMode) -> Self {
        Self::builtin(mode)
    }

    fn builtin(mode: GameMode) -> Self {
        let choices: &[Choice] = match mode {
            GameMode::Classic => &[Choice::Rock, Choice::Paper, Choice::Scissors],
            GameMode::Extended => &[Choice::Rock, Choice::Paper, Choice::Scissors, Choice::Well],
        };

        let order = choices.to_vec();
        let definitions = choices
            .iter()
            .map(|choice| (*choice, builtin_definition(*choice, choices)))
            .collect();

        // Built-in tables are valid by construction, so skip `new`'s checks.
        Self {
            mode,
            order,
            definitions,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// True iff `a` defeats `b` under this table.
    pub fn beats(&self, a: Choice, b: Choice) -> bool {
        self.definitions
            .get(&a)
            .is_some_and(|definition| definition.beats.contains(&b))
    }

    pub fn all_choices(&self) -> &[Choice] {
        &self.order
    }

    pub fn contains(&self, choice: Choice) -> bool {
        self.definitions.contains_key(&choice)
    }

    pub fn definition(&self, choice: Choice) -> Option<&ChoiceDefinition> {
        self.definitions.get(&choice)
    }

    /// Symbol for a choice, or "?" when it is not part of this table.
    pub fn symbol(&self, choice: Choice) -> &str {
        self.definition(choice)
            .map(|definition| definition.symbol.as_str())
            .unwrap_or("?")
    }

    /// Every pair of distinct choices is decided one way or the other.
    pub fn is_complete(&self) -> bool {
        self.order.iter().enumerate().all(|(i, a)| {
            self.order[i + 1..]
                .iter()
                .all(|b| self.beats(*a, *b) || self.beats(*b, *a))
        })
    }

    /// Title listing the choice names, e.g. "Rock, Paper, Scissors".
    pub fn title(&self) -> String {
        self.order
            .iter()
            .filter_map(|choice| self.definition(*choice))
            .map(|definition| definition.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn builtin_definition(choice: Choice, in_play: &[Choice]) -> ChoiceDefinition {
    let (name, symbol, beats): (&str, &str, &[Choice]) = match choice {
        Choice::Rock => ("Rock", "✊", &[Choice::Scissors]),
        Choice::Paper => ("Paper", "✋", &[Choice::Rock, Choice::Well]),
        Choice::Scissors => ("Scissors", "✌️", &[Choice::Paper]),
        Choice::Well => ("Well", "⛲️", &[Choice::Rock, Choice::Scissors]),
    };
    let beats: Vec<Choice> = beats.iter().copied().filter(|c| in_play.contains(c)).collect();
    ChoiceDefinition::new(name, symbol, &beats)
}
