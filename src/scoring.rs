//! Scoring of finished games.
//!
//! Every ruleset starts from the same base score, the board area plus the evaluated
//! side's remaining stones, and multiplies it for particular kinds of wins.

use std::fmt;

use board_game_traits::Color;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::{GameState, RoadRule};

/// Computes a score for `side` in a finished game won by `winner`.
///
/// The winner gets a positive score. A side that didn't win gets the negated
/// base score if `discount` is set, and 0 otherwise.
pub trait Scorer {
    fn score(&self, state: &GameState, side: Color, winner: Option<Color>, discount: bool) -> f32;
}

/// The scoring rulesets, selected by name
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScoringRules {
    #[default]
    Default,
    /// Double score for a straight road
    Downings,
    /// Double score for winning with a capstone still in reserve
    Middletown,
    /// Double score for a road of single pieces, triple for any other road
    Tarway,
}

impl ScoringRules {
    pub const ALL: [ScoringRules; 4] = [
        ScoringRules::Default,
        ScoringRules::Downings,
        ScoringRules::Middletown,
        ScoringRules::Tarway,
    ];

    /// Look up a ruleset by its lower-case name. Unknown names give the default rules.
    pub fn from_name(name: &str) -> Self {
        ScoringRules::ALL
            .into_iter()
            .find(|rules| rules.name() == name)
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            ScoringRules::Default => "default",
            ScoringRules::Downings => "downings",
            ScoringRules::Middletown => "middletown",
            ScoringRules::Tarway => "tarway",
        }
    }

    fn multiplier(self, state: &GameState, side: Color) -> f32 {
        match self {
            ScoringRules::Default => 1.0,
            ScoringRules::Downings if state.has_road(side, RoadRule::Straight) => 2.0,
            ScoringRules::Downings => 1.0,
            ScoringRules::Middletown if state.has_cap_available(side) => 2.0,
            ScoringRules::Middletown => 1.0,
            ScoringRules::Tarway if state.has_road(side, RoadRule::Low) => 2.0,
            ScoringRules::Tarway if state.has_road(side, RoadRule::High) => 3.0,
            ScoringRules::Tarway => 1.0,
        }
    }
}

impl fmt::Display for ScoringRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn base_score(state: &GameState, side: Color) -> f32 {
    let size = state.size();
    (size * size) as f32 + state.stones_left(side) as f32
}

impl Scorer for ScoringRules {
    fn score(&self, state: &GameState, side: Color, winner: Option<Color>, discount: bool) -> f32 {
        let base = base_score(state, side);
        if winner == Some(side) {
            base * self.multiplier(state, side)
        } else if discount {
            -base
        } else {
            0.0
        }
    }
}
