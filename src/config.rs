use board_game_traits::Color;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TakError};
use crate::position::{
    starting_capstones, starting_stones, DEFAULT_ROAD_CACHE_CAPACITY, MAX_BOARD_SIZE,
    MIN_BOARD_SIZE,
};
use crate::scoring::ScoringRules;

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(remote = "Color")]
enum ColorDef {
    White,
    Black,
}

/// Settings for a series of games. Create with `GameConfig::new`, then adjust with the builder methods.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    size: usize,
    stones: u8,
    capstones: u8,
    #[cfg_attr(feature = "serde", serde(with = "ColorDef"))]
    first_player: Color,
    rules: ScoringRules,
    discount: bool,
    road_cache_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: 5,
            stones: starting_stones(5),
            capstones: starting_capstones(5),
            first_player: Color::White,
            rules: ScoringRules::Default,
            discount: true,
            road_cache_capacity: DEFAULT_ROAD_CACHE_CAPACITY,
        }
    }
}

impl GameConfig {
    /// Standard settings for `size`, which must be between 3 and 8
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(TakError::UnsupportedBoardSize(size));
        }
        Ok(GameConfig {
            size,
            stones: starting_stones(size),
            capstones: starting_capstones(size),
            ..GameConfig::default()
        })
    }

    /// Stones each side starts with
    pub fn stones(mut self, stones: u8) -> Self {
        self.stones = stones;
        self
    }

    pub fn capstones(mut self, capstones: u8) -> Self {
        self.capstones = capstones;
        self
    }

    pub fn first_player(mut self, first_player: Color) -> Self {
        self.first_player = first_player;
        self
    }

    pub fn rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    /// Whether the losing side's score is negative rather than 0. Defaults to true.
    pub fn discount(mut self, discount: bool) -> Self {
        self.discount = discount;
        self
    }

    pub fn road_cache_capacity(mut self, capacity: usize) -> Self {
        self.road_cache_capacity = capacity;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn starting_stones(&self) -> u8 {
        self.stones
    }

    pub fn starting_capstones(&self) -> u8 {
        self.capstones
    }

    pub fn starting_player(&self) -> Color {
        self.first_player
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        self.rules
    }

    pub fn is_discounted(&self) -> bool {
        self.discount
    }

    pub fn cache_capacity(&self) -> usize {
        self.road_cache_capacity
    }
}
