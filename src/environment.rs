//! A game-playing environment in the style of reinforcement learning libraries:
//! `reset` for a fresh game, and `step` to act and get a reward back.

use std::sync::Arc;

use board_game_traits::Color;
use log::trace;

use crate::config::GameConfig;
use crate::error::{Result, TakError};
use crate::position::{Action, Board, EndReason, GameState, RoadCache};
use crate::scoring::{Scorer, ScoringRules};

/// Details about how a game ended
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StepInfo {
    pub reason: EndReason,
    pub winner: Option<Color>,
    pub white_road: bool,
    pub black_road: bool,
    pub white_stones_left: u8,
    pub white_caps_left: u8,
    pub black_stones_left: u8,
    pub black_caps_left: u8,
}

/// What an action led to
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StepResult {
    /// Score of the finished game for the side that acted, 0 if the game goes on
    pub reward: f32,
    pub done: bool,
    /// Only present when the game is over
    pub info: Option<StepInfo>,
}

/// Creates games and plays actions in them, scoring finished games with the configured rules.
///
/// All games from one environment share its road cache.
#[derive(Clone)]
pub struct TakEnvironment {
    config: GameConfig,
    scorer: Arc<dyn Scorer + Send + Sync>,
    roads: Arc<RoadCache>,
    empty_board: Board,
}

impl TakEnvironment {
    pub fn new(config: GameConfig) -> Result<Self> {
        let scorer = Arc::new(config.scoring_rules());
        Self::with_scorer(config, scorer)
    }

    /// Score games with a custom scorer instead of one of the named rulesets
    pub fn with_scorer(
        config: GameConfig,
        scorer: Arc<dyn Scorer + Send + Sync>,
    ) -> Result<Self> {
        let empty_board = Board::new(config.size())?;
        let roads = Arc::new(RoadCache::with_capacity(config.cache_capacity()));
        Ok(TakEnvironment {
            config,
            scorer,
            roads,
            empty_board,
        })
    }

    /// An environment with the standard settings for a board size
    pub fn with_size(size: usize) -> Result<Self> {
        Self::new(GameConfig::new(size)?)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board_size(&self) -> usize {
        self.config.size()
    }

    pub fn scoring_rules(&self) -> ScoringRules {
        self.config.scoring_rules()
    }

    pub fn road_cache(&self) -> &Arc<RoadCache> {
        &self.roads
    }

    /// Forget all memoized road searches
    pub fn clear_road_cache(&self) {
        self.roads.clear()
    }

    /// The starting position: an empty board and full reserves
    pub fn reset(&self) -> GameState {
        let board = self.empty_board.clone();
        let stones = self.config.starting_stones();
        let caps = self.config.starting_capstones();
        GameState::new(board, self.config.starting_player(), Arc::clone(&self.roads))
            .with_reserves(Color::White, stones, caps)
            .with_reserves(Color::Black, stones, caps)
    }

    pub fn possible_actions(&self, state: &GameState) -> Vec<Action> {
        state.possible_actions()
    }

    /// Play a valid action on a copy of `state`
    pub fn step(&self, state: &GameState, action: &Action) -> Result<(GameState, StepResult)> {
        let mut next = state.clone();
        let result = self.step_in_place(&mut next, action)?;
        Ok((next, result))
    }

    /// Play a valid action directly on `state`. Invalid actions are rejected and leave it untouched.
    pub fn step_in_place(&self, state: &mut GameState, action: &Action) -> Result<StepResult> {
        if state.is_terminal() {
            return Err(TakError::InvalidAction(format!(
                "{} after the game is over\n{:?}",
                action, state
            )));
        }
        if !state.is_valid(action) {
            return Err(TakError::InvalidAction(format!(
                "{} in position\n{:?}",
                action, state
            )));
        }
        state.apply_in_place(action)?;

        match state.outcome() {
            None => Ok(StepResult {
                reward: 0.0,
                done: false,
                info: None,
            }),
            Some(outcome) => {
                trace!(
                    "Game over after {}: {:?}, winner {:?}",
                    action,
                    outcome.reason,
                    outcome.winner
                );
                let info = StepInfo {
                    reason: outcome.reason,
                    winner: outcome.winner,
                    white_road: outcome.white_road,
                    black_road: outcome.black_road,
                    white_stones_left: state.stones_left(Color::White),
                    white_caps_left: state.caps_left(Color::White),
                    black_stones_left: state.stones_left(Color::Black),
                    black_caps_left: state.caps_left(Color::Black),
                };
                Ok(StepResult {
                    reward: self.terminal_reward(state),
                    done: true,
                    info: Some(info),
                })
            }
        }
    }

    /// Score `side` in `state`, given the winner
    pub fn compute_score(&self, state: &GameState, side: Color, winner: Option<Color>) -> f32 {
        self.scorer
            .score(state, side, winner, self.config.is_discounted())
    }

    /// The score of a finished game for the side that just moved. 0 if the game isn't over.
    pub fn terminal_reward(&self, state: &GameState) -> f32 {
        match state.outcome() {
            Some(outcome) => self.compute_score(state, state.last_mover(), outcome.winner),
            None => 0.0,
        }
    }

    /// The size of the score of a finished game, with losses always discounted.
    /// 0 if the game isn't over.
    pub fn terminal_magnitude(&self, state: &GameState) -> f32 {
        match state.outcome() {
            Some(outcome) => self
                .scorer
                .score(state, state.last_mover(), outcome.winner, true)
                .abs(),
            None => 0.0,
        }
    }
}
