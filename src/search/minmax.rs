//! A very simple implementation of the minmax search algorithm, without pruning.
//!
//! All actions that share the best value are kept, and one of them is picked at random,
//! so that equally good actions are played equally often.

use board_game_traits::Color;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::position::{Action, GameState};
use crate::scoring::{Scorer, ScoringRules};
use crate::search::{Policy, Score};

/// Static evaluation of a position, from the point of view of the side that just moved
pub trait Evaluator {
    fn evaluate(&self, state: &GameState) -> Score;
}

impl<F: Fn(&GameState) -> Score> Evaluator for F {
    fn evaluate(&self, state: &GameState) -> Score {
        self(state)
    }
}

/// Scores finished games only: the size of the winner's score, positive if the side
/// that just moved won and negative if it lost. Draws and unfinished games are 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalScore {
    pub rules: ScoringRules,
}

impl Evaluator for TerminalScore {
    fn evaluate(&self, state: &GameState) -> Score {
        match state.winner() {
            Some(winner) => {
                let score = self.rules.score(state, winner, Some(winner), true).abs();
                if winner == state.last_mover() {
                    score
                } else {
                    -score
                }
            }
            None => 0.0,
        }
    }
}

/// Depth-limited minmax. A depth of 1 only looks at the positions right after each action.
pub struct MinMax<E = TerminalScore> {
    depth: u16,
    evaluator: E,
}

impl MinMax<TerminalScore> {
    pub fn new(depth: u16) -> Self {
        MinMax {
            depth: depth.max(1),
            evaluator: TerminalScore::default(),
        }
    }
}

impl<E: Evaluator> MinMax<E> {
    pub fn with_evaluator(depth: u16, evaluator: E) -> Self {
        MinMax {
            depth: depth.max(1),
            evaluator,
        }
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// The value of each action, from the point of view of the side to move
    pub fn evaluate_actions(&self, state: &GameState, actions: &[Action]) -> Vec<(Action, Score)> {
        let us = state.side_to_move();
        actions
            .iter()
            .filter_map(|action| {
                let child = state.apply_copy(action).ok()?;
                Some((action.clone(), self.minmax(&child, self.depth - 1, us)))
            })
            .collect()
    }

    /// Value of `state` for `root_player`, searching `depth` more plies.
    /// Terminality is checked on `state` itself, after the action leading to it was played.
    fn minmax(&self, state: &GameState, depth: u16, root_player: Color) -> Score {
        if depth == 0 || state.is_terminal() {
            let eval = self.evaluator.evaluate(state);
            return if state.last_mover() == root_player {
                eval
            } else {
                -eval
            };
        }
        let maximizing = state.side_to_move() == root_player;
        let child_evaluations = state.possible_actions().into_iter().filter_map(|action| {
            let child = state.apply_copy(&action).ok()?;
            Some(self.minmax(&child, depth - 1, root_player))
        });
        if maximizing {
            child_evaluations.fold(Score::NEG_INFINITY, Score::max)
        } else {
            child_evaluations.fold(Score::INFINITY, Score::min)
        }
    }
}

impl<E: Evaluator> Policy for MinMax<E> {
    fn select_action<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        let evaluations = self.evaluate_actions(state, actions);
        let best_score = evaluations
            .iter()
            .map(|(_, score)| *score)
            .fold(Score::NEG_INFINITY, Score::max);
        let best_actions: Vec<&Action> = evaluations
            .iter()
            .filter(|(_, score)| *score == best_score)
            .map(|(action, _)| action)
            .collect();
        debug!(
            "Minmax depth {}: {} of {} actions share the best score {}",
            self.depth,
            best_actions.len(),
            actions.len(),
            best_score
        );
        best_actions.choose(rng).map(|action| (*action).clone())
    }
}
