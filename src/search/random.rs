//! Random play, optionally biased between placements and stack moves.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::position::{Action, GameState};
use crate::search::Policy;

/// Picks a random legal action.
///
/// With a place probability set, a placement is picked with that probability and a
/// stack move otherwise, uniformly within each group. Early in the game there are
/// far more placements than moves, so this keeps random games from being all placements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomPolicy {
    place_probability: Option<f64>,
    take_win: bool,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        RandomPolicy::weighted(0.5)
    }
}

impl RandomPolicy {
    /// Every legal action is equally likely
    pub fn uniform() -> Self {
        RandomPolicy {
            place_probability: None,
            take_win: false,
        }
    }

    pub fn weighted(place_probability: f64) -> Self {
        RandomPolicy {
            place_probability: Some(place_probability.clamp(0.0, 1.0)),
            take_win: false,
        }
    }

    /// Always pick an immediately winning action, if there is one
    pub fn take_win(mut self) -> Self {
        self.take_win = true;
        self
    }

    pub fn place_probability(&self) -> Option<f64> {
        self.place_probability
    }
}

impl Policy for RandomPolicy {
    fn select_action<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        if self.take_win {
            let winning = winning_actions(state, actions);
            if let Some(action) = winning.choose(rng) {
                return Some((*action).clone());
            }
        }
        match self.place_probability {
            Some(place_probability) => weighted_choice(actions, place_probability, rng),
            None => actions.choose(rng).cloned(),
        }
    }
}

/// The actions that win the game on the spot for the side to move
pub fn winning_actions<'a>(state: &GameState, actions: &'a [Action]) -> Vec<&'a Action> {
    let us = state.side_to_move();
    actions
        .iter()
        .filter(|action| {
            state
                .apply_copy(action)
                .map_or(false, |next| next.winner() == Some(us))
        })
        .collect()
}

/// Pick a placement with probability `place_probability` and a move otherwise,
/// uniformly within the chosen group. If one group is empty, picks from the other.
pub fn weighted_choice<R: Rng + ?Sized>(
    actions: &[Action],
    place_probability: f64,
    rng: &mut R,
) -> Option<Action> {
    let (places, moves): (Vec<&Action>, Vec<&Action>) =
        actions.iter().partition(|action| action.is_place());
    let group = match (places.is_empty(), moves.is_empty()) {
        (true, true) => return None,
        (false, true) => places,
        (true, false) => moves,
        (false, false) => {
            if rng.gen_bool(place_probability.clamp(0.0, 1.0)) {
                places
            } else {
                moves
            }
        }
    };
    group.choose(rng).map(|action| (*action).clone())
}
