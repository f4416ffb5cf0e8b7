//! Epsilon-greedy tabular SARSA.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::environment::TakEnvironment;
use crate::error::{Result, TakError};
use crate::position::{Action, GameState};
use crate::search::random::{weighted_choice, winning_actions};
use crate::search::{Agent, Policy, Score};

/// Action values for every (state, action) pair seen so far, learned with
/// one-step SARSA updates. Unseen pairs have the initial value, 0 by default.
#[derive(Clone, Debug)]
pub struct Sarsa {
    q: HashMap<(GameState, Action), Score>,
    alpha: Score,
    gamma: Score,
    epsilon: f64,
    place_probability: f64,
    initial_q: Score,
}

impl Default for Sarsa {
    fn default() -> Self {
        Sarsa {
            q: HashMap::new(),
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            place_probability: 0.5,
            initial_q: 0.0,
        }
    }
}

impl Sarsa {
    pub fn new(alpha: Score, gamma: Score, epsilon: f64) -> Self {
        Sarsa {
            alpha,
            gamma,
            epsilon: epsilon.clamp(0.0, 1.0),
            ..Sarsa::default()
        }
    }

    /// Share of exploration picks that are placements rather than moves
    pub fn place_probability(mut self, place_probability: f64) -> Self {
        self.place_probability = place_probability.clamp(0.0, 1.0);
        self
    }

    pub fn initial_q(mut self, initial_q: Score) -> Self {
        self.initial_q = initial_q;
        self
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn q(&self, state: &GameState, action: &Action) -> Score {
        self.q
            .get(&(state.clone(), action.clone()))
            .copied()
            .unwrap_or(self.initial_q)
    }

    pub fn set_q(&mut self, state: &GameState, action: &Action, value: Score) {
        self.q.insert((state.clone(), action.clone()), value);
    }

    /// Number of (state, action) pairs with a learned value
    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// One-step update towards `reward + gamma * Q(next_state, next_action)`.
    /// Pass `None` as the next action when `next_state` ends the game.
    pub fn update(
        &mut self,
        state: &GameState,
        action: &Action,
        reward: Score,
        next_state: &GameState,
        next_action: Option<&Action>,
    ) {
        let next_q = next_action.map_or(0.0, |next_action| self.q(next_state, next_action));
        let current = self.q(state, action);
        let updated = current + self.alpha * (reward + self.gamma * next_q - current);
        self.set_q(state, action, updated);
    }

    fn explore<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        let winning = winning_actions(state, actions);
        if let Some(action) = winning.choose(rng) {
            return Some((*action).clone());
        }
        weighted_choice(actions, self.place_probability, rng)
    }

    fn exploit<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        let values: Vec<Score> = actions.iter().map(|action| self.q(state, action)).collect();
        let best = values.iter().copied().fold(Score::NEG_INFINITY, Score::max);
        let best_actions: Vec<&Action> = actions
            .iter()
            .zip(values)
            .filter(|(_, value)| *value == best)
            .map(|(action, _)| action)
            .collect();
        best_actions.choose(rng).map(|action| (*action).clone())
    }
}

impl Policy for Sarsa {
    fn select_action<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action> {
        if rng.gen_bool(self.epsilon) {
            self.explore(state, actions, rng)
        } else {
            self.exploit(state, actions, rng)
        }
    }
}

/// Plays with a `Sarsa` table and keeps learning from its own games.
///
/// Each decision updates the value of the previous decision, with a reward of 0.
/// When the game ends, the last decision is updated with the final score.
pub struct SarsaAgent {
    sarsa: Sarsa,
    rng: SmallRng,
    pending: Option<(GameState, Action)>,
}

impl SarsaAgent {
    pub fn new(sarsa: Sarsa, seed: u64) -> Self {
        SarsaAgent {
            sarsa,
            rng: SmallRng::seed_from_u64(seed),
            pending: None,
        }
    }

    pub fn sarsa(&self) -> &Sarsa {
        &self.sarsa
    }

    pub fn into_inner(self) -> Sarsa {
        self.sarsa
    }
}

impl Agent for SarsaAgent {
    fn select_action(&mut self, env: &TakEnvironment, state: &GameState) -> Result<Action> {
        let actions = env.possible_actions(state);
        let action = self
            .sarsa
            .select_action(state, &actions, &mut self.rng)
            .ok_or(TakError::NoLegalActions)?;
        if let Some((previous_state, previous_action)) = self.pending.take() {
            self.sarsa
                .update(&previous_state, &previous_action, 0.0, state, Some(&action));
        }
        self.pending = Some((state.clone(), action.clone()));
        Ok(action)
    }

    fn observe(
        &mut self,
        env: &TakEnvironment,
        _state: &GameState,
        _action: &Action,
        next: &GameState,
    ) {
        if let Some(outcome) = next.outcome() {
            if let Some((previous_state, previous_action)) = self.pending.take() {
                let us = previous_state.side_to_move();
                let reward = env.compute_score(next, us, outcome.winner);
                self.sarsa
                    .update(&previous_state, &previous_action, reward, next, None);
            }
        }
    }
}
