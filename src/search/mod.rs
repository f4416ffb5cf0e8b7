//! Agents that choose actions: random play, SARSA, minimax, and Monte Carlo tree search.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::environment::TakEnvironment;
use crate::error::{Result, TakError};
use crate::position::{Action, GameState};

pub(crate) mod arena;
pub mod graph;
pub mod mcts;
pub mod minmax;
pub mod random;
pub mod sarsa;

pub use graph::{NodeId, StatsGraph};
pub use mcts::{MctsAgent, MctsSetting};
pub use minmax::{Evaluator, MinMax, TerminalScore};
pub use random::RandomPolicy;
pub use sarsa::{Sarsa, SarsaAgent};

pub type Score = f32;

/// A stateless rule for picking one of the legal actions in a position.
///
/// `actions` must be the legal actions of `state`. Returns `None` only if it is empty.
pub trait Policy {
    fn select_action<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        actions: &[Action],
        rng: &mut R,
    ) -> Option<Action>;
}

/// A player that can be asked for an action in any position of its game
pub trait Agent {
    fn select_action(&mut self, env: &TakEnvironment, state: &GameState) -> Result<Action>;

    /// Called after any action is played, by either side
    fn observe(
        &mut self,
        _env: &TakEnvironment,
        _state: &GameState,
        _action: &Action,
        _next: &GameState,
    ) {
    }
}

/// Plays a `Policy`, with its own random number generator
pub struct PolicyAgent<P> {
    policy: P,
    rng: SmallRng,
}

impl<P: Policy> PolicyAgent<P> {
    pub fn new(policy: P, seed: u64) -> Self {
        PolicyAgent {
            policy,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}

impl<P: Policy> Agent for PolicyAgent<P> {
    fn select_action(&mut self, env: &TakEnvironment, state: &GameState) -> Result<Action> {
        let actions = env.possible_actions(state);
        self.policy
            .select_action(state, &actions, &mut self.rng)
            .ok_or(TakError::NoLegalActions)
    }
}
