//! Monte Carlo search over a statistics graph.
//!
//! Each iteration walks forward from the root, adding new positions to the graph,
//! then plays several random games from where the walk stopped, and credits their
//! results to that position and everything above it.

use board_game_traits::Color;
use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::environment::TakEnvironment;
use crate::error::{Result, TakError};
use crate::position::{Action, GameState};
use crate::search::graph::{NodeId, StatsGraph};
use crate::search::random::weighted_choice;
use crate::search::{Agent, Policy, RandomPolicy, Score};

#[derive(Clone, Debug, PartialEq)]
pub struct MctsSetting {
    iterations: u32,
    rollouts: u32,
    expansion_depth: u16,
    expansion_epsilon: f64,
    place_probability: f64,
    known_walk_limit: u32,
    rollout_ply_limit: u32,
    parallel_rollouts: bool,
    reuse_graph: bool,
    seed: u64,
}

impl Default for MctsSetting {
    fn default() -> Self {
        MctsSetting {
            iterations: 10,
            rollouts: 10,
            expansion_depth: 3,
            expansion_epsilon: 0.5,
            place_probability: 0.5,
            known_walk_limit: 256,
            rollout_ply_limit: 1000,
            parallel_rollouts: true,
            reuse_graph: true,
            seed: 0,
        }
    }
}

impl MctsSetting {
    /// Number of expand-simulate-backup cycles per decision
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Number of rollouts played from each expanded position
    pub fn rollouts(mut self, rollouts: u32) -> Self {
        self.rollouts = rollouts.max(1);
        self
    }

    /// How many new positions a single expansion walk may add
    pub fn expansion_depth(mut self, expansion_depth: u16) -> Self {
        self.expansion_depth = expansion_depth;
        self
    }

    /// Probability of a random rather than the best known action during expansion
    pub fn expansion_epsilon(mut self, expansion_epsilon: f64) -> Self {
        self.expansion_epsilon = expansion_epsilon.clamp(0.0, 1.0);
        self
    }

    /// Share of placements among random actions, during expansion and in the fallback
    pub fn place_probability(mut self, place_probability: f64) -> Self {
        self.place_probability = place_probability.clamp(0.0, 1.0);
        self
    }

    /// The most steps an expansion walk may take through positions already in the graph.
    /// Positions can repeat in Tak, so without a limit the walk could go on forever.
    pub fn known_walk_limit(mut self, known_walk_limit: u32) -> Self {
        self.known_walk_limit = known_walk_limit;
        self
    }

    /// Rollouts longer than this are stopped and count as a draw
    pub fn rollout_ply_limit(mut self, rollout_ply_limit: u32) -> Self {
        self.rollout_ply_limit = rollout_ply_limit;
        self
    }

    /// Run the rollouts of each iteration on the rayon thread pool.
    /// Has no effect without the `parallel` feature.
    pub fn parallel_rollouts(mut self, parallel_rollouts: bool) -> Self {
        self.parallel_rollouts = parallel_rollouts;
        self
    }

    /// Keep the graph between decisions, instead of starting from scratch every time
    pub fn reuse_graph(mut self, reuse_graph: bool) -> Self {
        self.reuse_graph = reuse_graph;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// An MCTS player for one side. Rollouts are played with `P`, by default a random policy.
pub struct MctsAgent<P = RandomPolicy> {
    side: Color,
    settings: MctsSetting,
    rollout_policy: P,
    graph: StatsGraph,
    rng: SmallRng,
}

impl MctsAgent<RandomPolicy> {
    pub fn new(side: Color, settings: MctsSetting) -> Self {
        let rollout_policy = RandomPolicy::weighted(settings.place_probability);
        Self::with_rollout_policy(side, settings, rollout_policy)
    }
}

impl<P: Policy + Sync> MctsAgent<P> {
    pub fn with_rollout_policy(side: Color, settings: MctsSetting, rollout_policy: P) -> Self {
        let rng = SmallRng::seed_from_u64(settings.seed);
        MctsAgent {
            side,
            settings,
            rollout_policy,
            graph: StatsGraph::new(),
            rng,
        }
    }

    pub fn side(&self) -> Color {
        self.side
    }

    pub fn graph(&self) -> &StatsGraph {
        &self.graph
    }

    /// Throw away everything learned so far
    pub fn reset_graph(&mut self) {
        self.graph = StatsGraph::new();
    }

    /// Run the configured number of iterations from `state`, and return its node
    pub fn search(&mut self, env: &TakEnvironment, state: &GameState) -> Result<NodeId> {
        if !self.settings.reuse_graph {
            self.reset_graph();
        }
        let root = self.graph.add_node(state.clone());
        for iteration in 0..self.settings.iterations {
            let leaf = self.expand(root)?;
            trace!(
                "Iteration {}: expanded to a position at {} visits",
                iteration,
                self.graph.visits(leaf)
            );
            let rewards = self.simulate(env, leaf)?;
            for reward in rewards {
                self.graph.add_visit(leaf, reward as f64, true);
            }
        }
        Ok(root)
    }

    /// Walk forward from `root` and return the node where the walk stopped.
    ///
    /// The walk adds new positions to the graph until `expansion_depth` steps have been
    /// taken, and then goes on for as long as it keeps finding positions that were already known.
    fn expand(&mut self, root: NodeId) -> Result<NodeId> {
        let mut current = root;
        let mut was_in_graph = true;
        let mut depth = 0;
        let mut known_steps = 0;
        let mut actions = vec![];
        loop {
            let state = self.graph.state(current);
            if state.is_terminal() {
                break;
            }
            if !was_in_graph && depth >= self.settings.expansion_depth {
                break;
            }
            if depth >= self.settings.expansion_depth {
                known_steps += 1;
                if known_steps > self.settings.known_walk_limit {
                    break;
                }
            }
            depth += 1;

            actions.clear();
            state.generate_actions(&mut actions);
            let action = if self.rng.gen_bool(self.settings.expansion_epsilon) {
                weighted_choice(&actions, self.settings.place_probability, &mut self.rng)
            } else {
                match best_action(&self.graph, current, self.side, &mut self.rng) {
                    Some(action) => Some(action),
                    None => {
                        weighted_choice(&actions, self.settings.place_probability, &mut self.rng)
                    }
                }
            }
            .ok_or(TakError::NoLegalActions)?;

            let next = state.apply_copy(&action)?;
            was_in_graph = self.graph.contains(&next);
            current = self.graph.add_state(current, next, action);
        }
        Ok(current)
    }

    /// Play out the configured number of games from `leaf`, returning the reward of each
    fn simulate(&mut self, env: &TakEnvironment, leaf: NodeId) -> Result<Vec<Score>> {
        let seeds: Vec<u64> = (0..self.settings.rollouts).map(|_| self.rng.gen()).collect();
        self.run_rollouts(env, self.graph.state(leaf), seeds)
    }

    #[cfg(feature = "parallel")]
    fn run_rollouts(
        &self,
        env: &TakEnvironment,
        state: &GameState,
        seeds: Vec<u64>,
    ) -> Result<Vec<Score>> {
        if self.settings.parallel_rollouts {
            seeds
                .into_par_iter()
                .map(|seed| self.rollout(env, state, seed))
                .collect()
        } else {
            seeds
                .into_iter()
                .map(|seed| self.rollout(env, state, seed))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_rollouts(
        &self,
        env: &TakEnvironment,
        state: &GameState,
        seeds: Vec<u64>,
    ) -> Result<Vec<Score>> {
        seeds
            .into_iter()
            .map(|seed| self.rollout(env, state, seed))
            .collect()
    }

    /// One game played to the end from `state`. The reward is the size of the final score,
    /// positive if this agent's side won and negative otherwise.
    fn rollout(&self, env: &TakEnvironment, state: &GameState, seed: u64) -> Result<Score> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = state.clone();
        let mut actions = vec![];
        for _ in 0..self.settings.rollout_ply_limit {
            if let Some(outcome) = state.outcome() {
                let magnitude = env.terminal_magnitude(&state);
                return Ok(if outcome.winner == Some(self.side) {
                    magnitude
                } else {
                    -magnitude
                });
            }
            actions.clear();
            state.generate_actions(&mut actions);
            let action = self
                .rollout_policy
                .select_action(&state, &actions, &mut rng)
                .ok_or(TakError::NoLegalActions)?;
            state.apply_in_place(&action)?;
        }
        Ok(0.0)
    }
}

impl<P: Policy + Sync> Agent for MctsAgent<P> {
    fn select_action(&mut self, env: &TakEnvironment, state: &GameState) -> Result<Action> {
        let root = self.search(env, state)?;
        let action = match best_action(&self.graph, root, self.side, &mut self.rng) {
            Some(action) => action,
            None => {
                let actions = env.possible_actions(state);
                actions
                    .choose(&mut self.rng)
                    .cloned()
                    .ok_or(TakError::NoLegalActions)?
            }
        };
        debug!(
            "MCTS for {}: {} after {} rollouts, {} nodes in graph, value {:.2}",
            self.side,
            action,
            self.graph.total_rollouts(root),
            self.graph.total_nodes(),
            self.graph.value(root)
        );
        Ok(action)
    }

    /// Add actions played in the game, including the opponent's, to the graph
    fn observe(
        &mut self,
        _env: &TakEnvironment,
        state: &GameState,
        action: &Action,
        next: &GameState,
    ) {
        if let Some(parent) = self.graph.node_id(state) {
            self.graph.add_state(parent, next.clone(), action.clone());
        }
    }
}

/// The action at `node` with the best mean reward for whoever is to move there.
/// `side` maximizes its reward, the opponent is assumed to minimize it.
/// Equally good actions are chosen between at random.
fn best_action<R: Rng + ?Sized>(
    graph: &StatsGraph,
    node: NodeId,
    side: Color,
    rng: &mut R,
) -> Option<Action> {
    let maximize = graph.state(node).side_to_move() == side;
    let mut best_value = if maximize {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    let mut best_actions: Vec<&Action> = vec![];
    for edge in graph.children(node) {
        let value = graph.value(edge.target());
        let better = if maximize {
            value > best_value
        } else {
            value < best_value
        };
        if better {
            best_value = value;
            best_actions.clear();
            best_actions.push(edge.action());
        } else if value == best_value {
            best_actions.push(edge.action());
        }
    }
    best_actions.choose(rng).map(|action| (*action).clone())
}
