//! A Tak rules engine, with agents to play it: random play, SARSA, minmax and
//! Monte Carlo tree search over a graph of positions.

pub mod config;
pub mod environment;
pub mod error;
pub mod position;
pub mod scoring;
pub mod search;
mod tests;

pub use config::GameConfig;
pub use environment::{StepInfo, StepResult, TakEnvironment};
pub use error::{Result, TakError};
pub use position::{Action, Board, GameState};
