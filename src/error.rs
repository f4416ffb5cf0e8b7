use board_game_traits::Color;

use crate::position::{Piece, Role};

/// Errors from the rules engine and the agents built on it.
///
/// None of these are recoverable by the engine itself. Actions taken from
/// `possible_actions`, or checked with `is_valid` first, never produce them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TakError {
    #[error("cannot place {piece:?} on top of {top:?}")]
    InvalidPlacement { piece: Piece, top: Piece },

    #[error("stack is empty")]
    EmptyStack,

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("{color} has no {role:?} pieces left")]
    NoSupplyAvailable { color: Color, role: Role },

    #[error("unsupported board size {0}")]
    UnsupportedBoardSize(usize),

    #[error("invalid board matrix: {0}")]
    InvalidMatrix(String),

    #[error("couldn't parse {0}")]
    ParseError(String),

    #[error("no legal actions in this position")]
    NoLegalActions,
}

pub type Result<T> = std::result::Result<T, TakError>;
