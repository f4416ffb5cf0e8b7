#[cfg(test)]
mod action_tests;
#[cfg(test)]
mod mcts_tests;
#[cfg(test)]
mod policy_tests;
#[cfg(test)]
mod scoring_tests;

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use board_game_traits::Color;

#[cfg(test)]
use crate::position::{Board, GameState, Piece, RoadCache, Square};

#[cfg(test)]
fn sq(name: &str) -> Square {
    name.parse().unwrap()
}

#[cfg(test)]
fn empty_state(size: usize, to_move: Color) -> GameState {
    GameState::new(Board::new(size).unwrap(), to_move, Arc::new(RoadCache::default()))
}

/// A position with `pieces` stacked on the board in the order given, and the standard reserves
#[cfg(test)]
fn state_with_pieces(size: usize, to_move: Color, pieces: &[(&str, Piece)]) -> GameState {
    let mut board = Board::new(size).unwrap();
    for (square, piece) in pieces {
        board.place_piece(sq(square), *piece);
    }
    GameState::new(board, to_move, Arc::new(RoadCache::default()))
}

#[cfg(test)]
fn do_actions_and_check_validity(state: &mut GameState, action_strings: &[&str]) {
    for action_string in action_strings {
        let action = state.parse_action(action_string).unwrap();
        let actions = state.possible_actions();
        assert!(
            actions.contains(&action),
            "Action {} was not among legal actions: {:?}\n{:?}",
            action,
            actions,
            state
        );
        state.apply_in_place(&action).unwrap();
    }
}

/// Stones and capstones on the board and in both reserves, regardless of color
#[cfg(test)]
fn count_material(state: &GameState) -> (usize, usize) {
    let board = state.board();
    let (mut stones, mut caps) = (0, 0);
    for square in board.squares() {
        for piece in board[square].iter() {
            if piece.role() == crate::position::Role::Cap {
                caps += 1;
            } else {
                stones += 1;
            }
        }
    }
    for color in [Color::White, Color::Black] {
        stones += state.stones_left(color) as usize;
        caps += state.caps_left(color) as usize;
    }
    (stones, caps)
}
