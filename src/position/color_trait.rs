//* Traits for white/black colors. Useful for writing functions that are generic over color,
//* like how the move generator is structured.

use board_game_traits::Color;

use crate::position::utils::Piece;
use crate::position::utils::Piece::{
    BlackCap, BlackFlat, BlackWall, WhiteCap, WhiteFlat, WhiteWall,
};
use crate::position::GameState;

pub(crate) trait ColorTr {
    fn color() -> Color;

    fn stones_left(state: &GameState) -> u8;

    fn caps_left(state: &GameState) -> u8;

    fn flat_piece() -> Piece;

    fn wall_piece() -> Piece;

    fn cap_piece() -> Piece;

    fn is_road_stone(piece: Piece) -> bool;

    fn piece_is_ours(piece: Piece) -> bool;
}

pub(crate) struct WhiteTr {}

impl ColorTr for WhiteTr {
    fn color() -> Color {
        Color::White
    }

    fn stones_left(state: &GameState) -> u8 {
        state.white_stones_left
    }

    fn caps_left(state: &GameState) -> u8 {
        state.white_caps_left
    }

    fn flat_piece() -> Piece {
        Piece::WhiteFlat
    }

    fn wall_piece() -> Piece {
        Piece::WhiteWall
    }

    fn cap_piece() -> Piece {
        Piece::WhiteCap
    }

    fn is_road_stone(piece: Piece) -> bool {
        piece == WhiteFlat || piece == WhiteCap
    }

    fn piece_is_ours(piece: Piece) -> bool {
        piece == WhiteFlat || piece == WhiteWall || piece == WhiteCap
    }
}

pub(crate) struct BlackTr {}

impl ColorTr for BlackTr {
    fn color() -> Color {
        Color::Black
    }

    fn stones_left(state: &GameState) -> u8 {
        state.black_stones_left
    }

    fn caps_left(state: &GameState) -> u8 {
        state.black_caps_left
    }

    fn flat_piece() -> Piece {
        Piece::BlackFlat
    }

    fn wall_piece() -> Piece {
        Piece::BlackWall
    }

    fn cap_piece() -> Piece {
        Piece::BlackCap
    }

    fn is_road_stone(piece: Piece) -> bool {
        piece == BlackFlat || piece == BlackCap
    }

    fn piece_is_ours(piece: Piece) -> bool {
        piece == BlackFlat || piece == BlackWall || piece == BlackCap
    }
}
