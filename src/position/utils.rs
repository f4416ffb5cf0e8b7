use std::fmt;
use std::ops;
use std::str::FromStr;

use board_game_traits::Color;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TakError};
use crate::position::color_trait::{BlackTr, ColorTr, WhiteTr};
use crate::position::utils::Direction::*;
use crate::position::Piece::{BlackCap, BlackFlat, BlackWall, WhiteCap, WhiteFlat, WhiteWall};
use crate::position::Role::{Cap, Flat, Wall};

/// One of the 3 piece roles in Tak. The same as piece, but without different variants for each color.
///
/// A `Wall` is a standing stone: it blocks, but does not count towards roads.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    Flat = 0,
    Wall = 1,
    Cap = 2,
}

impl Role {
    pub fn disc(self) -> usize {
        self as u16 as usize
    }

    /// Letter used for this role in action notation
    pub fn letter(self) -> char {
        match self {
            Flat => 'F',
            Wall => 'S',
            Cap => 'C',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        match ch {
            'F' => Some(Flat),
            'S' => Some(Wall),
            'C' => Some(Cap),
            _ => None,
        }
    }
}

/// One of the 6 game pieces in Tak. Each piece has one variant for each color.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    WhiteFlat = 0,
    BlackFlat = 1,
    WhiteWall = 2,
    BlackWall = 3,
    WhiteCap = 4,
    BlackCap = 5,
}

impl Piece {
    pub fn from_role_color(role: Role, color: Color) -> Self {
        match (role, color) {
            (Flat, Color::White) => WhiteFlat,
            (Wall, Color::White) => WhiteWall,
            (Cap, Color::White) => WhiteCap,
            (Flat, Color::Black) => BlackFlat,
            (Wall, Color::Black) => BlackWall,
            (Cap, Color::Black) => BlackCap,
        }
    }

    pub fn role(self) -> Role {
        match self {
            WhiteFlat | BlackFlat => Flat,
            WhiteWall | BlackWall => Wall,
            WhiteCap | BlackCap => Cap,
        }
    }

    pub fn color(self) -> Color {
        match self {
            WhiteFlat | WhiteWall | WhiteCap => Color::White,
            BlackFlat | BlackWall | BlackCap => Color::Black,
        }
    }

    pub fn is_road_piece(self) -> bool {
        WhiteTr::is_road_stone(self) || BlackTr::is_road_stone(self)
    }

    /// Whether this piece may be placed on top of `other`.
    /// Flats and walls need a flat below them, a capstone may also go on a wall.
    pub fn can_place_on(self, other: Piece) -> bool {
        match (self.role(), other.role()) {
            (_, Flat) => true,
            (Cap, Wall) => true,
            _ => false,
        }
    }

    /// Whether putting this piece on top of `other` flattens it
    pub fn flattens(self, other: Piece) -> bool {
        self.role() == Cap && other.role() == Wall
    }

    /// The flat stone of the same color. Only walls change.
    pub fn flattened(self) -> Self {
        match self {
            WhiteWall => WhiteFlat,
            BlackWall => BlackFlat,
            piece => piece,
        }
    }

    /// Signed integer code used by the 3D board matrix
    pub fn matrix_value(self) -> i8 {
        match self {
            WhiteFlat => 1,
            WhiteWall => 2,
            WhiteCap => 3,
            BlackFlat => -1,
            BlackWall => -2,
            BlackCap => -3,
        }
    }

    pub fn from_matrix_value(value: i8) -> Option<Self> {
        match value {
            1 => Some(WhiteFlat),
            2 => Some(WhiteWall),
            3 => Some(WhiteCap),
            -1 => Some(BlackFlat),
            -2 => Some(BlackWall),
            -3 => Some(BlackCap),
            _ => None,
        }
    }
}

impl ops::Not for Piece {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            WhiteFlat => BlackFlat,
            BlackFlat => WhiteFlat,
            WhiteWall => BlackWall,
            BlackWall => WhiteWall,
            WhiteCap => BlackCap,
            BlackCap => WhiteCap,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.role().letter();
        match self.color() {
            Color::White => write!(f, "{}", letter),
            Color::Black => write!(f, "{}", letter.to_ascii_lowercase()),
        }
    }
}

/// Which tops count when asking whether a stack is controlled by a side
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Control {
    /// Any piece on top
    Any,
    /// Only a flat stone on top, as counted for the flat win
    Flat,
    /// A flat stone or a capstone on top, as counted for roads
    Road,
}

/// The contents of a square on the board, consisting of zero or more pieces
#[derive(Clone, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stack {
    pieces: Vec<Piece>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { pieces: vec![] }
    }

    /// Build a stack from pieces listed bottom to top, exactly as given
    pub fn from_pieces(pieces: Vec<Piece>) -> Self {
        Stack { pieces }
    }

    /// Get a piece by index. 0 is the bottom of the stack
    pub fn get(&self, i: usize) -> Option<Piece> {
        self.pieces.get(i).copied()
    }

    pub fn top_stone(&self) -> Option<Piece> {
        self.pieces.last().copied()
    }

    pub fn top(&self) -> Result<Piece> {
        self.top_stone().ok_or(TakError::EmptyStack)
    }

    /// Push a new piece to the top of the stack, without checking that the placement is allowed.
    ///
    /// A capstone arriving on a wall flattens the wall first.
    pub fn push(&mut self, piece: Piece) {
        if let Some(top) = self.pieces.last_mut() {
            if piece.flattens(*top) {
                *top = top.flattened();
            }
        }
        self.pieces.push(piece);
    }

    /// Push a new piece, failing if it cannot legally go on the current top
    pub fn try_push(&mut self, piece: Piece) -> Result<()> {
        match self.top_stone() {
            Some(top) if !piece.can_place_on(top) => Err(TakError::InvalidPlacement { piece, top }),
            _ => {
                self.push(piece);
                Ok(())
            }
        }
    }

    pub fn pop(&mut self) -> Result<Piece> {
        self.pieces.pop().ok_or(TakError::EmptyStack)
    }

    /// Remove the top `count` pieces, returned bottom to top
    pub fn take(&mut self, count: usize) -> Result<Vec<Piece>> {
        if count > self.pieces.len() {
            return Err(TakError::EmptyStack);
        }
        Ok(self.pieces.split_off(self.pieces.len() - count))
    }

    /// Turn a wall on top of the stack into a flat stone
    pub fn flatten(&mut self) {
        if let Some(top) = self.pieces.last_mut() {
            *top = top.flattened();
        }
    }

    /// Whether `piece` may legally be placed here. Anything goes on an empty stack.
    pub fn can_place(&self, piece: Piece) -> bool {
        self.top_stone()
            .map_or(true, |top| piece.can_place_on(top))
    }

    pub fn controlled_by(&self) -> Option<Color> {
        self.top_stone().map(Piece::color)
    }

    pub fn is_controlled_by(&self, color: Color, control: Control) -> bool {
        match self.top_stone() {
            None => false,
            Some(top) if top.color() != color => false,
            Some(top) => match control {
                Control::Any => true,
                Control::Flat => top.role() == Flat,
                Control::Road => top.is_road_piece(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// The pieces in the stack, from the bottom up
    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces.iter().copied()
    }
}

/// A location on the board, as a file (column, `a` is 0) and rank (row, `1` is 0)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    pub const fn new(file: u8, rank: u8) -> Self {
        Square { file, rank }
    }

    pub fn from_index(index: usize, size: usize) -> Self {
        Square {
            file: (index % size) as u8,
            rank: (index / size) as u8,
        }
    }

    pub fn index(self, size: usize) -> usize {
        self.rank as usize * size + self.file as usize
    }

    pub fn is_on_board(self, size: usize) -> bool {
        (self.file as usize) < size && (self.rank as usize) < size
    }

    pub fn go_direction(self, direction: Direction, size: usize) -> Option<Square> {
        self.jump_direction(direction, 1, size)
    }

    pub fn jump_direction(self, direction: Direction, len: u8, size: usize) -> Option<Square> {
        let (file, rank) = match direction {
            North => (Some(self.file), self.rank.checked_add(len)),
            East => (self.file.checked_add(len), Some(self.rank)),
            South => (Some(self.file), self.rank.checked_sub(len)),
            West => (self.file.checked_sub(len), Some(self.rank)),
        };
        let square = Square::new(file?, rank?);
        if square.is_on_board(size) {
            Some(square)
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (self.file + b'a') as char, self.rank as u16 + 1)
    }
}

impl FromStr for Square {
    type Err = TakError;

    fn from_str(input: &str) -> Result<Self> {
        let mut chars = input.chars();
        let file = chars
            .next()
            .filter(|ch| ch.is_ascii_lowercase())
            .ok_or_else(|| TakError::ParseError(format!("square \"{}\"", input)))?;
        let rank: u8 = chars
            .as_str()
            .parse()
            .ok()
            .filter(|rank| *rank >= 1)
            .ok_or_else(|| TakError::ParseError(format!("square \"{}\"", input)))?;
        Ok(Square::new(file as u8 - b'a', rank - 1))
    }
}

/// One of the four cardinal directions on the board. North is towards higher ranks.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [North, East, South, West];

    pub fn reverse(self) -> Direction {
        match self {
            North => South,
            West => East,
            East => West,
            South => North,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            North => '↑',
            East => '→',
            South => '↓',
            West => '←',
        }
    }

    /// Accepts the arrows, PTN-style `+ > - <` and the letters `U R D L`
    pub fn parse(ch: char) -> Option<Self> {
        match ch {
            '↑' | '+' | 'U' => Some(North),
            '→' | '>' | 'R' => Some(East),
            '↓' | '-' | 'D' => Some(South),
            '←' | '<' | 'L' => Some(West),
            _ => None,
        }
    }
}
