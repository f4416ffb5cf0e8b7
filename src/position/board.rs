use std::fmt;
use std::ops::{Index, IndexMut};

use board_game_traits::Color;

use crate::error::{Result, TakError};
use crate::position::bitboard::BitBoard;
use crate::position::road_cache::RoadKey;
use crate::position::utils::{Control, Piece, Square, Stack};

pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 8;

/// Which stacks may form a road, and how they may connect
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum RoadRule {
    /// Flat stones and capstones of any height
    Any,
    /// Only stacks of height 1
    Low,
    /// Stacks of any height. Same as `Any`, kept for rulesets that score it differently
    High,
    /// Adjacent squares must lie along the direction of the road, no turns allowed
    Straight,
}

impl RoadRule {
    fn is_straight(self) -> bool {
        self == RoadRule::Straight
    }
}

/// The four board edges, as sets of squares
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Edges {
    pub south: BitBoard,
    pub north: BitBoard,
    pub west: BitBoard,
    pub east: BitBoard,
}

impl Edges {
    pub fn new(size: usize) -> Self {
        Edges {
            south: BitBoard::rank(0, size),
            north: BitBoard::rank(size as u8 - 1, size),
            west: BitBoard::file(0, size),
            east: BitBoard::file(size as u8 - 1, size),
        }
    }
}

/// An N×N grid of stacks
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Stack>,
    edges: Edges,
}

impl Board {
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(TakError::UnsupportedBoardSize(size));
        }
        Ok(Board {
            size,
            cells: vec![Stack::default(); size * size],
            edges: Edges::new(size),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    /// Whether `(file, rank)` lies on the board. Takes signed coordinates so that
    /// callers may step off the board before asking.
    pub fn is_in_bounds(&self, file: i64, rank: i64) -> bool {
        (0..self.size as i64).contains(&file) && (0..self.size as i64).contains(&rank)
    }

    pub fn get(&self, square: Square) -> Option<&Stack> {
        if square.is_on_board(self.size) {
            self.cells.get(square.index(self.size))
        } else {
            None
        }
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let size = self.size;
        (0..size * size).map(move |i| Square::from_index(i, size))
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self[square].is_empty()
    }

    pub fn top_piece(&self, square: Square) -> Option<Piece> {
        self[square].top_stone()
    }

    pub fn height(&self, square: Square) -> usize {
        self[square].len()
    }

    pub fn is_controlled_by(&self, square: Square, color: Color, control: Control) -> bool {
        self[square].is_controlled_by(color, control)
    }

    pub fn empty_squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares().filter(move |square| self[*square].is_empty())
    }

    pub fn controlled_squares(
        &self,
        color: Color,
        control: Control,
    ) -> impl Iterator<Item = Square> + '_ {
        self.squares()
            .filter(move |square| self[*square].is_controlled_by(color, control))
    }

    /// Put a piece on a square without checking that the placement is legal.
    /// Walls are still flattened by capstones.
    pub fn place_piece(&mut self, square: Square, piece: Piece) {
        self[square].push(piece)
    }

    pub fn total_pieces(&self) -> usize {
        self.cells.iter().map(Stack::len).sum()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|stack| !stack.is_empty())
    }

    /// Number of squares with one of `color`'s flat stones on top
    pub fn flat_count(&self, color: Color) -> usize {
        self.controlled_squares(color, Control::Flat).count()
    }

    /// The squares that can be part of a road for `color` under `rule`
    pub fn road_pieces(&self, color: Color, rule: RoadRule) -> BitBoard {
        let mut pieces = BitBoard::empty();
        for (i, stack) in self.cells.iter().enumerate() {
            if stack.is_controlled_by(color, Control::Road)
                && (rule != RoadRule::Low || stack.len() == 1)
            {
                pieces = pieces.set(i as u8);
            }
        }
        pieces
    }

    pub(crate) fn road_key(&self, color: Color, rule: RoadRule) -> RoadKey {
        RoadKey {
            pieces: self.road_pieces(color, rule),
            size: self.size as u8,
            straight: rule.is_straight(),
        }
    }

    /// Whether `color` has a road. Not memoized, see `GameState::has_road` for the cached version.
    pub fn has_road(&self, color: Color, rule: RoadRule) -> bool {
        road_connects(&self.road_key(color, rule), &self.edges)
    }

    /// Encode the board as a file × rank × height matrix, padded with zeros up to the tallest stack
    pub fn to_matrix(&self) -> BoardMatrix {
        let depth = self.cells.iter().map(Stack::len).max().unwrap_or(0).max(1);
        let mut matrix = BoardMatrix {
            size: self.size,
            depth,
            data: vec![0; self.size * self.size * depth],
        };
        for square in self.squares() {
            for (z, piece) in self[square].iter().enumerate() {
                let index = matrix.index(square.file as usize, square.rank as usize, z);
                matrix.data[index] = piece.matrix_value();
            }
        }
        matrix
    }

    /// Decode a board from its matrix form. Pieces are stacked exactly as listed,
    /// bottom first, and every stack ends at its first zero.
    pub fn from_matrix(matrix: &BoardMatrix) -> Result<Self> {
        let mut board = Board::new(matrix.size)?;
        for square in board.squares() {
            let mut pieces = vec![];
            let mut ended = false;
            for z in 0..matrix.depth {
                let value = matrix.get(square.file as usize, square.rank as usize, z);
                if value == 0 {
                    ended = true;
                } else if ended {
                    return Err(TakError::InvalidMatrix(format!(
                        "piece {} above an empty level on {}",
                        value, square
                    )));
                } else {
                    let piece = Piece::from_matrix_value(value).ok_or_else(|| {
                        TakError::InvalidMatrix(format!("unknown piece code {}", value))
                    })?;
                    pieces.push(piece);
                }
            }
            board[square] = Stack::from_pieces(pieces);
        }
        Ok(board)
    }
}

/// Whether `key.pieces` connects two opposite edges.
///
/// Grows the set of reached squares from one edge until it touches the other edge,
/// or stops growing. Squares may only join through their neighbours along the road's
/// own axis when the road must be straight.
pub(crate) fn road_connects(key: &RoadKey, edges: &Edges) -> bool {
    let size = key.size as usize;
    let pieces = key.pieces;
    if (pieces.count() as usize) < size {
        return false;
    }
    let vertical = |reached: BitBoard| {
        if key.straight {
            reached.vertical_neighbors(size)
        } else {
            reached.vertical_neighbors(size) | reached.horizontal_neighbors(size)
        }
    };
    let horizontal = |reached: BitBoard| {
        if key.straight {
            reached.horizontal_neighbors(size)
        } else {
            reached.vertical_neighbors(size) | reached.horizontal_neighbors(size)
        }
    };
    spans(pieces, edges.south, edges.north, vertical) || spans(pieces, edges.west, edges.east, horizontal)
}

fn spans<F: Fn(BitBoard) -> BitBoard>(pieces: BitBoard, from: BitBoard, to: BitBoard, spread: F) -> bool {
    let mut reached = pieces & from;
    loop {
        if !(reached & to).is_empty() {
            return true;
        }
        let next = (reached | spread(reached)) & pieces;
        if next == reached {
            return false;
        }
        reached = next;
    }
}

impl Index<Square> for Board {
    type Output = Stack;

    fn index(&self, square: Square) -> &Self::Output {
        &self.cells[square.index(self.size)]
    }
}

impl IndexMut<Square> for Board {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.cells[square.index(self.size)]
    }
}

/// Renders the top of each stack, highest rank first.
/// White pieces are upper case, black lower case, and `_` is an empty square.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..self.size).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..self.size {
                if file > 0 {
                    write!(f, " ")?;
                }
                match self[Square::new(file as u8, rank as u8)].top_stone() {
                    Some(piece) => write!(f, "{}", piece)?,
                    None => write!(f, "_")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for file in 0..self.size {
            write!(f, " {}", (b'a' + file as u8) as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..self.size).rev() {
            for file in 0..self.size {
                let stack = &self[Square::new(file as u8, rank as u8)];
                write!(f, "[")?;
                for piece in stack.iter() {
                    write!(f, "{}", piece)?;
                }
                if stack.is_empty() {
                    write!(f, ".")?;
                }
                write!(f, "] ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A board as a dense file × rank × height array of signed piece codes.
/// White flat, wall and capstone are 1, 2 and 3, black pieces are negated, and 0 is empty.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoardMatrix {
    size: usize,
    depth: usize,
    data: Vec<i8>,
}

impl BoardMatrix {
    /// Interpret `data` as a `size` × `size` × depth array, with the depth inferred from its length
    pub fn from_flat(data: &[i8], size: usize) -> Result<Self> {
        let area = size * size;
        if area == 0 || data.is_empty() || data.len() % area != 0 {
            return Err(TakError::InvalidMatrix(format!(
                "{} values don't fill a {}x{} board",
                data.len(),
                size,
                size
            )));
        }
        Ok(BoardMatrix {
            size,
            depth: data.len() / area,
            data: data.to_vec(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.size, self.size, self.depth)
    }

    fn index(&self, file: usize, rank: usize, z: usize) -> usize {
        (file * self.size + rank) * self.depth + z
    }

    pub fn get(&self, file: usize, rank: usize, z: usize) -> i8 {
        self.data[self.index(file, rank, z)]
    }

    /// The column of piece codes on one square, bottom first, including padding
    pub fn column(&self, file: usize, rank: usize) -> &[i8] {
        let start = self.index(file, rank, 0);
        &self.data[start..start + self.depth]
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }
}
