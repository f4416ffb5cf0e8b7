//! The Tak rules engine: board, pieces, actions, and game state.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use board_game_traits::{Color, GameResult};

use crate::error::{Result, TakError};

mod bitboard;
mod board;
pub(crate) mod color_trait;
mod move_gen;
mod mv;
mod road_cache;
mod utils;

pub use bitboard::BitBoard;
pub use board::{Board, BoardMatrix, Edges, RoadRule, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use move_gen::drop_order_table;
pub use mv::{drop_orders, Action, DropOrder, MAX_DROPS};
pub use road_cache::{RoadCache, RoadKey, DEFAULT_ROAD_CACHE_CAPACITY};
pub use utils::{Control, Direction, Piece, Role, Square, Stack};

/// Number of regular stones each side starts with
pub fn starting_stones(size: usize) -> u8 {
    match size {
        3 => 10,
        4 => 15,
        5 => 21,
        6 => 30,
        7 => 40,
        8 => 50,
        _ => (size * size).min(u8::MAX as usize) as u8,
    }
}

/// Number of capstones each side starts with
pub fn starting_capstones(size: usize) -> u8 {
    match size {
        3 | 4 => 0,
        5 | 6 => 1,
        7 | 8 => 2,
        _ if size > 4 => 1,
        _ => 0,
    }
}

/// Why a game ended
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum EndReason {
    /// Both sides completed a road with the same action
    DoubleRoad,
    /// One of the sides has no stones or capstones left
    OutOfPieces,
    /// Every square is occupied
    BoardFull,
}

/// The result of a finished game
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Outcome {
    pub reason: EndReason,
    /// `None` for a draw
    pub winner: Option<Color>,
    pub white_road: bool,
    pub black_road: bool,
}

impl Outcome {
    pub fn game_result(&self) -> GameResult {
        match self.winner {
            Some(Color::White) => GameResult::WhiteWin,
            Some(Color::Black) => GameResult::BlackWin,
            None => GameResult::Draw,
        }
    }

    pub fn has_road(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_road,
            Color::Black => self.black_road,
        }
    }
}

/// A complete Tak position: the board, each side's reserves, and the side to move.
///
/// Equality and hashing only look at the game position itself,
/// not at the shared road cache or the memoized game result.
#[derive(Clone)]
pub struct GameState {
    board: Board,
    to_move: Color,
    pub(crate) white_stones_left: u8,
    pub(crate) black_stones_left: u8,
    pub(crate) white_caps_left: u8,
    pub(crate) black_caps_left: u8,
    roads: Arc<RoadCache>,
    outcome: OnceLock<Option<Outcome>>,
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.to_move == other.to_move
            && self.white_stones_left == other.white_stones_left
            && self.black_stones_left == other.black_stones_left
            && self.white_caps_left == other.white_caps_left
            && self.black_caps_left == other.black_caps_left
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.to_move.hash(state);
        self.white_stones_left.hash(state);
        self.black_stones_left.hash(state);
        self.white_caps_left.hash(state);
        self.black_caps_left.hash(state);
    }
}

impl GameState {
    /// A position with the given board, and the standard reserves for its size
    pub fn new(board: Board, to_move: Color, roads: Arc<RoadCache>) -> Self {
        let stones = starting_stones(board.size());
        let caps = starting_capstones(board.size());
        GameState {
            board,
            to_move,
            white_stones_left: stones,
            black_stones_left: stones,
            white_caps_left: caps,
            black_caps_left: caps,
            roads,
            outcome: OnceLock::new(),
        }
    }

    pub fn with_reserves(mut self, color: Color, stones: u8, caps: u8) -> Self {
        match color {
            Color::White => {
                self.white_stones_left = stones;
                self.white_caps_left = caps;
            }
            Color::Black => {
                self.black_stones_left = stones;
                self.black_caps_left = caps;
            }
        }
        self.outcome = OnceLock::new();
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn side_to_move(&self) -> Color {
        self.to_move
    }

    /// The side that made the previous action
    pub fn last_mover(&self) -> Color {
        !self.to_move
    }

    pub fn stones_left(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_stones_left,
            Color::Black => self.black_stones_left,
        }
    }

    pub fn caps_left(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_caps_left,
            Color::Black => self.black_caps_left,
        }
    }

    pub fn has_cap_available(&self, color: Color) -> bool {
        self.caps_left(color) > 0
    }

    /// The most pieces that may be picked up in one move
    pub fn max_pickup(&self) -> usize {
        self.board.size()
    }

    /// Whether the side to move still has to make its opening placement,
    /// which must be one of the opponent's flat stones
    pub fn is_first_action(&self) -> bool {
        self.board.total_pieces() <= 1
    }

    pub fn road_cache(&self) -> &Arc<RoadCache> {
        &self.roads
    }

    /// Whether `color` has a road under `rule`, memoized in the shared road cache
    pub fn has_road(&self, color: Color, rule: RoadRule) -> bool {
        let key = self.board.road_key(color, rule);
        if (key.pieces.count() as usize) < self.size() {
            return false;
        }
        let edges = self.board.edges();
        self.roads
            .get_or_insert_with(key, || board::road_connects(&key, edges))
    }

    pub fn flat_count(&self, color: Color) -> usize {
        self.board.flat_count(color)
    }

    /// The result of the game, or `None` if it is still going.
    /// Computed once per state and remembered afterwards.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.get_or_init(|| self.compute_outcome()).as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn winner(&self) -> Option<Color> {
        self.outcome().and_then(|outcome| outcome.winner)
    }

    fn compute_outcome(&self) -> Option<Outcome> {
        let white_road = self.has_road(Color::White, RoadRule::Any);
        let black_road = self.has_road(Color::Black, RoadRule::Any);
        let out_of_pieces = [Color::White, Color::Black]
            .iter()
            .any(|&color| self.stones_left(color) == 0 && self.caps_left(color) == 0);
        let board_full = self.board.is_full();

        // A road for one side alone does not end the game
        let reason = if white_road && black_road {
            EndReason::DoubleRoad
        } else if out_of_pieces {
            EndReason::OutOfPieces
        } else if board_full {
            EndReason::BoardFull
        } else {
            return None;
        };

        let has_road = |color| match color {
            Color::White => white_road,
            Color::Black => black_road,
        };
        let last_mover = self.last_mover();
        let winner = if has_road(last_mover) {
            Some(last_mover)
        } else if has_road(!last_mover) {
            Some(!last_mover)
        } else {
            match self
                .flat_count(Color::White)
                .cmp(&self.flat_count(Color::Black))
            {
                Ordering::Greater => Some(Color::White),
                Ordering::Less => Some(Color::Black),
                Ordering::Equal => None,
            }
        };

        Some(Outcome {
            reason,
            winner,
            white_road,
            black_road,
        })
    }

    fn take_from_reserves(&mut self, role: Role) -> Result<()> {
        let color = self.to_move;
        let pool = match (color, role) {
            (Color::White, Role::Cap) => &mut self.white_caps_left,
            (Color::Black, Role::Cap) => &mut self.black_caps_left,
            (Color::White, _) => &mut self.white_stones_left,
            (Color::Black, _) => &mut self.black_stones_left,
        };
        *pool = pool
            .checked_sub(1)
            .ok_or(TakError::NoSupplyAvailable { color, role })?;
        Ok(())
    }

    /// Play `action` on this state. The action is assumed to be valid;
    /// if it isn't, the state may be left half-changed.
    pub fn apply_in_place(&mut self, action: &Action) -> Result<()> {
        self.outcome = OnceLock::new();
        let size = self.size();
        match action {
            Action::Place(piece, square) => {
                if !square.is_on_board(size) {
                    return Err(TakError::InvalidAction(format!("{} is off the board", square)));
                }
                self.take_from_reserves(piece.role())?;
                self.board[*square].push(*piece);
            }
            Action::Move(origin, direction, drops) => {
                if !origin.is_on_board(size) {
                    return Err(TakError::InvalidAction(format!("{} is off the board", origin)));
                }
                let mut carried = self.board[*origin].take(drops.total())?.into_iter();
                let mut square = *origin;
                for count in drops.iter() {
                    square = square.go_direction(*direction, size).ok_or_else(|| {
                        TakError::InvalidAction(format!("{} moves off the board", action))
                    })?;
                    for piece in carried.by_ref().take(count as usize) {
                        self.board[square].push(piece);
                    }
                }
            }
        }
        self.to_move = !self.to_move;
        Ok(())
    }

    /// Play `action` on a copy of this state, leaving this one untouched
    pub fn apply_copy(&self, action: &Action) -> Result<GameState> {
        let mut next = GameState {
            board: self.board.clone(),
            to_move: self.to_move,
            white_stones_left: self.white_stones_left,
            black_stones_left: self.black_stones_left,
            white_caps_left: self.white_caps_left,
            black_caps_left: self.black_caps_left,
            roads: Arc::clone(&self.roads),
            outcome: OnceLock::new(),
        };
        next.apply_in_place(action)?;
        Ok(next)
    }

    /// Parse an action in the notation produced by `Action`'s `Display` implementation,
    /// such as `Fa1`, `Cc3` or `3c3→12`.
    ///
    /// Placements don't say whose piece is placed, so the piece is the mover's,
    /// or the opponent's flat stone for the opening placement.
    /// Directions may also be written as `+ > - <` or `U R D L`,
    /// A missing count means a single stone is moved, and a missing drop order means
    /// every stone picked up is dropped on the next square.
    pub fn parse_action(&self, input: &str) -> Result<Action> {
        let parse_error = || TakError::ParseError(format!("action \"{}\"", input));
        let mut chars = input.chars().peekable();

        if let Some(role) = chars.peek().copied().and_then(Role::from_letter) {
            chars.next();
            let square: Square = chars.collect::<String>().parse()?;
            let piece = if self.is_first_action() {
                Piece::from_role_color(role, !self.to_move)
            } else {
                Piece::from_role_color(role, self.to_move)
            };
            return Ok(Action::Place(piece, square));
        }

        let mut count = String::new();
        while let Some(ch) = chars.peek().copied().filter(char::is_ascii_digit) {
            count.push(ch);
            chars.next();
        }
        let mut square = String::new();
        let mut direction = None;
        for ch in chars.by_ref() {
            if let Some(dir) = Direction::parse(ch) {
                direction = Some(dir);
                break;
            }
            square.push(ch);
        }
        let direction = direction.ok_or_else(parse_error)?;
        let square: Square = square.parse()?;
        let total: u8 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| parse_error())?
        };

        let mut drops = vec![];
        for ch in chars {
            let drop = ch.to_digit(10).ok_or_else(parse_error)?;
            drops.push(drop as u8);
        }
        if drops.is_empty() {
            drops.push(total);
        }
        let drops = DropOrder::new(&drops).ok_or_else(parse_error)?;
        if drops.total() != total as usize {
            return Err(parse_error());
        }
        Ok(Action::Move(square, direction, drops))
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.board)?;
        writeln!(
            f,
            "Stones left: {}/{}.",
            self.white_stones_left, self.black_stones_left
        )?;
        writeln!(
            f,
            "Capstones left: {}/{}.",
            self.white_caps_left, self.black_caps_left
        )?;
        writeln!(f, "{} to move.", self.side_to_move())?;
        Ok(())
    }
}
