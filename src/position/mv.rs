use std::fmt;

use arrayvec::ArrayVec;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::utils::{Direction, Piece, Square};

/// The most pieces a single move can carry, and therefore the longest possible drop order
pub const MAX_DROPS: usize = 16;

/// How many pieces a moving stack leaves behind on each square it passes, in order.
/// The counts are all positive, and sum to the number of pieces picked up.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DropOrder {
    drops: ArrayVec<u8, MAX_DROPS>,
}

impl DropOrder {
    /// Returns `None` if any count is zero, or there are too many of them
    pub fn new(drops: &[u8]) -> Option<Self> {
        if drops.is_empty() || drops.len() > MAX_DROPS || drops.contains(&0) {
            return None;
        }
        let mut result = ArrayVec::new();
        result.try_extend_from_slice(drops).ok()?;
        Some(DropOrder { drops: result })
    }

    /// Number of pieces picked up from the origin square
    pub fn total(&self) -> usize {
        self.drops.iter().map(|&count| count as usize).sum()
    }

    /// Number of squares the stack travels
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn last(&self) -> Option<u8> {
        self.drops.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.drops.iter().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.drops
    }
}

impl fmt::Display for DropOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for count in self.drops.iter() {
            write!(f, "{}", count)?;
        }
        Ok(())
    }
}

/// Every ordered composition of `pieces` into positive parts.
///
/// Each of the `pieces - 1` gaps between adjacent pieces either splits two groups or not,
/// so every bit pattern below `2^(pieces - 1)` gives exactly one drop order.
pub fn drop_orders(pieces: usize) -> Vec<DropOrder> {
    if pieces == 0 || pieces > MAX_DROPS {
        return vec![];
    }
    let gaps = pieces - 1;
    let mut result = Vec::with_capacity(1 << gaps);
    for splits in 0..(1_u32 << gaps) {
        let mut drops = ArrayVec::new();
        let mut group = 1;
        for gap in 0..gaps {
            if splits & (1 << gap) != 0 {
                drops.push(group);
                group = 1;
            } else {
                group += 1;
            }
        }
        drops.push(group);
        result.push(DropOrder { drops });
    }
    result
}

/// A legal or illegal action in Tak. Legality is only known relative to a `GameState`.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    /// Put a new piece from the reserves on an empty square
    Place(Piece, Square),
    /// Pick up pieces from a square and spread them in a direction
    Move(Square, Direction, DropOrder),
}

impl Action {
    pub fn is_place(&self) -> bool {
        matches!(self, Action::Place(_, _))
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move(_, _, _))
    }

    pub fn origin(&self) -> Square {
        match self {
            Action::Place(_, square) | Action::Move(square, _, _) => *square,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(piece, square) => write!(f, "{}{}", piece.role().letter(), square),
            Action::Move(square, direction, drops) => write!(
                f,
                "{}{}{}{}",
                drops.total(),
                square,
                direction.arrow(),
                drops
            ),
        }
    }
}
