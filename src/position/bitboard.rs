use crate::position::utils::Square;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, ops};

/// A set of squares on a board of up to 8x8, one bit per square.
/// Bit `rank * size + file` is the square at `(file, rank)`.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitBoard {
    pub board: u64,
}

impl ops::BitOr for BitBoard {
    type Output = BitBoard;
    #[inline]
    fn bitor(self, rhs: BitBoard) -> BitBoard {
        BitBoard::from_u64(self.board | rhs.board)
    }
}

impl ops::BitOrAssign for BitBoard {
    #[inline]
    fn bitor_assign(&mut self, rhs: BitBoard) {
        self.board |= rhs.board
    }
}

impl ops::BitAnd for BitBoard {
    type Output = BitBoard;
    #[inline]
    fn bitand(self, rhs: BitBoard) -> BitBoard {
        BitBoard::from_u64(self.board & rhs.board)
    }
}

impl ops::BitAndAssign for BitBoard {
    #[inline]
    fn bitand_assign(&mut self, rhs: BitBoard) {
        self.board &= rhs.board
    }
}

impl ops::Not for BitBoard {
    type Output = BitBoard;
    #[inline]
    fn not(self) -> BitBoard {
        BitBoard::from_u64(!self.board)
    }
}

impl BitBoard {
    #[inline]
    pub const fn empty() -> Self {
        BitBoard { board: 0 }
    }

    /// Every square of a `size` board
    #[inline]
    pub fn full(size: usize) -> Self {
        BitBoard::lower_n_bits((size * size) as u8)
    }

    #[inline]
    pub fn lower_n_bits(n: u8) -> Self {
        if n >= 64 {
            BitBoard { board: u64::MAX }
        } else {
            BitBoard {
                board: (1 << n as u64) - 1,
            }
        }
    }

    #[inline]
    pub const fn from_u64(n: u64) -> Self {
        BitBoard { board: n }
    }

    #[inline]
    pub fn get(self, i: u8) -> bool {
        debug_assert!(i < 64);
        self.board & (1 << i) != 0
    }

    // Sets the square to true
    #[inline]
    pub fn set(self, i: u8) -> Self {
        debug_assert!(i < 64);
        BitBoard::from_u64(self.board | 1 << i)
    }

    // Sets the square to false
    #[inline]
    pub fn clear(self, i: u8) -> Self {
        debug_assert!(i < 64);
        BitBoard::from_u64(self.board & !(1 << i))
    }

    #[inline]
    pub fn get_square(self, square: Square, size: usize) -> bool {
        self.get(square.index(size) as u8)
    }

    #[inline]
    pub fn set_square(self, square: Square, size: usize) -> Self {
        self.set(square.index(size) as u8)
    }

    /// All squares of rank `i`
    #[inline]
    pub fn rank(i: u8, size: usize) -> Self {
        debug_assert!((i as usize) < size);
        let mask = (1 << size) - 1;
        BitBoard::from_u64(mask << (i as u64 * size as u64))
    }

    /// All squares of file `i`
    #[inline]
    pub fn file(i: u8, size: usize) -> Self {
        debug_assert!((i as usize) < size);
        let mut mask = 0;
        for rank in 0..size {
            mask |= 1 << (rank * size);
        }
        BitBoard::from_u64(mask << i as u64)
    }

    /// The squares one step north or south of any square in the set
    #[inline]
    pub fn vertical_neighbors(self, size: usize) -> Self {
        BitBoard::from_u64((self.board << size) | (self.board >> size)) & BitBoard::full(size)
    }

    /// The squares one step east or west of any square in the set, without wrapping around
    #[inline]
    pub fn horizontal_neighbors(self, size: usize) -> Self {
        let not_first_file = !BitBoard::file(0, size);
        let not_last_file = !BitBoard::file(size as u8 - 1, size);
        (BitBoard::from_u64((self.board & not_last_file.board) << 1)
            | BitBoard::from_u64((self.board & not_first_file.board) >> 1))
            & BitBoard::full(size)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.board == 0
    }

    #[inline]
    pub fn count(self) -> u8 {
        self.board.count_ones() as u8
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                if self.get(rank * 8 + file) {
                    write!(f, "x")?;
                } else {
                    write!(f, ".")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
