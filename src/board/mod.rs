//! Board representation for Nine Men's Morris

pub mod board;
pub mod topology;


use std::fmt;

// Re-exports
pub use board::{BoardError, BoardState, Undo};
pub use topology::{are_adjacent, mill_lines_containing, neighbors, MillLine, MILL_LINES};

/// Number of points on the board
pub const POINT_COUNT: usize = 24;
/// Pieces each player brings into the game
pub const PIECES_PER_PLAYER: u8 = 9;
/// A player at this many pieces (after placing) may fly
pub const FLYING_THRESHOLD: u8 = 3;

/// Piece colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    /// Player 0, moves first
    White,
    /// Player 1
    Black,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::White => Stone::Black,
            Stone::Black => Stone::White,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Player index (0 for White, 1 for Black) for per-player tables
    #[inline]
    pub(crate) fn index(self) -> usize {
        debug_assert!(self != Stone::Empty, "Empty has no player index");
        match self {
            Stone::Black => 1,
            _ => 0,
        }
    }
}

/// Per-player phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than nine pieces placed
    Placing,
    /// Slides to adjacent points only
    Moving,
    /// Down to three pieces: slides to any empty point
    Flying,
}

/// Point on the board, `0..24`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos(u8);

impl Pos {
    #[inline]
    pub fn new(index: u8) -> Self {
        debug_assert!((index as usize) < POINT_COUNT);
        Self(index)
    }

    /// Checked constructor for untrusted input
    #[inline]
    pub fn try_new(index: u8) -> Option<Self> {
        ((index as usize) < POINT_COUNT).then_some(Self(index))
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.0 as usize
    }

    /// All 24 points in ascending order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..POINT_COUNT as u8).map(Pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single decision by one player.
///
/// A full [`Move`] is one ply, or two when the placement or slide completes a
/// mill and the capture follows as a second decision by the same player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ply {
    Place(Pos),
    Slide { from: Pos, to: Pos },
    Remove(Pos),
}

/// A complete turn: a placement or slide, with the capture it earns if it
/// closes a mill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// `None` for a placement
    pub from: Option<Pos>,
    pub to: Pos,
    /// Opponent piece taken off the board, only when `to` completes a mill
    pub remove: Option<Pos>,
}

impl Move {
    #[inline]
    pub fn placement(to: Pos) -> Self {
        Self { from: None, to, remove: None }
    }

    #[inline]
    pub fn slide(from: Pos, to: Pos) -> Self {
        Self { from: Some(from), to, remove: None }
    }

    #[inline]
    pub fn placement_with_capture(to: Pos, remove: Pos) -> Self {
        Self { from: None, to, remove: Some(remove) }
    }

    #[inline]
    pub fn slide_with_capture(from: Pos, to: Pos, remove: Pos) -> Self {
        Self { from: Some(from), to, remove: Some(remove) }
    }

    /// Same placement or slide, now capturing `remove`
    #[inline]
    #[must_use]
    pub fn with_capture(self, remove: Pos) -> Self {
        Self { remove: Some(remove), ..self }
    }

    #[inline]
    pub fn is_placement(&self) -> bool {
        self.from.is_none()
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.remove.is_some()
    }

    /// The placement or slide half of the move
    #[inline]
    pub fn first_ply(&self) -> Ply {
        match self.from {
            None => Ply::Place(self.to),
            Some(from) => Ply::Slide { from, to: self.to },
        }
    }

    /// Plies in the order they are played
    pub fn plies(&self) -> impl Iterator<Item = Ply> {
        std::iter::once(self.first_ply()).chain(self.remove.map(Ply::Remove))
    }

    /// Depth the move consumes in the search
    #[inline]
    pub fn ply_count(&self) -> u8 {
        1 + u8::from(self.remove.is_some())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from {
            None => write!(f, "@{}", self.to)?,
            Some(from) => write!(f, "{}-{}", from, self.to)?,
        }
        if let Some(remove) = self.remove {
            write!(f, "x{}", remove)?;
        }
        Ok(())
    }
}
