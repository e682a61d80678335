//! Board state with per-player piece accounting

use derive_more::{Display, Error};

use super::{Move, Phase, Ply, Pos, Stone, FLYING_THRESHOLD, PIECES_PER_PLAYER, POINT_COUNT};

/// Game state: occupancy, piece counts, side to move and owed capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    cells: [Stone; POINT_COUNT],
    /// Pieces placed so far by White and Black
    placed: [u8; 2],
    /// Pieces currently on the board
    on_board: [u8; 2],
    current: Stone,
    /// The current player closed a mill and still has to capture
    pending_removal: bool,
}

/// Record needed to take back one ply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    ply: Ply,
    player: Stone,
    pending_removal: bool,
}

/// Rejected set-up position
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    #[display("point {index} is off the board")]
    PointOutOfRange { index: u8 },
    #[display("point {pos} is occupied twice")]
    PointOccupiedTwice { pos: Pos },
    #[display("{color:?} has {on_board} pieces on the board but placed {placed}")]
    InconsistentCounts { color: Stone, placed: u8, on_board: u8 },
    #[display("side to move must be White or Black")]
    NoSideToMove,
}

impl BoardState {
    /// Empty board, White to place first
    pub fn new() -> Self {
        Self {
            cells: [Stone::Empty; POINT_COUNT],
            placed: [0; 2],
            on_board: [0; 2],
            current: Stone::White,
            pending_removal: false,
        }
    }

    /// Set up an arbitrary position (puzzles, analysis, tests).
    ///
    /// `placed_white`/`placed_black` count pieces already brought into play,
    /// including captured ones; each must be at least the number on the board
    /// and at most nine.
    pub fn from_position(
        white: &[u8],
        black: &[u8],
        placed_white: u8,
        placed_black: u8,
        to_move: Stone,
    ) -> Result<Self, BoardError> {
        if to_move == Stone::Empty {
            return Err(BoardError::NoSideToMove);
        }

        let mut board = Self::new();
        board.current = to_move;

        for (stones, color, placed) in [
            (white, Stone::White, placed_white),
            (black, Stone::Black, placed_black),
        ] {
            for &index in stones {
                let pos = Pos::try_new(index).ok_or(BoardError::PointOutOfRange { index })?;
                if board.cells[pos.to_index()] != Stone::Empty {
                    return Err(BoardError::PointOccupiedTwice { pos });
                }
                board.cells[pos.to_index()] = color;
            }

            if placed > PIECES_PER_PLAYER || stones.len() > usize::from(placed) {
                let on_board = stones.len().min(usize::from(u8::MAX)) as u8;
                return Err(BoardError::InconsistentCounts { color, placed, on_board });
            }
            board.placed[color.index()] = placed;
            board.on_board[color.index()] = stones.len() as u8;
        }

        Ok(board)
    }

    /// Stone at a point
    #[inline]
    pub fn position_state(&self, pos: Pos) -> Stone {
        self.cells[pos.to_index()]
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.cells[pos.to_index()] == Stone::Empty
    }

    #[inline]
    pub fn current_player(&self) -> Stone {
        self.current
    }

    #[inline]
    pub fn other_player(&self) -> Stone {
        self.current.opponent()
    }

    /// A capture is owed by the current player before the turn passes
    #[inline]
    pub fn pending_removal(&self) -> bool {
        self.pending_removal
    }

    /// Pieces `color` has brought into play so far
    #[inline]
    pub fn placed(&self, color: Stone) -> u8 {
        match color {
            Stone::Empty => 0,
            _ => self.placed[color.index()],
        }
    }

    /// Pieces `color` has on the board
    #[inline]
    pub fn on_board(&self, color: Stone) -> u8 {
        match color {
            Stone::Empty => 0,
            _ => self.on_board[color.index()],
        }
    }

    /// Pieces `color` still has to place
    #[inline]
    pub fn in_hand(&self, color: Stone) -> u8 {
        match color {
            Stone::Empty => 0,
            _ => PIECES_PER_PLAYER - self.placed[color.index()],
        }
    }

    /// Phase `color` is in, derived from the counts
    #[inline]
    pub fn phase(&self, color: Stone) -> Phase {
        if self.placed(color) < PIECES_PER_PLAYER {
            Phase::Placing
        } else if self.on_board(color) > FLYING_THRESHOLD {
            Phase::Moving
        } else {
            Phase::Flying
        }
    }

    /// Points holding `color`, ascending
    pub fn stones(&self, color: Stone) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&pos| self.cells[pos.to_index()] == color)
    }

    /// Apply a validated move: the placement or slide, then its capture.
    ///
    /// The turn passes once the whole move is on the board. Callers check
    /// [`BoardState::is_move_valid`] first; debug builds assert it.
    pub fn make_move(&mut self, mv: &Move) {
        debug_assert!(self.is_move_valid(mv), "make_move on invalid move {}", mv);
        for ply in mv.plies() {
            self.make_ply(ply);
        }
    }

    /// Apply one ply and return what is needed to take it back.
    ///
    /// Closing a mill keeps the turn with the mover and sets the pending
    /// capture, unless the opponent has nothing on the board to take.
    pub fn make_ply(&mut self, ply: Ply) -> Undo {
        let player = self.current;
        let opponent = player.opponent();
        let undo = Undo { ply, player, pending_removal: self.pending_removal };

        let to = match ply {
            Ply::Place(to) => {
                self.cells[to.to_index()] = player;
                self.placed[player.index()] += 1;
                self.on_board[player.index()] += 1;
                to
            }
            Ply::Slide { from, to } => {
                self.cells[from.to_index()] = Stone::Empty;
                self.cells[to.to_index()] = player;
                to
            }
            Ply::Remove(at) => {
                self.cells[at.to_index()] = Stone::Empty;
                self.on_board[opponent.index()] -= 1;
                self.pending_removal = false;
                self.current = opponent;
                return undo;
            }
        };

        if self.is_in_mill(to) && self.on_board(opponent) > 0 {
            self.pending_removal = true;
        } else {
            self.current = opponent;
        }
        undo
    }

    /// Take back the ply recorded in `undo`; plies unwind in reverse order
    pub fn unmake_ply(&mut self, undo: Undo) {
        let player = undo.player;
        match undo.ply {
            Ply::Place(to) => {
                self.cells[to.to_index()] = Stone::Empty;
                self.placed[player.index()] -= 1;
                self.on_board[player.index()] -= 1;
            }
            Ply::Slide { from, to } => {
                self.cells[to.to_index()] = Stone::Empty;
                self.cells[from.to_index()] = player;
            }
            Ply::Remove(at) => {
                let opponent = player.opponent();
                self.cells[at.to_index()] = opponent;
                self.on_board[opponent.index()] += 1;
            }
        }
        self.current = player;
        self.pending_removal = undo.pending_removal;
    }

    /// Total pieces on the board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        u32::from(self.on_board[0]) + u32::from(self.on_board[1])
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
