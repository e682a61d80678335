//! Mill detection and capture protection

use crate::board::{mill_lines_containing, BoardState, Pos, Stone, MILL_LINES};

impl BoardState {
    /// Would `player` complete a mill by moving a piece from `from` (or
    /// placing one, if `None`) to `to`?
    ///
    /// Only lines through `to` can close. The piece leaving `from` no longer
    /// counts, so sliding along a line never completes that same line. The
    /// board is not touched.
    pub fn does_piece_complete_mill(&self, from: Option<Pos>, to: Pos, player: Stone) -> bool {
        if player == Stone::Empty {
            return false;
        }
        mill_lines_containing(to).any(|line| {
            line.iter().all(|&pos| {
                pos == to || (Some(pos) != from && self.position_state(pos) == player)
            })
        })
    }

    /// The piece on `pos` is part of one of its owner's mills
    pub fn is_in_mill(&self, pos: Pos) -> bool {
        let owner = self.position_state(pos);
        owner != Stone::Empty
            && mill_lines_containing(pos)
                .any(|line| line.iter().all(|&p| self.position_state(p) == owner))
    }

    /// Every piece `player` has on the board sits in one of their mills.
    ///
    /// When this holds, protected pieces lose their protection. A player with
    /// no pieces on the board trivially satisfies it.
    pub fn are_all_pieces_from_mill(&self, player: Stone) -> bool {
        self.stones(player).all(|pos| self.is_in_mill(pos))
    }

    /// The current player may take the piece on `pos` as a capture.
    ///
    /// Opponent pieces outside mills are always fair game; pieces in mills
    /// only once every opponent piece is in a mill. Does not check that a
    /// capture is actually owed.
    pub fn can_remove(&self, pos: Pos) -> bool {
        let opponent = self.other_player();
        self.position_state(pos) == opponent
            && (!self.is_in_mill(pos) || self.are_all_pieces_from_mill(opponent))
    }

    /// Number of complete mills `player` owns
    pub fn mill_count(&self, player: Stone) -> u32 {
        MILL_LINES
            .iter()
            .filter(|line| line.iter().all(|&p| self.position_state(p) == player))
            .count() as u32
    }

    /// Lines where `player` holds two points and the third is empty
    pub fn open_mill_count(&self, player: Stone) -> u32 {
        MILL_LINES
            .iter()
            .filter(|line| {
                let own = line.iter().filter(|&&p| self.position_state(p) == player).count();
                let empty = line.iter().filter(|&&p| self.is_empty(p)).count();
                own == 2 && empty == 1
            })
            .count() as u32
    }
}
