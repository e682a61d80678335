//! Move and ply validation

use crate::board::{are_adjacent, neighbors, BoardState, Move, Phase, Ply, Stone, POINT_COUNT};

impl BoardState {
    /// Check a single ply for the current player.
    ///
    /// While a capture is owed only [`Ply::Remove`] is legal, and only on a
    /// piece [`BoardState::can_remove`] allows. Otherwise the target must be
    /// empty and the ply must suit the mover's phase: placing, sliding to a
    /// neighbour, or flying anywhere.
    pub fn is_ply_valid(&self, ply: Ply) -> bool {
        let player = self.current_player();
        match ply {
            Ply::Remove(at) => self.pending_removal() && self.can_remove(at),
            _ if self.pending_removal() => false,
            Ply::Place(to) => self.is_empty(to) && self.phase(player) == Phase::Placing,
            Ply::Slide { from, to } => {
                if !self.is_empty(to) || self.position_state(from) != player {
                    return false;
                }
                match self.phase(player) {
                    Phase::Placing => false,
                    Phase::Moving => are_adjacent(from, to),
                    Phase::Flying => true,
                }
            }
        }
    }

    /// Check a full move for the current player.
    ///
    /// The placement or slide must be legal on its own. If it closes a mill
    /// while the opponent has pieces on the board, the move must carry a
    /// capture that [`BoardState::can_remove`] allows; otherwise it must not
    /// carry one. No full move is valid while a capture is already owed.
    pub fn is_move_valid(&self, mv: &Move) -> bool {
        if !self.is_ply_valid(mv.first_ply()) {
            return false;
        }

        match (self.requires_capture(mv), mv.remove) {
            (true, Some(remove)) => self.can_remove(remove),
            (false, None) => true,
            _ => false,
        }
    }

    /// The placement or slide of `mv` closes a mill that earns a capture.
    ///
    /// Front ends use this to ask for the piece to remove before committing.
    pub fn requires_capture(&self, mv: &Move) -> bool {
        let player = self.current_player();
        self.on_board(player.opponent()) > 0
            && self.does_piece_complete_mill(mv.from, mv.to, player)
    }

    /// Is `color` allowed to move at all (ignoring whose turn it is)?
    pub(crate) fn has_any_move(&self, color: Stone) -> bool {
        match self.phase(color) {
            Phase::Placing | Phase::Flying => (self.stone_count() as usize) < POINT_COUNT,
            Phase::Moving => self
                .stones(color)
                .any(|from| neighbors(from).iter().any(|&to| self.is_empty(to))),
        }
    }
}
