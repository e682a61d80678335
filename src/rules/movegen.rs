//! Legal move generation and loss detection

use crate::board::{
    neighbors, BoardState, Move, Phase, Ply, Pos, Stone, FLYING_THRESHOLD, PIECES_PER_PLAYER,
    POINT_COUNT,
};

impl BoardState {
    /// Legal plies for the current player, in ascending point order.
    ///
    /// With a capture owed these are the allowed removals; otherwise the
    /// placements or slides of the mover's phase.
    pub fn legal_plies(&self) -> Vec<Ply> {
        if self.pending_removal() {
            return Pos::all()
                .filter(|&at| self.can_remove(at))
                .map(Ply::Remove)
                .collect();
        }
        self.step_plies(self.current_player())
    }

    /// Legal full moves for the current player.
    ///
    /// A placement or slide that closes a mill appears once per allowed
    /// capture. Empty while a capture is owed.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.pending_removal() {
            return Vec::new();
        }

        let player = self.current_player();
        let captures: Vec<Pos> = Pos::all().filter(|&at| self.can_remove(at)).collect();
        let mut moves = Vec::with_capacity(32);

        for ply in self.step_plies(player) {
            let mv = match ply {
                Ply::Place(to) => Move::placement(to),
                Ply::Slide { from, to } => Move::slide(from, to),
                Ply::Remove(_) => continue,
            };
            if self.requires_capture(&mv) {
                moves.extend(captures.iter().map(|&at| mv.with_capture(at)));
            } else {
                moves.push(mv);
            }
        }
        moves
    }

    /// Placements or slides `color` could play if it were their turn
    fn step_plies(&self, color: Stone) -> Vec<Ply> {
        let empties = Pos::all().filter(|&pos| self.is_empty(pos));
        match self.phase(color) {
            Phase::Placing => empties.map(Ply::Place).collect(),
            Phase::Moving => self
                .stones(color)
                .flat_map(|from| {
                    neighbors(from)
                        .iter()
                        .filter(move |&&to| self.is_empty(to))
                        .map(move |&to| Ply::Slide { from, to })
                })
                .collect(),
            Phase::Flying => {
                let targets: Vec<Pos> = empties.collect();
                self.stones(color)
                    .flat_map(|from| targets.iter().map(move |&to| Ply::Slide { from, to }))
                    .collect()
            }
        }
    }

    /// Number of placements or slides `color` has available.
    ///
    /// While placing, counts the slides the pieces already on the board would
    /// have, which is what decides how free they are once placing ends.
    pub fn mobility(&self, color: Stone) -> u32 {
        let adjacent_slides = || {
            self.stones(color)
                .map(|from| neighbors(from).iter().filter(|&&to| self.is_empty(to)).count())
                .sum::<usize>() as u32
        };
        match self.phase(color) {
            Phase::Placing | Phase::Moving => adjacent_slides(),
            Phase::Flying => {
                let empty = POINT_COUNT as u32 - self.stone_count();
                u32::from(self.on_board(color)) * empty
            }
        }
    }

    /// Reduced below three pieces after placing
    #[inline]
    pub fn is_out_of_material(&self, color: Stone) -> bool {
        self.placed(color) == PIECES_PER_PLAYER && self.on_board(color) < FLYING_THRESHOLD
    }

    /// `color` has lost: fewer than three pieces after placing, or nothing to
    /// play in their phase.
    ///
    /// A player who still owes a capture is mid-turn and has not lost.
    pub fn has_lost(&self, color: Stone) -> bool {
        if color == Stone::Empty {
            return false;
        }
        if self.is_out_of_material(color) {
            return true;
        }
        if self.pending_removal() && color == self.current_player() {
            return false;
        }
        !self.has_any_move(color)
    }

    /// The side to move has lost
    #[inline]
    pub fn has_current_player_lost(&self) -> bool {
        self.has_lost(self.current_player())
    }
}
