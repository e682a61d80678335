//! Heuristic evaluation function for Nine Men's Morris positions
//!
//! This module provides the static evaluation used at search leaves.
//! It evaluates board positions based on:
//! - Loss detection (out of material, blocked)
//! - Material (pieces on the board plus pieces in hand)
//! - Complete and open mills
//! - Mobility
//! - An owed capture

use crate::board::{BoardState, Stone};

use super::patterns::{material_score, PatternScore};

/// Evaluate the board from the perspective of the given color.
///
/// Returns a score where:
/// - Positive values indicate advantage for `color`
/// - `PatternScore::WIN` means `color` has already won
/// - `-PatternScore::WIN` means `color` has already lost
///
/// Symmetric: `evaluate(board, White) == -evaluate(board, Black)`.
#[must_use]
pub fn evaluate(board: &BoardState, color: Stone) -> i32 {
    let opponent = color.opponent();

    if let Some(winner) = decided_winner(board) {
        return if winner == color { PatternScore::WIN } else { -PatternScore::WIN };
    }

    let material = material_score(total_pieces(board, color), total_pieces(board, opponent));

    let mills = (board.mill_count(color) as i32 - board.mill_count(opponent) as i32)
        * PatternScore::MILL;
    let open_mills = (board.open_mill_count(color) as i32
        - board.open_mill_count(opponent) as i32)
        * PatternScore::OPEN_MILL;

    let mobility = (capped_mobility(board, color) - capped_mobility(board, opponent))
        * PatternScore::MOBILITY;

    let pending = if board.pending_removal() {
        if board.current_player() == color {
            PatternScore::PENDING_CAPTURE
        } else {
            -PatternScore::PENDING_CAPTURE
        }
    } else {
        0
    };

    material + mills + open_mills + mobility + pending
}

/// Winner of a position that is already decided.
///
/// The side to move loses if it is out of material or has nothing to play.
/// The side that just moved loses only on material: being blocked matters
/// once it is their turn.
fn decided_winner(board: &BoardState) -> Option<Stone> {
    let to_move = board.current_player();
    if board.has_current_player_lost() {
        Some(to_move.opponent())
    } else if board.is_out_of_material(to_move.opponent()) {
        Some(to_move)
    } else {
        None
    }
}

#[inline]
fn total_pieces(board: &BoardState, color: Stone) -> u8 {
    board.on_board(color) + board.in_hand(color)
}

#[inline]
fn capped_mobility(board: &BoardState, color: Stone) -> i32 {
    board.mobility(color).min(PatternScore::MOBILITY_CAP) as i32
}
