//! Pattern scores for Nine Men's Morris evaluation
//!
//! Weights for the signals the evaluator reads off a position. Material
//! dominates, closed and open mills come next, mobility breaks ties.

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Side to move has lost (or the opponent is out of material)
    pub const WIN: i32 = 1_000_000;

    /// One piece on the board or still in hand
    pub const PIECE: i32 = 120;
    /// A complete mill
    pub const MILL: i32 = 40;
    /// Two own pieces on a line with the third point empty
    pub const OPEN_MILL: i32 = 15;
    /// Per available placement or slide
    pub const MOBILITY: i32 = 5;
    /// Mobility counts above this add nothing (flying pieces reach everything)
    pub const MOBILITY_CAP: u32 = 20;
    /// A capture is owed to this side: about a piece
    pub const PENDING_CAPTURE: i32 = 110;
}

/// Material differential from total pieces (on the board plus in hand).
///
/// Grows sharply as a side nears the three-piece floor, where every capture
/// matters more. MUST be symmetric for negamax:
/// `material_score(a, b) == -material_score(b, a)`.
pub fn material_score(my_pieces: u8, opp_pieces: u8) -> i32 {
    // Penalty for being down to the last few pieces; deepens by a growing
    // step so each piece is worth more the fewer a side has left
    const SCARCITY: [i32; 10] = [-280, -210, -150, -100, -60, -30, -10, 0, 0, 0];

    let value = |pieces: u8| {
        let pieces = pieces.min(9);
        i32::from(pieces) * PatternScore::PIECE + SCARCITY[usize::from(pieces)]
    };
    value(my_pieces) - value(opp_pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_score_hierarchy() {
        assert!(PatternScore::WIN > PatternScore::PIECE * 20);
        assert!(PatternScore::PIECE > PatternScore::MILL);
        assert!(PatternScore::MILL > PatternScore::OPEN_MILL);
        assert!(PatternScore::OPEN_MILL > PatternScore::MOBILITY);
    }

    #[test]
    fn test_material_score_zero() {
        assert_eq!(material_score(9, 9), 0);
        assert_eq!(material_score(3, 3), 0);
    }

    #[test]
    fn test_material_score_advantage() {
        assert!(material_score(9, 8) > 0);
        assert!(material_score(8, 9) < 0);
    }

    #[test]
    fn test_capture_near_floor_is_worth_more() {
        let early = material_score(9, 8);
        let late = material_score(5, 4);
        assert!(late > early, "late={} early={}", late, early);
    }

    #[test]
    fn test_piece_value_rises_toward_floor() {
        // Gaining the n-th piece is worth at least as much as gaining the (n+1)-th
        let gain = |n: u8| material_score(n, 0) - material_score(n - 1, 0);
        for n in 2..=9u8 {
            assert!(gain(n - 1) >= gain(n), "gain({})={} gain({})={}", n - 1, gain(n - 1), n, gain(n));
        }
        assert_eq!(gain(9), PatternScore::PIECE);
        assert!(gain(4) > gain(7));
    }

    #[test]
    fn test_material_score_negamax_symmetry() {
        for a in 0..=9u8 {
            for b in 0..=9u8 {
                assert_eq!(
                    material_score(a, b),
                    -material_score(b, a),
                    "Negamax symmetry violated for ({}, {})",
                    a,
                    b
                );
            }
        }
    }
}
