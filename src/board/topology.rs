//! Static board graph: adjacency and mill lines
//!
//! ```text
//!  0-----------1-----------2
//!  |   3-------4-------5   |
//!  |   |   6---7---8   |   |
//!  9---10--11      12--13--14
//!  |   |   15--16--17  |   |
//!  |   18------19------20  |
//! 21----------22----------23
//! ```

use super::{Pos, POINT_COUNT};

/// Three points that form a mill when owned by one player
pub type MillLine = [Pos; 3];

const fn p(index: u8) -> Pos {
    Pos(index)
}

/// Neighbours of every point, ascending
static NEIGHBORS: [&[Pos]; POINT_COUNT] = [
    &[p(1), p(9)],
    &[p(0), p(2), p(4)],
    &[p(1), p(14)],
    &[p(4), p(10)],
    &[p(1), p(3), p(5), p(7)],
    &[p(4), p(13)],
    &[p(7), p(11)],
    &[p(4), p(6), p(8)],
    &[p(7), p(12)],
    &[p(0), p(10), p(21)],
    &[p(3), p(9), p(11), p(18)],
    &[p(6), p(10), p(15)],
    &[p(8), p(13), p(17)],
    &[p(5), p(12), p(14), p(20)],
    &[p(2), p(13), p(23)],
    &[p(11), p(16)],
    &[p(15), p(17), p(19)],
    &[p(12), p(16)],
    &[p(10), p(19)],
    &[p(16), p(18), p(20), p(22)],
    &[p(13), p(19)],
    &[p(9), p(22)],
    &[p(19), p(21), p(23)],
    &[p(14), p(22)],
];

/// All 16 mill lines: eight horizontal, then eight vertical
pub static MILL_LINES: [MillLine; 16] = [
    [p(0), p(1), p(2)],
    [p(3), p(4), p(5)],
    [p(6), p(7), p(8)],
    [p(9), p(10), p(11)],
    [p(12), p(13), p(14)],
    [p(15), p(16), p(17)],
    [p(18), p(19), p(20)],
    [p(21), p(22), p(23)],
    [p(0), p(9), p(21)],
    [p(3), p(10), p(18)],
    [p(6), p(11), p(15)],
    [p(1), p(4), p(7)],
    [p(16), p(19), p(22)],
    [p(8), p(12), p(17)],
    [p(5), p(13), p(20)],
    [p(2), p(14), p(23)],
];

/// Indices into `MILL_LINES` for each point (every point lies on two lines)
static LINES_BY_POINT: [[u8; 2]; POINT_COUNT] = [
    [0, 8],
    [0, 11],
    [0, 15],
    [1, 9],
    [1, 11],
    [1, 14],
    [2, 10],
    [2, 11],
    [2, 13],
    [3, 8],
    [3, 9],
    [3, 10],
    [4, 13],
    [4, 14],
    [4, 15],
    [5, 10],
    [5, 12],
    [5, 13],
    [6, 9],
    [6, 12],
    [6, 14],
    [7, 8],
    [7, 12],
    [7, 15],
];

/// Points reachable by one slide from `pos`
#[inline]
pub fn neighbors(pos: Pos) -> &'static [Pos] {
    NEIGHBORS[pos.to_index()]
}

#[inline]
pub fn are_adjacent(a: Pos, b: Pos) -> bool {
    neighbors(a).contains(&b)
}

/// Mill lines passing through `pos`
#[inline]
pub fn mill_lines_containing(pos: Pos) -> impl Iterator<Item = &'static MillLine> {
    LINES_BY_POINT[pos.to_index()]
        .iter()
        .map(|&line| &MILL_LINES[line as usize])
}
