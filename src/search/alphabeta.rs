//! Alpha-Beta search with iterative deepening
//!
//! This module implements the search behind the computer player. It uses
//! negamax with alpha-beta pruning over single plies, so a placement that
//! closes a mill and the capture that follows are two levels of the tree.
//!
//! # Features
//!
//! - Iterative deepening, with the previous iteration's best move tried first
//! - Mill-forming plies ordered ahead of quiet ones
//! - Depth and wall-clock bounds
//! - Cancellation from another thread through a [`SearchHandle`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use morris::board::BoardState;
//! use morris::search::AlphaBetaPruning;
//!
//! let board = BoardState::new();
//! let mut search = AlphaBetaPruning::new(&board, 3, Duration::from_secs(5));
//!
//! let best = search.search_for_best_move().expect("opening has moves");
//! assert!(board.is_move_valid(&best));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};

use crate::board::{BoardState, Move, Ply};
use crate::eval::{evaluate, PatternScore};

/// Infinity score for alpha-beta bounds
const INF: i32 = PatternScore::WIN + 1;

/// Scores at or beyond this magnitude are decided games
const MATE_THRESHOLD: i32 = PatternScore::WIN - u8::MAX as i32;

/// Nodes between wall-clock checks (power of two)
const TIME_CHECK_INTERVAL: u64 = 256;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first ply tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found; `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Score of the best move from the mover's point of view
    pub score: i32,
    /// Deepest fully completed iteration (0 if none finished)
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
    /// Search diagnostics
    pub stats: SearchStats,
}

/// Cancels a running search from another thread.
///
/// Cheap to clone; every clone shares the same flag.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    stop: Arc<AtomicBool>,
}

impl SearchHandle {
    /// Ask the search to stop; it returns its best move so far shortly after
    pub fn terminate(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_terminated(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Best root move of one iteration
struct RootOutcome {
    best_move: Option<Move>,
    score: i32,
}

/// Depth- and time-bounded alpha-beta searcher over a private copy of the
/// root position.
///
/// Termination is sticky: once [`AlphaBetaPruning::terminate_search`] (or a
/// handle) has fired, later searches on the same object return their
/// fallback move immediately.
#[derive(Debug)]
pub struct AlphaBetaPruning {
    root: BoardState,
    max_depth: u8,
    max_time: Duration,
    stop: Arc<AtomicBool>,
    /// Wall-clock limit hit during the current search
    timed_out: bool,
    start_time: Instant,
    nodes: u64,
    stats: SearchStats,
}

impl AlphaBetaPruning {
    /// Create a searcher for `board` (copied), bounded by `max_depth` plies
    /// and `max_time`.
    #[must_use]
    pub fn new(board: &BoardState, max_depth: u8, max_time: Duration) -> Self {
        Self {
            root: board.clone(),
            max_depth,
            max_time,
            stop: Arc::new(AtomicBool::new(false)),
            timed_out: false,
            start_time: Instant::now(),
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    pub fn set_max_depth(&mut self, max_depth: u8) {
        self.max_depth = max_depth;
    }

    pub fn set_max_time(&mut self, max_time: Duration) {
        self.max_time = max_time;
    }

    /// Replace the position searched next
    pub fn set_root(&mut self, board: &BoardState) {
        self.root = board.clone();
    }

    pub fn root(&self) -> &BoardState {
        &self.root
    }

    /// Handle for cancelling this search from another thread
    #[must_use]
    pub fn handle(&self) -> SearchHandle {
        SearchHandle { stop: Arc::clone(&self.stop) }
    }

    /// Stop the search; safe to call while it runs on another thread
    pub fn terminate_search(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Best move for the side to move, or `None` if it has no legal move.
    ///
    /// Blocks until the depth bound is reached, the time bound expires or the
    /// search is terminated. Always returns a legal move when one exists.
    pub fn search_for_best_move(&mut self) -> Option<Move> {
        self.search().best_move
    }

    /// Iterative deepening search from depth 1 up to the depth bound.
    ///
    /// The result is that of the deepest completed iteration. If none
    /// completed, the best move found so far in the first iteration is used,
    /// and failing that the first legal move in search order.
    #[instrument(skip(self), fields(max_depth = self.max_depth, max_time_ms = self.max_time.as_millis() as u64))]
    pub fn search(&mut self) -> SearchResult {
        self.begin();
        let mut board = self.root.clone();
        let mut moves = self.ordered_root_moves(&board);

        let mut best_result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            stats: SearchStats::default(),
        };
        if moves.is_empty() {
            debug!("no legal move at root");
            return best_result;
        }

        for depth in 1..=self.max_depth.max(1) {
            if self.should_stop() {
                break;
            }

            let outcome = self.search_root(&mut board, &moves, depth);

            if self.should_stop() {
                // Partial iterations only count if nothing completed yet
                if best_result.best_move.is_none() && outcome.best_move.is_some() {
                    best_result.best_move = outcome.best_move;
                    best_result.score = outcome.score;
                }
                break;
            }

            best_result.best_move = outcome.best_move;
            best_result.score = outcome.score;
            best_result.depth = depth;

            if let Some(best) = outcome.best_move {
                promote(&mut moves, best);
                debug!(depth, score = outcome.score, best = %best, nodes = self.nodes, "depth complete");
            }

            if outcome.score.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        if best_result.best_move.is_none() {
            best_result.best_move = moves.first().copied();
        }
        self.finish(best_result)
    }

    /// Single fixed-depth search without iterative deepening.
    ///
    /// Still honours the time bound and termination, in which case the
    /// result may be partial.
    pub fn search_at_depth(&mut self, depth: u8) -> SearchResult {
        self.begin();
        let mut board = self.root.clone();
        let moves = self.ordered_root_moves(&board);

        let mut outcome = RootOutcome { best_move: None, score: 0 };
        let mut completed = 0;
        if !moves.is_empty() {
            outcome = self.search_root(&mut board, &moves, depth.max(1));
            if !self.should_stop() {
                completed = depth.max(1);
            }
        }

        let result = SearchResult {
            best_move: outcome.best_move.or_else(|| moves.first().copied()),
            score: outcome.score,
            depth: completed,
            nodes: 0,
            stats: SearchStats::default(),
        };
        self.finish(result)
    }

    fn begin(&mut self) {
        self.timed_out = false;
        self.start_time = Instant::now();
        self.nodes = 0;
        self.stats = SearchStats::default();
    }

    fn finish(&self, mut result: SearchResult) -> SearchResult {
        result.nodes = self.nodes;
        result.stats = self.stats.clone();
        debug!(
            best = ?result.best_move.map(|mv| mv.to_string()),
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            beta_cutoffs = result.stats.beta_cutoffs,
            first_move_cutoff_pct = result.stats.first_move_rate(),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            terminated = self.stop.load(Ordering::Relaxed),
            timed_out = self.timed_out,
            "search finished"
        );
        result
    }

    /// Check if search should stop (time limit or termination).
    #[inline]
    fn should_stop(&self) -> bool {
        self.timed_out || self.stop.load(Ordering::Relaxed)
    }

    /// Check time and latch the timeout if exceeded.
    #[inline]
    fn check_time(&mut self) {
        if !self.timed_out && self.start_time.elapsed() >= self.max_time {
            trace!(nodes = self.nodes, "time limit reached");
            self.timed_out = true;
        }
    }

    /// Root-level search over full moves with a full window.
    ///
    /// A capture move spends two plies of the depth. Ties keep the earlier
    /// move, so the previous iteration's choice survives equal scores.
    fn search_root(&mut self, board: &mut BoardState, moves: &[Move], depth: u8) -> RootOutcome {
        let mut best_move = None;
        let mut best_score = -INF;
        let mut alpha = -INF;
        let beta = INF;

        for mv in moves {
            let undos: Vec<_> = mv.plies().map(|ply| board.make_ply(ply)).collect();
            let remaining = depth.saturating_sub(mv.ply_count());
            let score = -self.alpha_beta(board, remaining, mv.ply_count(), -beta, -alpha);
            for undo in undos.into_iter().rev() {
                board.unmake_ply(undo);
            }

            if self.should_stop() {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(*mv);
            }
            alpha = alpha.max(score);
        }

        RootOutcome { best_move, score: best_score }
    }

    /// Negamax over plies.
    ///
    /// Scores are from the point of view of the side to move at this node. A
    /// ply that leaves the same side to move (a mill that owes a capture) is
    /// searched without negating. Decided positions score `WIN` minus the
    /// distance from the root, so faster wins and slower losses are preferred.
    fn alpha_beta(
        &mut self,
        board: &mut BoardState,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if self.nodes & (TIME_CHECK_INTERVAL - 1) == 0 {
            self.check_time();
        }
        if self.should_stop() {
            return 0;
        }

        let to_move = board.current_player();
        if board.has_current_player_lost() {
            return -(PatternScore::WIN - i32::from(ply));
        }
        if board.is_out_of_material(to_move.opponent()) {
            return PatternScore::WIN - i32::from(ply);
        }

        if depth == 0 {
            return evaluate(board, to_move);
        }

        let plies = ordered_plies(board);
        let mut best_score = -INF;

        for (i, &next) in plies.iter().enumerate() {
            let undo = board.make_ply(next);
            let score = if board.current_player() == to_move {
                self.alpha_beta(board, depth - 1, ply.saturating_add(1), alpha, beta)
            } else {
                -self.alpha_beta(board, depth - 1, ply.saturating_add(1), -beta, -alpha)
            };
            board.unmake_ply(undo);

            if self.should_stop() {
                return 0;
            }

            if score > best_score {
                best_score = score;
            }
            if score >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
            alpha = alpha.max(score);
        }

        best_score
    }

    /// Legal root moves with captures first, then generation order.
    fn ordered_root_moves(&self, board: &BoardState) -> Vec<Move> {
        let mut moves = board.legal_moves();
        moves.sort_by_key(|mv| !mv.is_capture());
        moves
    }
}

/// Legal plies with mill-forming placements and slides first.
///
/// The sort is stable, so within each group plies stay in ascending point
/// order.
fn ordered_plies(board: &BoardState) -> Vec<Ply> {
    let player = board.current_player();
    let mut plies = board.legal_plies();
    plies.sort_by_key(|&ply| {
        let forms_mill = match ply {
            Ply::Place(to) => board.does_piece_complete_mill(None, to, player),
            Ply::Slide { from, to } => board.does_piece_complete_mill(Some(from), to, player),
            Ply::Remove(_) => false,
        };
        !forms_mill
    });
    plies
}

/// Move `best` to the front, keeping the order of the rest
fn promote(moves: &mut [Move], best: Move) {
    if let Some(index) = moves.iter().position(|&mv| mv == best) {
        moves[..=index].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Pos, Stone};
    use std::thread;

    fn pos(i: u8) -> Pos {
        Pos::new(i)
    }

    /// Plain negamax without pruning, same depth accounting as the searcher
    fn reference_root(board: &mut BoardState, depth: u8) -> i32 {
        let mut best = -INF;
        for mv in board.legal_moves() {
            let undos: Vec<_> = mv.plies().map(|ply| board.make_ply(ply)).collect();
            let score =
                -reference_negamax(board, depth.saturating_sub(mv.ply_count()), mv.ply_count());
            for undo in undos.into_iter().rev() {
                board.unmake_ply(undo);
            }
            best = best.max(score);
        }
        best
    }

    fn reference_negamax(board: &mut BoardState, depth: u8, ply: u8) -> i32 {
        let to_move = board.current_player();
        if board.has_current_player_lost() {
            return -(PatternScore::WIN - i32::from(ply));
        }
        if board.is_out_of_material(to_move.opponent()) {
            return PatternScore::WIN - i32::from(ply);
        }
        if depth == 0 {
            return evaluate(board, to_move);
        }
        let mut best = -INF;
        for next in board.legal_plies() {
            let undo = board.make_ply(next);
            let score = if board.current_player() == to_move {
                reference_negamax(board, depth - 1, ply + 1)
            } else {
                -reference_negamax(board, depth - 1, ply + 1)
            };
            board.unmake_ply(undo);
            best = best.max(score);
        }
        best
    }

    fn midgame() -> BoardState {
        BoardState::from_position(&[0, 4, 9, 10, 16], &[2, 5, 13, 14, 22], 9, 9, Stone::White)
            .unwrap()
    }

    #[test]
    fn test_search_empty_board() {
        let board = BoardState::new();
        let mut search = AlphaBetaPruning::new(&board, 2, Duration::from_secs(10));

        let result = search.search();
        let best = result.best_move.expect("opening has moves");
        assert!(board.is_move_valid(&best));
        assert_eq!(result.depth, 2);
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let board = midgame();
        for depth in 1..=4 {
            let mut search = AlphaBetaPruning::new(&board, depth, Duration::from_secs(60));
            let result = search.search_at_depth(depth);
            let expected = reference_root(&mut board.clone(), depth);
            assert_eq!(result.score, expected, "score mismatch at depth {}", depth);
            assert_eq!(result.depth, depth);
            assert!(board.is_move_valid(&result.best_move.unwrap()));
        }
    }

    #[test]
    fn test_alpha_beta_matches_minimax_while_placing() {
        let board =
            BoardState::from_position(&[0, 1, 10], &[9, 21, 4], 3, 3, Stone::White).unwrap();
        let depth = 3;
        let mut search = AlphaBetaPruning::new(&board, depth, Duration::from_secs(60));
        let result = search.search_at_depth(depth);
        assert_eq!(result.score, reference_root(&mut board.clone(), depth));
    }

    #[test]
    fn test_iterative_deepening_reaches_depth() {
        let board = midgame();
        let mut search = AlphaBetaPruning::new(&board, 3, Duration::from_secs(60));
        let result = search.search();
        assert_eq!(result.depth, 3);
        assert_eq!(result.score, reference_root(&mut board.clone(), 3));
        assert!(board.is_move_valid(&result.best_move.unwrap()));
    }

    #[test]
    fn test_search_takes_mill_that_wins() {
        // Black has three pieces; White sliding 14 -> 2 closes 0-1-2 and the
        // capture leaves Black with two
        let board =
            BoardState::from_position(&[0, 1, 4, 9, 14], &[3, 19, 23], 9, 9, Stone::White)
                .unwrap();
        let mut search = AlphaBetaPruning::new(&board, 3, Duration::from_secs(10));
        let result = search.search();
        let best = result.best_move.unwrap();
        assert_eq!(best.from, Some(pos(14)));
        assert_eq!(best.to, pos(2));
        assert!(best.is_capture());
        assert!(result.score >= MATE_THRESHOLD);
    }

    #[test]
    fn test_no_legal_move_returns_none() {
        let board = BoardState::from_position(
            &[0, 2, 22, 19, 16],
            &[1, 9, 14, 21, 23, 18, 20, 15, 17],
            9,
            9,
            Stone::White,
        )
        .unwrap();
        let mut search = AlphaBetaPruning::new(&board, 4, Duration::from_secs(1));
        assert_eq!(search.search_for_best_move(), None);
    }

    #[test]
    fn test_cramped_position_returns_legal_move() {
        // White's only free point is 1, reachable from 0 and 2
        let board = BoardState::from_position(
            &[0, 2, 22, 19, 16],
            &[9, 14, 21, 23, 18, 20, 15, 17, 3],
            9,
            9,
            Stone::White,
        )
        .unwrap();
        let legal = board.legal_moves();
        assert_eq!(legal.len(), 2);
        let mut search = AlphaBetaPruning::new(&board, 1, Duration::from_secs(1));
        let best = search.search_for_best_move().unwrap();
        assert!(legal.contains(&best));
    }

    #[test]
    fn test_time_limit_bounds_search() {
        let board = BoardState::new();
        let mut search = AlphaBetaPruning::new(&board, 40, Duration::from_millis(100));

        let start = Instant::now();
        let best = search.search_for_best_move();
        let elapsed = start.elapsed();

        assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
        assert!(board.is_move_valid(&best.unwrap()));
    }

    #[test]
    fn test_terminate_from_another_thread() {
        let board = BoardState::new();
        let mut search = AlphaBetaPruning::new(&board, 40, Duration::from_secs(60));
        let handle = search.handle();

        let worker = thread::spawn(move || {
            let best = search.search_for_best_move();
            (best, Instant::now())
        });

        thread::sleep(Duration::from_millis(50));
        let terminated_at = Instant::now();
        handle.terminate();
        let (best, returned_at) = worker.join().unwrap();

        assert!(
            returned_at.duration_since(terminated_at) < Duration::from_millis(200),
            "search took {:?} to stop",
            returned_at.duration_since(terminated_at)
        );
        assert!(board.is_move_valid(&best.unwrap()));
    }

    #[test]
    fn test_termination_is_sticky() {
        let board = midgame();
        let mut search = AlphaBetaPruning::new(&board, 6, Duration::from_secs(60));
        search.terminate_search();
        assert!(search.handle().is_terminated());

        let result = search.search();
        assert_eq!(result.depth, 0);
        let best = result.best_move.unwrap();
        assert!(board.is_move_valid(&best));
    }

    #[test]
    fn test_set_root_switches_position() {
        let mut search = AlphaBetaPruning::new(&BoardState::new(), 2, Duration::from_secs(10));
        let board = midgame();
        search.set_root(&board);
        assert_eq!(search.root(), &board);
        let best = search.search_for_best_move().unwrap();
        assert!(board.is_move_valid(&best));
    }

    #[test]
    fn test_search_does_not_touch_caller_board() {
        let board = midgame();
        let before = board.clone();
        let mut search = AlphaBetaPruning::new(&board, 3, Duration::from_secs(10));
        let _ = search.search();
        assert_eq!(board, before);
        assert_eq!(search.root(), &before);
    }

    #[test]
    fn test_promote_keeps_order() {
        let mut moves = vec![
            Move::placement(pos(0)),
            Move::placement(pos(1)),
            Move::placement(pos(2)),
        ];
        promote(&mut moves, Move::placement(pos(2)));
        assert_eq!(
            moves,
            vec![Move::placement(pos(2)), Move::placement(pos(0)), Move::placement(pos(1))]
        );
    }

    #[test]
    fn test_first_move_rate() {
        assert_eq!(SearchStats::default().first_move_rate(), 0.0);
        let stats = SearchStats { beta_cutoffs: 8, first_move_cutoffs: 6 };
        assert_eq!(stats.first_move_rate(), 75.0);
    }
}
