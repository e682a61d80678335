//! Main AI Engine wrapping the alpha-beta search
//!
//! This module provides the computer player. The search follows a priority
//! system:
//!
//! 1. **No move**: the side to move is blocked
//! 2. **Only move**: a single legal move needs no search
//! 3. **Immediate win**: a capture that leaves the opponent below three pieces
//! 4. **Alpha-Beta**: iterative deepening within the configured bounds
//!
//! # Example
//!
//! ```
//! use morris::{AIEngine, BoardState};
//!
//! // Use smaller depth for faster example
//! let mut engine = AIEngine::with_config(3, 500);
//! let board = BoardState::new();
//!
//! let result = engine.get_move_with_stats(&board);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::board::{BoardState, Move, FLYING_THRESHOLD};
use crate::eval::PatternScore;
use crate::search::{AlphaBetaPruning, SearchHandle, SearchResult, SearchStats};

/// Computer strength presets: search depth in plies and time per move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Maximum search depth in plies
    #[must_use]
    pub fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 10,
            Difficulty::Hard => 15,
        }
    }

    /// Wall-clock budget per move
    #[must_use]
    pub fn time_limit(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_secs(5),
            Difficulty::Medium => Duration::from_secs(10),
            Difficulty::Hard => Duration::from_secs(15),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Type of search that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// No legal move exists
    NoMove,
    /// Exactly one legal move, played without searching
    OnlyMove,
    /// Capture that wins on material at once
    ImmediateWin,
    /// Regular alpha-beta search result
    AlphaBeta,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found; `None` only with [`SearchType::NoMove`]
    pub best_move: Option<Move>,
    /// Score from the mover's point of view
    pub score: i32,
    /// Type of search that found this move
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
    /// Deepest completed search iteration
    pub depth: u8,
    /// Pruning statistics (empty unless the search ran)
    pub stats: SearchStats,
}

impl MoveResult {
    #[inline]
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            score: -PatternScore::WIN,
            search_type: SearchType::NoMove,
            time_ms,
            nodes: 0,
            depth: 0,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn only_move(mv: Move, time_ms: u64) -> Self {
        Self {
            best_move: Some(mv),
            score: 0,
            search_type: SearchType::OnlyMove,
            time_ms,
            nodes: 0,
            depth: 0,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn immediate_win(mv: Move, time_ms: u64) -> Self {
        Self {
            best_move: Some(mv),
            score: PatternScore::WIN,
            search_type: SearchType::ImmediateWin,
            time_ms,
            nodes: 1,
            depth: 1,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn from_alphabeta(result: SearchResult, time_ms: u64) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            search_type: SearchType::AlphaBeta,
            time_ms,
            nodes: result.nodes,
            depth: result.depth,
            stats: result.stats,
        }
    }
}

/// Main AI Engine for Nine Men's Morris.
///
/// Owns one [`AlphaBetaPruning`] searcher and reuses it across calls. A
/// [`SearchHandle`] taken from [`AIEngine::handle`] cancels the current and
/// every later search of this engine.
///
/// # Example
///
/// ```
/// use morris::{AIEngine, BoardState, Difficulty};
///
/// let mut engine = AIEngine::from_difficulty(Difficulty::Easy);
/// assert_eq!(engine.max_depth(), 5);
///
/// engine.set_max_depth(2);
/// let board = BoardState::new();
/// if let Some(best_move) = engine.get_move(&board) {
///     println!("Play {}", best_move);
/// }
/// ```
#[derive(Debug)]
pub struct AIEngine {
    searcher: AlphaBetaPruning,
    max_depth: u8,
    time_limit: Duration,
}

impl AIEngine {
    /// Create an AI engine with the medium preset.
    #[must_use]
    pub fn new() -> Self {
        Self::from_difficulty(Difficulty::default())
    }

    #[must_use]
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::with_config(difficulty.depth(), difficulty.time_limit().as_millis() as u64)
    }

    /// Create an AI engine with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Maximum search depth in plies
    /// * `time_limit_ms` - Time limit in milliseconds
    #[must_use]
    pub fn with_config(max_depth: u8, time_limit_ms: u64) -> Self {
        let time_limit = Duration::from_millis(time_limit_ms);
        Self {
            searcher: AlphaBetaPruning::new(&BoardState::new(), max_depth, time_limit),
            max_depth,
            time_limit,
        }
    }

    /// Handle for cancelling searches of this engine from another thread
    #[must_use]
    pub fn handle(&self) -> SearchHandle {
        self.searcher.handle()
    }

    /// Best move for the side to move, or `None` if no legal move exists.
    #[must_use]
    pub fn get_move(&mut self, board: &BoardState) -> Option<Move> {
        self.get_move_with_stats(board).best_move
    }

    /// Get the best move with detailed search statistics.
    ///
    /// # Search Priority
    ///
    /// 1. No legal move
    /// 2. Only one legal move
    /// 3. Capture that wins on material
    /// 4. Regular alpha-beta search
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &BoardState) -> MoveResult {
        let start = Instant::now();
        let elapsed_ms = || start.elapsed().as_millis() as u64;

        let moves = board.legal_moves();
        match moves.as_slice() {
            [] => {
                debug!(player = ?board.current_player(), "no legal move");
                return MoveResult::no_move(elapsed_ms());
            }
            [only] => {
                debug!(mv = %only, "only move");
                return MoveResult::only_move(*only, elapsed_ms());
            }
            _ => {}
        }

        if let Some(win) = find_immediate_win(board, &moves) {
            debug!(mv = %win, "immediate win");
            return MoveResult::immediate_win(win, elapsed_ms());
        }

        self.searcher.set_root(board);
        self.searcher.set_max_depth(self.max_depth);
        self.searcher.set_max_time(self.time_limit);
        let result = self.searcher.search();
        let result = MoveResult::from_alphabeta(result, elapsed_ms());

        info!(
            player = ?board.current_player(),
            best = ?result.best_move.map(|mv| mv.to_string()),
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            time_ms = result.time_ms,
            first_move_cutoff_pct = result.stats.first_move_rate(),
            "engine move"
        );
        result
    }

    /// Set maximum search depth
    pub fn set_max_depth(&mut self, depth: u8) {
        self.max_depth = depth;
    }

    /// Get current maximum search depth
    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Set time limit in milliseconds
    pub fn set_time_limit(&mut self, ms: u64) {
        self.time_limit = Duration::from_millis(ms);
    }

    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// First capture move that drops the opponent below three pieces for good.
fn find_immediate_win(board: &BoardState, moves: &[Move]) -> Option<Move> {
    let opponent = board.other_player();
    if board.in_hand(opponent) > 0 || board.on_board(opponent) != FLYING_THRESHOLD {
        return None;
    }
    moves.iter().find(|mv| mv.is_capture()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Pos, Stone};

    fn pos(i: u8) -> Pos {
        Pos::new(i)
    }

    #[test]
    fn test_engine_creation() {
        let engine = AIEngine::new();
        assert_eq!(engine.max_depth(), 10);
        assert_eq!(engine.time_limit(), Duration::from_secs(10));
    }

    #[test]
    fn test_engine_with_config() {
        let engine = AIEngine::with_config(8, 100);
        assert_eq!(engine.max_depth(), 8);
        assert_eq!(engine.time_limit(), Duration::from_millis(100));
    }

    #[test]
    fn test_difficulty_presets() {
        assert_eq!(Difficulty::Easy.depth(), 5);
        assert_eq!(Difficulty::Medium.depth(), 10);
        assert_eq!(Difficulty::Hard.depth(), 15);
        assert_eq!(Difficulty::Easy.time_limit(), Duration::from_secs(5));
        assert_eq!(Difficulty::Hard.time_limit(), Duration::from_secs(15));
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let board =
            BoardState::from_position(&[0, 1, 4, 9, 14], &[3, 19, 23], 9, 9, Stone::White)
                .unwrap();
        let mut engine = AIEngine::with_config(4, 1000);
        let result = engine.get_move_with_stats(&board);

        let best = result.best_move.unwrap();
        assert_eq!(result.search_type, SearchType::ImmediateWin);
        assert_eq!(best.to, pos(2));
        assert!(board.is_move_valid(&best));
    }

    #[test]
    fn test_engine_no_move() {
        let board = BoardState::from_position(
            &[0, 2, 22, 19, 16],
            &[1, 9, 14, 21, 23, 18, 20, 15, 17],
            9,
            9,
            Stone::White,
        )
        .unwrap();
        let mut engine = AIEngine::with_config(4, 1000);
        let result = engine.get_move_with_stats(&board);
        assert_eq!(result.search_type, SearchType::NoMove);
        assert!(result.best_move.is_none());
    }

    #[test]
    fn test_engine_only_move() {
        // White's single free neighbour is 1, reachable only from 0
        let board = BoardState::from_position(
            &[0, 22, 19, 16],
            &[2, 4, 9, 21, 23, 18, 20, 15, 17],
            9,
            9,
            Stone::White,
        )
        .unwrap();
        assert_eq!(board.legal_moves(), vec![Move::slide(pos(0), pos(1))]);

        let mut engine = AIEngine::with_config(4, 1000);
        let result = engine.get_move_with_stats(&board);
        assert_eq!(result.search_type, SearchType::OnlyMove);
        assert_eq!(result.best_move, Some(Move::slide(pos(0), pos(1))));
    }

    #[test]
    fn test_engine_empty_board() {
        let board = BoardState::new();
        let mut engine = AIEngine::with_config(3, 5000);
        let result = engine.get_move_with_stats(&board);

        assert_eq!(result.search_type, SearchType::AlphaBeta);
        assert!(board.is_move_valid(&result.best_move.unwrap()));
        assert_eq!(result.depth, 3);
    }

    #[test]
    fn test_engine_reports_search_stats() {
        let board = BoardState::new();
        let mut engine = AIEngine::with_config(3, 5000);
        let result = engine.get_move_with_stats(&board);

        assert_eq!(result.search_type, SearchType::AlphaBeta);
        assert!(result.stats.beta_cutoffs > 0, "no cutoffs over {} nodes", result.nodes);
        assert!(result.stats.first_move_cutoffs <= result.stats.beta_cutoffs);
        let rate = result.stats.first_move_rate();
        assert!((0.0..=100.0).contains(&rate), "rate {}", rate);
    }

    #[test]
    fn test_shortcut_results_have_no_stats() {
        let board =
            BoardState::from_position(&[0, 1, 4, 9, 14], &[3, 19, 23], 9, 9, Stone::White)
                .unwrap();
        let result = AIEngine::with_config(4, 1000).get_move_with_stats(&board);
        assert_eq!(result.search_type, SearchType::ImmediateWin);
        assert_eq!(result.stats.beta_cutoffs, 0);
        assert_eq!(result.stats.first_move_rate(), 0.0);
    }

    #[test]
    fn test_engine_time_reasonable() {
        let board = BoardState::new();
        let mut engine = AIEngine::with_config(30, 200);
        let result = engine.get_move_with_stats(&board);

        assert!(result.best_move.is_some());
        assert!(result.time_ms < 2_000, "Search took too long: {}ms", result.time_ms);
    }

    #[test]
    fn test_engine_set_depth() {
        let mut engine = AIEngine::new();
        engine.set_max_depth(12);
        assert_eq!(engine.max_depth(), 12);

        engine.set_time_limit(1000);
        assert_eq!(engine.time_limit(), Duration::from_millis(1000));
    }

    #[test]
    fn test_engine_handle_cancels() {
        let mut engine = AIEngine::with_config(30, 60_000);
        engine.handle().terminate();

        let board = BoardState::new();
        let start = Instant::now();
        let result = engine.get_move_with_stats(&board);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(board.is_move_valid(&result.best_move.unwrap()));
    }

    #[test]
    fn test_engine_alternating_colors() {
        let mut engine = AIEngine::with_config(2, 1000);
        let mut board = BoardState::new();

        for _ in 0..4 {
            let mv = engine.get_move(&board).expect("placing always has moves");
            assert!(board.is_move_valid(&mv));
            board.make_move(&mv);
        }
        assert_eq!(board.stone_count(), 4);
        assert_eq!(board.current_player(), Stone::White);
    }
}
