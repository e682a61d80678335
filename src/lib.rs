//! Nine Men's Morris engine with an alpha-beta computer player
//!
//! Nine Men's Morris on the standard 24-point board:
//! - Each player places nine pieces, then slides them along the lines
//! - Three in a line (a mill) removes an opponent piece
//! - Pieces in a mill are protected while the owner has any piece outside one
//! - A player down to three pieces may fly to any empty point
//! - Fewer than three pieces after placing, or no legal move, loses
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Topology, pieces, moves and the board state
//! - [`rules`]: Mill detection, legality and move generation
//! - [`eval`]: Position evaluation
//! - [`search`]: Alpha-beta search with time and depth bounds
//! - [`engine`]: Difficulty presets around the search
//! - [`game`]: Game driver owning the board and the computer's turn
//! - [`ui`]: Desktop front end
//!
//! # Quick Start
//!
//! ```
//! use morris::{AIEngine, BoardState, Move, Pos, Stone};
//!
//! let mut board = BoardState::new();
//! board.make_move(&Move::placement(Pos::new(0)));
//! assert_eq!(board.position_state(Pos::new(0)), Stone::White);
//!
//! // Computer answers as Black
//! let mut engine = AIEngine::with_config(3, 1000);
//! if let Some(mv) = engine.get_move(&board) {
//!     assert!(board.is_move_valid(&mv));
//!     board.make_move(&mv);
//!     println!("AI plays {}", mv);
//! }
//! assert_eq!(board.current_player(), Stone::White);
//! ```

pub mod board;
pub mod engine;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{BoardError, BoardState, Move, Phase, Ply, Pos, Stone, POINT_COUNT};
pub use engine::{AIEngine, Difficulty, MoveResult, SearchType};
pub use game::{Game, GameError, GameEvent, GameObserver, GameStatus};
pub use search::{AlphaBetaPruning, SearchHandle};
