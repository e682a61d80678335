//! Search module for Nine Men's Morris AI
//!
//! Contains the alpha-beta searcher with iterative deepening, depth and time
//! bounds, and a handle for cancelling it from another thread.

pub mod alphabeta;

pub use alphabeta::{AlphaBetaPruning, SearchHandle, SearchResult, SearchStats};
