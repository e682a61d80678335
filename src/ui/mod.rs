//! Desktop front end for Nine Men's Morris
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::MorrisApp;
pub use game_state::{GameMode, GameResult, GameState, Selection, TurnClock, WinReason};
