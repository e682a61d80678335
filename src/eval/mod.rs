//! Evaluation module for Nine Men's Morris positions
//!
//! This module provides pattern weights and scoring for board positions.
//! The evaluation considers:
//! - Material, with captures near the three-piece floor weighted up
//! - Complete and open mills
//! - Mobility
//! - Decided positions (out of material or blocked)

pub mod heuristic;
pub mod patterns;

pub use heuristic::evaluate;
pub use patterns::{material_score, PatternScore};
