//! Game rules for Nine Men's Morris
//!
//! This module implements the rule set on top of [`BoardState`](crate::board::BoardState):
//! - Mill detection and the mill-protection capture rule
//! - Move and ply legality per phase (placing, moving, flying)
//! - Legal move generation and loss detection

pub mod legality;
pub mod mill;
pub mod movegen;
