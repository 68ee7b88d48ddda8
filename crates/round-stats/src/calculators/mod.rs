//! Per-category calculators. Each is a pure `games -> section` function.

pub mod awards;
pub mod checkmates;
pub mod game_phases;
pub mod heatmap;
pub mod openings;
pub mod overview;
pub mod pieces;
pub mod results;
pub mod tactics;
