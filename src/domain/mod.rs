pub mod ai;
pub mod beam;
pub mod entity;
pub mod grid;
pub mod hazard;
pub mod movement;
pub mod obstacle;
pub mod puzzle;
