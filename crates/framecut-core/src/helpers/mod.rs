pub mod geometry;
pub mod grid;
pub mod time;
