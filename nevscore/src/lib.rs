pub mod matrix;
pub mod score;
