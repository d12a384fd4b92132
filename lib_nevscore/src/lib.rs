pub mod alignment;
pub mod config;
pub mod conservation;
pub mod error;
mod io;
pub mod position_mapper;
pub mod result_table;
pub mod signature;
pub mod substitution_matrix;
