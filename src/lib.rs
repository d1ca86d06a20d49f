pub mod best_known;
pub mod data;
pub mod encoding;
pub mod parser;
pub mod schedule;
pub mod solver;
