//! CLI command handlers

pub mod extract;
pub mod generate;
pub mod info;

pub use extract::run_extract;
pub use generate::{run_quiz, run_reviewer};
pub use info::run_info;
