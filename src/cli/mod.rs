//! Command-line interface module.

mod args;
pub mod serve;
pub mod task;

pub use args::{Cli, Commands};
