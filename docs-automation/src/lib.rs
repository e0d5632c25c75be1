pub mod cli;
pub mod release;

pub use cli::{run, Cli, Commands};
