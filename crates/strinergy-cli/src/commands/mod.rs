// crates/strinergy-cli/src/commands/mod.rs
//
// Command module declarations for the Strinergy CLI.

pub mod config;
pub mod simulate;
