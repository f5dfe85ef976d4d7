//! CLI layer: argument parsing, command dispatch, terminal output

pub mod args;
pub mod commands;
pub mod output;
