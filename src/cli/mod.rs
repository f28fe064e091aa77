//! Command-line front end: argument parsing and output rendering

pub mod args;
pub mod output;
