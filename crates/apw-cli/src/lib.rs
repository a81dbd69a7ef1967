//! Library components of the `packup` command.

pub mod config;
pub mod logging;
