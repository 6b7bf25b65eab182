//! Library components of the `ssmix-jsonizer` command.

pub mod config;
pub mod logging;
