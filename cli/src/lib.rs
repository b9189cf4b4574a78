//! File-backed driver for `sweepscript-core` sessions.

pub use manifest::*;
pub use runner::*;

mod manifest;
mod runner;
