//! Command implementations.

pub mod run;
pub mod serve;
pub mod train;
