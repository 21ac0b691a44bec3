//! Compute module - Grid model, rule evaluation, band partitioning and workers.

mod grid;
mod partition;
mod rule;
mod worker;

pub use grid::*;
pub use partition::*;
pub use rule::*;
pub use worker::*;
