//! Schema module - Configuration, seeding, control and notification types.

mod config;
mod control;
mod event;
mod seed;

pub use config::*;
pub use control::*;
pub use event::*;
pub(crate) use event::emit;
pub use seed::*;
