//! Engine module - Turn loop and the concurrent units around it.
//!
//! # Threads
//!
//! ```text
//!                    Band / rows (one channel pair per worker)
//!  ┌────────────┐ ◀──────────────────────────────▶ ┌──────────────┐
//!  │ Distributor│                                  │ Worker x N   │
//!  │ (turn loop)│ ──── publish / transition ─────▶ ┌──────────────┐
//!  └────────────┘                                  │ Progress     │
//!     ▲    │ ack                                   │ actor        │
//!     │    ▼                                       └──────────────┘
//!  ┌────────────┐ ──── snapshot ────────────────────────▲  ▲
//!  │ Control    │                                       │  │ report
//!  │ handler    │                                  ┌──────────────┐
//!  └────────────┘                                  │ Ticker       │
//!                                                  └──────────────┘
//! ```
//!
//! The progress actor is the only owner of the shared run state (completed
//! turns, current grid, lifecycle). Everything else reads or changes it by
//! message, so there are no locks to order.

mod control;
mod distributor;
mod progress;
mod ticker;

pub use distributor::{RunSummary, run, spawn};
pub use progress::{Lifecycle, ProgressHandle, Snapshot};

use crate::compute::WorkerLost;
use crate::io::ImageError;
use crate::schema::ConfigError;

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Image I/O failed: {0}")]
    Image(#[from] ImageError),
    #[error(transparent)]
    WorkerLost(#[from] WorkerLost),
    #[error("Run state thread is no longer running")]
    ActorLost,
    #[error("Failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}
