//! Game of Life turn distribution engine.
//!
//! This crate runs Conway's Game of Life (B3/S23) on a toroidal grid, splitting
//! each generation into horizontal bands computed by long-lived worker threads.
//! Progress is reported as a stream of [`Event`]s and a running simulation can
//! be paused, resumed, stopped or snapshotted with [`ControlSignal`]s.
//!
//! # Architecture
//!
//! - `schema`: Parameters, seeds, control signals and notification events
//! - `compute`: Grid model, rule, band partitioning and band workers
//! - `io`: Image storage (PGM files, in-memory) behind a dedicated I/O thread
//! - `engine`: Turn loop, progress actor, ticker and control handler
//!
//! # Example
//!
//! ```rust,no_run
//! use gol_distributor::{
//!     crossbeam_channel::unbounded,
//!     io::{MemoryStore, SeededStore},
//!     schema::{Params, Seed},
//! };
//!
//! let params = Params {
//!     turns: 100,
//!     threads: 4,
//!     image_width: 64,
//!     image_height: 64,
//!     ..Params::default()
//! };
//! let store = SeededStore::new(Seed::glider(10, 10), MemoryStore::new());
//!
//! let (events, notifications) = unbounded();
//! let (_signals, control) = unbounded();
//! let summary = gol_distributor::run(params, store, events, control).unwrap();
//!
//! println!("{} cells alive", summary.alive_cells.len());
//! println!("{} events", notifications.iter().count());
//! ```

pub mod compute;
pub mod engine;
pub mod io;
pub mod schema;

pub use crossbeam_channel;

// Re-export commonly used types
pub use compute::{CellState, Grid};
pub use engine::{EngineError, RunSummary, run, spawn};
pub use schema::{ControlSignal, Event, Params};
