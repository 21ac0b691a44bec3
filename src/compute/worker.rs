//! Long-lived band workers.
//!
//! One worker thread per band for the whole run. Every generation the
//! distributor moves a `Band` in over the worker's input channel and takes the
//! computed rows back from its output channel.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};

use super::{Band, Row, live_neighbours, next_state};
use crate::schema::{Cell, Event, emit};

/// Compute the next state of a band's own rows.
///
/// `on_flip` is called with the absolute coordinates of every cell whose new
/// state differs from its input state.
pub fn compute_band<F>(band: &Band, start_row: usize, mut on_flip: F) -> Vec<Row>
where
    F: FnMut(Cell),
{
    let rows = band.rows();
    let mut next = Vec::with_capacity(band.height());

    // Row `i` of the interior is row `i + 1` of the view.
    for (i, current) in band.interior().iter().enumerate() {
        let y = i + 1;
        let mut out = Vec::with_capacity(current.len());
        for (x, &cell) in current.iter().enumerate() {
            let value = next_state(cell, live_neighbours(rows, y, x));
            if value != cell {
                on_flip(Cell::new(x, start_row + i));
            }
            out.push(value);
        }
        next.push(out);
    }

    next
}

/// The band worker was dropped or panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("worker for band {band} is no longer running")]
pub struct WorkerLost {
    pub band: usize,
}

/// Distributor-side end of one worker.
pub struct WorkerHandle {
    band: usize,
    input: Option<Sender<Band>>,
    output: Receiver<Vec<Row>>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn the worker for band `band`, whose first row is `start_row`.
    ///
    /// The worker serves at most `turns` generations and exits early once the
    /// input channel is closed. Flips are reported to `flips` when given.
    pub fn spawn(
        band: usize,
        start_row: usize,
        turns: usize,
        flips: Option<Sender<Event>>,
    ) -> io::Result<Self> {
        let (input_tx, input_rx) = bounded::<Band>(1);
        let (output_tx, output_rx) = bounded::<Vec<Row>>(1);

        let thread = thread::Builder::new()
            .name(format!("gol-worker-{band}"))
            .spawn(move || worker_loop(band, start_row, turns, input_rx, output_tx, flips))?;

        Ok(Self {
            band,
            input: Some(input_tx),
            output: output_rx,
            thread: Some(thread),
        })
    }

    /// Hand this generation's view to the worker.
    pub fn submit(&self, view: Band) -> Result<(), WorkerLost> {
        match &self.input {
            Some(tx) => tx.send(view).map_err(|_| WorkerLost { band: self.band }),
            None => Err(WorkerLost { band: self.band }),
        }
    }

    /// Block until the worker returns its computed rows.
    pub fn collect(&self) -> Result<Vec<Row>, WorkerLost> {
        self.output.recv().map_err(|_| WorkerLost { band: self.band })
    }

    /// Close the input channel and wait for the thread to finish.
    pub fn join(mut self) -> Result<(), WorkerLost> {
        self.input.take();
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| WorkerLost { band: self.band }),
            None => Ok(()),
        }
    }
}

fn worker_loop(
    band: usize,
    start_row: usize,
    turns: usize,
    input: Receiver<Band>,
    output: Sender<Vec<Row>>,
    flips: Option<Sender<Event>>,
) {
    log::debug!("worker {band} started at row {start_row}");

    for turn in 0..turns {
        let Ok(view) = input.recv() else {
            log::debug!("worker {band} released after {turn} turns");
            return;
        };

        let next = compute_band(&view, start_row, |cell| {
            if let Some(events) = &flips {
                emit(events, Event::CellFlipped { turn, cell });
            }
        });

        if output.send(next).is_err() {
            return;
        }
    }

    log::debug!("worker {band} finished");
}
