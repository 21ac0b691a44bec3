//! Distributor - Turn loop driving the band workers.
//!
//! Each generation the loop checks for control commands, cuts one view per
//! band, hands the views to the workers, collects their rows back in band
//! order and publishes the reassembled grid.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use super::control::{Command, ControlHandler};
use super::progress::{Lifecycle, ProgressHandle};
use super::ticker::spawn_ticker;
use super::EngineError;
use crate::compute::{BandGeometry, Grid, WorkerHandle, extract_view, reassemble};
use crate::io::{ImageError, ImageStore, IoHandle};
use crate::schema::{Cell, ControlSignal, Event, Params, emit};

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Generations fully applied before the run ended.
    pub completed_turns: usize,
    /// Live cells of the final grid, row-major.
    pub alive_cells: Vec<Cell>,
    /// Identifier the final grid was saved under.
    pub output: String,
}

/// Run a whole simulation on the calling thread.
///
/// Loads `"{width}x{height}"` from `store`, runs up to `params.turns`
/// generations while serving `signals`, saves the final grid and reports
/// everything on `events`. The event stream is closed when this returns.
pub fn run<S: ImageStore + 'static>(
    params: Params,
    store: S,
    events: Sender<Event>,
    signals: Receiver<ControlSignal>,
) -> Result<RunSummary, EngineError> {
    params.validate()?;
    log::info!(
        "{}x{} grid, {} turns on {} threads",
        params.image_width,
        params.image_height,
        params.turns,
        params.threads
    );

    let (io, io_thread) = IoHandle::spawn(store)?;
    let result = distribute(params, &io, events, signals);

    drop(io);
    if io_thread.join().is_err() {
        log::error!("image I/O thread panicked");
    }
    result
}

/// Run a simulation on its own thread.
pub fn spawn<S: ImageStore + 'static>(
    params: Params,
    store: S,
    events: Sender<Event>,
    signals: Receiver<ControlSignal>,
) -> io::Result<JoinHandle<Result<RunSummary, EngineError>>> {
    thread::Builder::new()
        .name("gol-distributor".into())
        .spawn(move || run(params, store, events, signals))
}

fn distribute(
    params: Params,
    io: &IoHandle,
    events: Sender<Event>,
    signals: Receiver<ControlSignal>,
) -> Result<RunSummary, EngineError> {
    let grid = Arc::new(load_grid(&params, io, &events)?);

    let geometry = BandGeometry::compute(params.image_height, params.threads);
    log::debug!("band heights {:?}", geometry.heights());
    let flips = params.emit_cell_flips.then(|| events.clone());
    let workers = (0..geometry.len())
        .map(|band| {
            WorkerHandle::spawn(
                band,
                geometry.start_rows()[band],
                params.turns,
                flips.clone(),
            )
        })
        .collect::<io::Result<Vec<_>>>()?;
    drop(flips);

    let (progress, progress_thread) = ProgressHandle::spawn(Arc::clone(&grid), events.clone())?;

    // Never sent on; dropping it tells the ticker and handler to stop.
    let (done_tx, done_rx) = bounded::<()>(0);
    let (command_tx, command_rx) = unbounded::<Command>();
    let (ack_tx, ack_rx) = bounded::<()>(1);

    let ticker = spawn_ticker(params.tick_interval(), progress.clone(), done_rx.clone())?;
    let handler = ControlHandler {
        signals,
        commands: command_tx,
        acks: ack_rx,
        done: done_rx,
        progress: progress.clone(),
        io: io.clone(),
        events: events.clone(),
        params: params.clone(),
    }
    .spawn()?;

    let mut distributor = Distributor {
        params,
        geometry,
        workers,
        progress,
        events,
        commands: command_rx,
        acks: ack_tx,
        grid,
        completed_turns: 0,
    };

    let outcome = distributor.turn_loop();

    drop(done_tx);
    if ticker.join().is_err() {
        log::error!("ticker thread panicked");
    }
    if handler.join().is_err() {
        log::error!("control handler thread panicked");
    }
    outcome?;

    let summary = distributor.finish(io);
    if progress_thread.join().is_err() {
        log::error!("progress thread panicked");
    }
    summary
}

/// Load the initial grid and announce its live cells as turn 0.
fn load_grid(params: &Params, io: &IoHandle, events: &Sender<Event>) -> Result<Grid, EngineError> {
    let (width, height) = (params.image_width, params.image_height);
    let cells = io.load(&params.input_name(), width, height)?;
    let grid = Grid::from_bytes(width, height, &cells).ok_or(ImageError::Truncated {
        expected: width.saturating_mul(height),
        found: cells.len(),
    })?;

    if params.emit_cell_flips {
        for cell in grid.alive_cells() {
            emit(events, Event::CellFlipped { turn: 0, cell });
        }
    }
    emit(events, Event::TurnComplete { turn: 0 });
    Ok(grid)
}

enum Flow {
    Continue,
    Stop,
}

struct Distributor {
    params: Params,
    geometry: BandGeometry,
    workers: Vec<WorkerHandle>,
    progress: ProgressHandle,
    events: Sender<Event>,
    commands: Receiver<Command>,
    acks: Sender<()>,
    grid: Arc<Grid>,
    completed_turns: usize,
}

impl Distributor {
    fn turn_loop(&mut self) -> Result<(), EngineError> {
        for turn in 0..self.params.turns {
            if let Flow::Stop = self.poll_commands()? {
                log::info!("stopping after {} turns", self.completed_turns);
                break;
            }
            self.advance()?;
            debug_assert_eq!(self.completed_turns, turn + 1);
        }
        self.progress.transition(Lifecycle::Stopping)
    }

    /// Apply one generation across all bands.
    fn advance(&mut self) -> Result<(), EngineError> {
        let threads = self.geometry.len();
        for (band, worker) in self.workers.iter().enumerate() {
            let (start, end) = self.geometry.bounds(band);
            worker.submit(extract_view(&self.grid, threads, band, start, end))?;
        }

        let mut parts = Vec::with_capacity(threads);
        for worker in &self.workers {
            parts.push(worker.collect()?);
        }

        self.grid = Arc::new(reassemble(self.params.image_width, parts));
        self.completed_turns += 1;
        self.progress
            .publish(Arc::clone(&self.grid), self.completed_turns)?;
        self.emit(Event::TurnComplete {
            turn: self.completed_turns,
        });
        Ok(())
    }

    /// Drain pending commands at a generation boundary.
    fn poll_commands(&self) -> Result<Flow, EngineError> {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Stop => return Ok(Flow::Stop),
                Command::Pause => return self.pause(),
                Command::Resume => log::warn!("resume requested while running"),
            }
        }
        Ok(Flow::Continue)
    }

    /// Block between generations until resumed or stopped.
    fn pause(&self) -> Result<Flow, EngineError> {
        self.progress.transition(Lifecycle::Paused)?;
        self.acknowledge();

        loop {
            match self.commands.recv() {
                Ok(Command::Resume) => {
                    self.progress.transition(Lifecycle::Running)?;
                    self.acknowledge();
                    return Ok(Flow::Continue);
                }
                Ok(Command::Stop) => return Ok(Flow::Stop),
                Ok(Command::Pause) => log::warn!("pause requested while paused"),
                Err(_) => {
                    log::warn!("control handler went away while paused, stopping");
                    return Ok(Flow::Stop);
                }
            }
        }
    }

    fn acknowledge(&self) {
        if self.acks.send(()).is_err() {
            log::debug!("control handler gone before acknowledgement");
        }
    }

    /// Report the final state, write it out and close down.
    fn finish(self, io: &IoHandle) -> Result<RunSummary, EngineError> {
        let Distributor {
            params,
            workers,
            progress,
            events,
            grid,
            completed_turns: turn,
            ..
        } = self;

        for worker in workers {
            worker.join()?;
        }

        let alive = grid.alive_cells();
        emit(
            &events,
            Event::FinalTurnComplete {
                turn,
                alive: alive.clone(),
            },
        );

        let output = params.output_name(turn);
        let stored = io
            .save(
                &output,
                params.image_width,
                params.image_height,
                grid.to_bytes(),
            )
            .and_then(|()| {
                emit(
                    &events,
                    Event::ImageOutputComplete {
                        turn,
                        filename: output.clone(),
                    },
                );
                io.wait_idle()
            });

        // Quitting closes every run, including one whose images failed to store.
        progress.transition(Lifecycle::Terminated)?;
        stored?;
        log::info!("finished after {} turns, {} alive", turn, alive.len());

        Ok(RunSummary {
            completed_turns: turn,
            alive_cells: alive,
            output,
        })
    }

    fn emit(&self, event: Event) {
        emit(&self.events, event);
    }
}
