//! Actor owning the shared run state.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, bounded, unbounded};

use super::EngineError;
use crate::compute::Grid;
use crate::schema::{Event, State, emit};

/// Run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Paused,
    Stopping,
    Terminated,
}

/// Consistent view of the run state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub completed_turns: usize,
    pub grid: Arc<Grid>,
    pub lifecycle: Lifecycle,
}

enum Request {
    Publish {
        grid: Arc<Grid>,
        completed_turns: usize,
    },
    Transition {
        to: Lifecycle,
        reply: Sender<()>,
    },
    Snapshot {
        reply: Sender<Snapshot>,
    },
    ReportAliveCount,
}

struct Progress {
    completed_turns: usize,
    grid: Arc<Grid>,
    lifecycle: Lifecycle,
    events: Sender<Event>,
}

impl Progress {
    fn handle(&mut self, request: Request) {
        match request {
            Request::Publish {
                grid,
                completed_turns,
            } => {
                self.grid = grid;
                self.completed_turns = completed_turns;
            }
            Request::Transition { to, reply } => {
                self.transition(to);
                let _ = reply.send(());
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(Snapshot {
                    completed_turns: self.completed_turns,
                    grid: Arc::clone(&self.grid),
                    lifecycle: self.lifecycle,
                });
            }
            Request::ReportAliveCount => {
                if matches!(self.lifecycle, Lifecycle::Paused | Lifecycle::Terminated) {
                    return;
                }
                self.emit(Event::AliveCellsCount {
                    turn: self.completed_turns,
                    count: self.grid.alive_count(),
                });
            }
        }
    }

    /// Apply a lifecycle change and publish the matching `StateChange`.
    ///
    /// A pause takes effect before the next generation, so it is stamped with
    /// that generation's number; a resume is stamped with the turns completed.
    fn transition(&mut self, to: Lifecycle) {
        let from = self.lifecycle;
        if from == to {
            return;
        }
        self.lifecycle = to;
        log::info!("{:?} -> {:?} at turn {}", from, to, self.completed_turns);

        let change = match (from, to) {
            (_, Lifecycle::Paused) => Some((self.completed_turns + 1, State::Paused)),
            (Lifecycle::Paused, Lifecycle::Running) => {
                Some((self.completed_turns, State::Executing))
            }
            (_, Lifecycle::Terminated) => Some((self.completed_turns, State::Quitting)),
            _ => None,
        };
        if let Some((turn, state)) = change {
            self.emit(Event::StateChange { turn, state });
        }
    }

    fn emit(&self, event: Event) {
        emit(&self.events, event);
    }
}

/// Cloneable handle to the progress actor.
#[derive(Clone)]
pub struct ProgressHandle {
    requests: Sender<Request>,
}

impl ProgressHandle {
    /// Start the actor with `grid` at zero completed turns.
    ///
    /// The actor exits once every handle has been dropped.
    pub fn spawn(grid: Arc<Grid>, events: Sender<Event>) -> io::Result<(Self, JoinHandle<()>)> {
        let (tx, rx) = unbounded::<Request>();
        let mut state = Progress {
            completed_turns: 0,
            grid,
            lifecycle: Lifecycle::Running,
            events,
        };

        let thread = thread::Builder::new()
            .name("gol-progress".into())
            .spawn(move || {
                for request in rx {
                    state.handle(request);
                }
            })?;

        Ok((Self { requests: tx }, thread))
    }

    /// Replace the grid after `completed_turns` generations.
    pub fn publish(&self, grid: Arc<Grid>, completed_turns: usize) -> Result<(), EngineError> {
        self.send(Request::Publish {
            grid,
            completed_turns,
        })
    }

    /// Move to `to`, returning once any resulting `StateChange` has been emitted.
    pub fn transition(&self, to: Lifecycle) -> Result<(), EngineError> {
        let (reply, done) = bounded(1);
        self.send(Request::Transition { to, reply })?;
        done.recv().map_err(|_| EngineError::ActorLost)
    }

    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let (reply, response) = bounded(1);
        self.send(Request::Snapshot { reply })?;
        response.recv().map_err(|_| EngineError::ActorLost)
    }

    /// Emit `AliveCellsCount` for the current snapshot unless paused.
    pub fn report_alive_count(&self) -> Result<(), EngineError> {
        self.send(Request::ReportAliveCount)
    }

    fn send(&self, request: Request) -> Result<(), EngineError> {
        self.requests
            .send(request)
            .map_err(|_| EngineError::ActorLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::CellState;

    fn grid_with(alive: usize) -> Arc<Grid> {
        let mut grid = Grid::new(8, 8);
        for x in 0..alive {
            grid.set(x, 0, CellState::Alive);
        }
        Arc::new(grid)
    }

    #[test]
    fn test_snapshot_reflects_publish() {
        let (tx, _rx) = unbounded();
        let (progress, thread) = ProgressHandle::spawn(grid_with(1), tx).unwrap();

        progress.publish(grid_with(3), 5).unwrap();
        let snapshot = progress.snapshot().unwrap();
        assert_eq!(snapshot.completed_turns, 5);
        assert_eq!(snapshot.grid.alive_count(), 3);
        assert_eq!(snapshot.lifecycle, Lifecycle::Running);

        drop(progress);
        thread.join().unwrap();
    }

    #[test]
    fn test_state_change_stamps() {
        let (tx, rx) = unbounded();
        let (progress, thread) = ProgressHandle::spawn(grid_with(0), tx).unwrap();
        progress.publish(grid_with(0), 7).unwrap();

        progress.transition(Lifecycle::Paused).unwrap();
        progress.transition(Lifecycle::Running).unwrap();
        progress.transition(Lifecycle::Stopping).unwrap();
        progress.transition(Lifecycle::Terminated).unwrap();

        drop(progress);
        thread.join().unwrap();
        let events: Vec<Event> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                Event::StateChange {
                    turn: 8,
                    state: State::Paused
                },
                Event::StateChange {
                    turn: 7,
                    state: State::Executing
                },
                Event::StateChange {
                    turn: 7,
                    state: State::Quitting
                },
            ]
        );
    }

    #[test]
    fn test_alive_count_skipped_while_paused() {
        let (tx, rx) = unbounded();
        let (progress, thread) = ProgressHandle::spawn(grid_with(4), tx).unwrap();

        progress.report_alive_count().unwrap();
        progress.transition(Lifecycle::Paused).unwrap();
        progress.report_alive_count().unwrap();
        progress.transition(Lifecycle::Running).unwrap();
        progress.publish(grid_with(6), 1).unwrap();
        progress.report_alive_count().unwrap();

        drop(progress);
        thread.join().unwrap();
        let counts: Vec<Event> = rx
            .iter()
            .filter(|e| matches!(e, Event::AliveCellsCount { .. }))
            .collect();
        assert_eq!(
            counts,
            vec![
                Event::AliveCellsCount { turn: 0, count: 4 },
                Event::AliveCellsCount { turn: 1, count: 6 },
            ]
        );
    }
}
