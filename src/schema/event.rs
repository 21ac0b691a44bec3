//! Notification types published to observers of a run.

use std::fmt;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// Absolute grid coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Cell {
    #[inline]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Execution state reported through `Event::StateChange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Paused,
    Executing,
    Quitting,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Paused => write!(f, "Paused"),
            State::Executing => write!(f, "Executing"),
            State::Quitting => write!(f, "Quitting"),
        }
    }
}

/// Ordered notification stream item.
///
/// Every variant carries the turn it refers to; see `completed_turns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A cell changed state while computing generation `turn`.
    CellFlipped { turn: usize, cell: Cell },
    /// `turn` generations have been fully applied.
    TurnComplete { turn: usize },
    /// Live population of the snapshot taken after `turn` generations.
    AliveCellsCount { turn: usize, count: usize },
    /// The run moved to a new execution state.
    StateChange { turn: usize, state: State },
    /// The run finished after `turn` completed generations.
    FinalTurnComplete { turn: usize, alive: Vec<Cell> },
    /// An image of the grid after `turn` generations was handed to storage.
    ImageOutputComplete { turn: usize, filename: String },
}

impl Event {
    /// Turn number the event is stamped with.
    pub fn completed_turns(&self) -> usize {
        match self {
            Event::CellFlipped { turn, .. }
            | Event::TurnComplete { turn }
            | Event::AliveCellsCount { turn, .. }
            | Event::StateChange { turn, .. }
            | Event::FinalTurnComplete { turn, .. }
            | Event::ImageOutputComplete { turn, .. } => *turn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::CellFlipped { turn, cell } => {
                write!(f, "Turn {turn}: cell ({}, {}) flipped", cell.x, cell.y)
            }
            Event::TurnComplete { turn } => write!(f, "Turn {turn} complete"),
            Event::AliveCellsCount { turn, count } => {
                write!(f, "Turn {turn}: {count} alive cells")
            }
            Event::StateChange { turn, state } => write!(f, "Turn {turn}: {state}"),
            Event::FinalTurnComplete { turn, alive } => {
                write!(f, "Final turn {turn}: {} alive cells", alive.len())
            }
            Event::ImageOutputComplete { turn, filename } => {
                write!(f, "Turn {turn}: wrote {filename}")
            }
        }
    }
}

/// Publish `event`, returning `false` once the observer has gone away.
///
/// Runs keep going without an observer, so a closed stream is only traced.
pub(crate) fn emit(events: &Sender<Event>, event: Event) -> bool {
    match events.send(event) {
        Ok(()) => true,
        Err(err) => {
            log::trace!("event receiver dropped, discarding {}", err.into_inner());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_emit_reports_closed_stream() {
        let (tx, rx) = unbounded();
        assert!(emit(&tx, Event::TurnComplete { turn: 1 }));
        assert_eq!(rx.recv().unwrap(), Event::TurnComplete { turn: 1 });

        drop(rx);
        assert!(!emit(&tx, Event::TurnComplete { turn: 2 }));
    }

    #[test]
    fn test_completed_turns() {
        let events = [
            Event::CellFlipped {
                turn: 1,
                cell: Cell::new(0, 0),
            },
            Event::TurnComplete { turn: 2 },
            Event::AliveCellsCount { turn: 3, count: 9 },
            Event::StateChange {
                turn: 4,
                state: State::Paused,
            },
            Event::FinalTurnComplete {
                turn: 5,
                alive: vec![],
            },
            Event::ImageOutputComplete {
                turn: 6,
                filename: "16x16x6".into(),
            },
        ];
        let turns: Vec<usize> = events.iter().map(Event::completed_turns).collect();
        assert_eq!(turns, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_display() {
        let event = Event::StateChange {
            turn: 7,
            state: State::Executing,
        };
        assert_eq!(event.to_string(), "Turn 7: Executing");

        let event = Event::FinalTurnComplete {
            turn: 3,
            alive: vec![Cell::new(1, 2), Cell::new(2, 2)],
        };
        assert_eq!(event.to_string(), "Final turn 3: 2 alive cells");
    }

    #[test]
    fn test_json_tagging() {
        let event = Event::AliveCellsCount { turn: 4, count: 12 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"AliveCellsCount","turn":4,"count":12}"#);
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
