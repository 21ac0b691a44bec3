//! Control-signal handler.
//!
//! Turns `ControlSignal`s into commands for the turn loop. Pause and resume
//! are a rendezvous: after sending either, the handler blocks until the turn
//! loop acknowledges it, so a resume can never overtake a pause the loop has
//! not acted on yet.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, select};

use super::ProgressHandle;
use crate::io::IoHandle;
use crate::schema::{ControlSignal, Event, Params, emit};

/// Requests from the handler to the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Pause,
    Resume,
    Stop,
}

enum Flow {
    Continue,
    Exit,
}

pub(crate) struct ControlHandler {
    pub signals: Receiver<ControlSignal>,
    pub commands: Sender<Command>,
    pub acks: Receiver<()>,
    pub done: Receiver<()>,
    pub progress: ProgressHandle,
    pub io: IoHandle,
    pub events: Sender<Event>,
    pub params: Params,
}

impl ControlHandler {
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("gol-control".into())
            .spawn(move || self.run())
    }

    fn run(self) {
        let mut paused = false;
        loop {
            let signal = select! {
                recv(self.signals) -> signal => signal.ok(),
                recv(self.done) -> _ => None,
            };
            let Some(signal) = signal else {
                break;
            };

            let flow = match signal {
                ControlSignal::Save => self.save(),
                ControlSignal::Stop => self.request(Command::Stop),
                ControlSignal::TogglePause => {
                    let command = if paused {
                        Command::Resume
                    } else {
                        Command::Pause
                    };
                    let flow = self.rendezvous(command);
                    if let Flow::Continue = flow {
                        paused = !paused;
                    }
                    flow
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }
        log::debug!("control handler stopped");
    }

    fn request(&self, command: Command) -> Flow {
        log::info!("{:?} requested", command);
        match self.commands.send(command) {
            Ok(()) => Flow::Continue,
            Err(_) => Flow::Exit,
        }
    }

    /// Send `command` and wait for the turn loop to act on it.
    fn rendezvous(&self, command: Command) -> Flow {
        if let Flow::Exit = self.request(command) {
            return Flow::Exit;
        }
        select! {
            recv(self.acks) -> ack => match ack {
                Ok(()) => Flow::Continue,
                Err(_) => Flow::Exit,
            },
            recv(self.done) -> _ => Flow::Exit,
        }
    }

    fn save(&self) -> Flow {
        let snapshot = match self.progress.snapshot() {
            Ok(snapshot) => snapshot,
            Err(_) => return Flow::Exit,
        };
        let turn = snapshot.completed_turns;
        let filename = self.params.output_name(turn);
        log::info!("saving {} while {:?}", filename, snapshot.lifecycle);

        if let Err(err) = self.io.save(
            &filename,
            self.params.image_width,
            self.params.image_height,
            snapshot.grid.to_bytes(),
        ) {
            log::warn!("save of {} not queued: {}", filename, err);
            return Flow::Exit;
        }

        emit(&self.events, Event::ImageOutputComplete { turn, filename });
        Flow::Continue
    }
}
