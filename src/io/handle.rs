//! Thread that owns the image store and serializes requests to it.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Sender, bounded, unbounded};

use super::{ImageError, ImageStore};

enum Command {
    Load {
        name: String,
        width: usize,
        height: usize,
        reply: Sender<Result<Vec<u8>, ImageError>>,
    },
    Save {
        name: String,
        width: usize,
        height: usize,
        cells: Vec<u8>,
    },
    CheckIdle {
        reply: Sender<Result<(), ImageError>>,
    },
}

/// Cloneable handle to the I/O thread.
///
/// Saves are queued and return immediately. `wait_idle` blocks until every
/// previously queued request has been handled.
#[derive(Clone)]
pub struct IoHandle {
    commands: Sender<Command>,
}

impl IoHandle {
    /// Start the I/O thread. It exits once every handle has been dropped.
    pub fn spawn<S: ImageStore + 'static>(store: S) -> io::Result<(Self, JoinHandle<()>)> {
        let (tx, rx) = unbounded::<Command>();

        let thread = thread::Builder::new()
            .name("gol-io".into())
            .spawn(move || {
                let mut store = store;
                let mut deferred: Option<ImageError> = None;

                for command in rx {
                    match command {
                        Command::Load {
                            name,
                            width,
                            height,
                            reply,
                        } => {
                            let _ = reply.send(store.load(&name, width, height));
                        }
                        Command::Save {
                            name,
                            width,
                            height,
                            cells,
                        } => {
                            if let Err(err) = store.save(&name, width, height, &cells) {
                                log::error!("failed to save {}: {}", name, err);
                                deferred.get_or_insert(err);
                            }
                        }
                        Command::CheckIdle { reply } => {
                            let _ = reply.send(deferred.take().map_or(Ok(()), Err));
                        }
                    }
                }
            })?;

        Ok((Self { commands: tx }, thread))
    }

    /// Load image `name`, checking it has exactly `width * height` cells.
    pub fn load(&self, name: &str, width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
        let (reply, response) = bounded(1);
        self.commands
            .send(Command::Load {
                name: name.to_string(),
                width,
                height,
                reply,
            })
            .map_err(|_| ImageError::Disconnected)?;

        let cells = response.recv().map_err(|_| ImageError::Disconnected)??;
        if width.checked_mul(height) != Some(cells.len()) {
            return Err(ImageError::Truncated {
                expected: width.saturating_mul(height),
                found: cells.len(),
            });
        }
        Ok(cells)
    }

    /// Queue `cells` to be saved as `name`.
    pub fn save(
        &self,
        name: &str,
        width: usize,
        height: usize,
        cells: Vec<u8>,
    ) -> Result<(), ImageError> {
        self.commands
            .send(Command::Save {
                name: name.to_string(),
                width,
                height,
                cells,
            })
            .map_err(|_| ImageError::Disconnected)
    }

    /// Block until all queued work has drained.
    ///
    /// Returns the first save failure since the previous call, if any.
    pub fn wait_idle(&self) -> Result<(), ImageError> {
        let (reply, response) = bounded(1);
        self.commands
            .send(Command::CheckIdle { reply })
            .map_err(|_| ImageError::Disconnected)?;
        response.recv().map_err(|_| ImageError::Disconnected)?
    }
}
