//! Periodic live-population reports.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};

use super::ProgressHandle;

/// Ask the progress actor for an `AliveCellsCount` every `interval` until
/// `done` is closed.
pub(crate) fn spawn_ticker(
    interval: Duration,
    progress: ProgressHandle,
    done: Receiver<()>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("gol-ticker".into())
        .spawn(move || {
            let ticks = tick(interval);
            loop {
                let running = select! {
                    recv(ticks) -> _ => progress.report_alive_count().is_ok(),
                    recv(done) -> _ => false,
                };
                if !running {
                    break;
                }
            }
            log::debug!("ticker stopped");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Grid;
    use crate::schema::Event;
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::Arc;

    #[test]
    fn test_ticker_reports_until_done() {
        let (tx, rx) = unbounded();
        let (progress, actor) = ProgressHandle::spawn(Arc::new(Grid::new(4, 4)), tx).unwrap();
        let (done_tx, done_rx) = bounded::<()>(0);
        let ticker = spawn_ticker(Duration::from_millis(5), progress.clone(), done_rx).unwrap();

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, Event::AliveCellsCount { turn: 0, count: 0 });

        drop(done_tx);
        ticker.join().unwrap();
        drop(progress);
        actor.join().unwrap();
        assert!(rx.iter().all(|e| matches!(e, Event::AliveCellsCount { .. })));
    }
}
