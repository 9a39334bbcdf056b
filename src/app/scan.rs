use crate::scanner::{ScanProgress, ScannedItem, Scanner};
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    /// One folder picked by the user.
    Directory(PathBuf),
    /// The configured plugin locations, walked in order.
    Defaults(Vec<PathBuf>),
}

pub enum ScanEvent {
    Progress(ScanProgress),
    Finished(Result<Vec<ScannedItem>>),
}

/// A scan running on a worker thread. Dropping the job detaches the worker.
pub struct ScanJob {
    receiver: Receiver<ScanEvent>,
}

impl ScanJob {
    pub fn spawn(request: ScanRequest) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let scanner = Scanner::new();
            let result = match request {
                ScanRequest::Directory(dir) => {
                    log::info!("Scanning {}", dir.display());
                    scanner.scan(&dir)
                }
                ScanRequest::Defaults(paths) => {
                    log::info!("Auto-scanning {} locations", paths.len());
                    let progress = sender.clone();
                    scanner.auto_scan(&paths, move |p| {
                        let _ = progress.send(ScanEvent::Progress(p));
                    })
                }
            };
            let _ = sender.send(ScanEvent::Finished(result.map_err(anyhow::Error::from)));
        });

        Self { receiver }
    }

    /// Drains pending events without blocking.
    pub fn poll(&self) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.push(ScanEvent::Finished(Err(anyhow!(
                        "Scan worker stopped unexpectedly"
                    ))));
                    break;
                }
            }
        }
        events
    }
}
