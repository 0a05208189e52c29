use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::snapshot_fetch::{fetch_snapshot, read_snapshot_file, snapshot_url};
use crate::state::{Delta, ProviderCommand};

/// Where one load's snapshot comes from. HTTP is the normal path; the file
/// source reads the generator's output straight from disk, which doubles as
/// the demo mode.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    Http(String),
    File(String),
}

pub fn source_from_env() -> SnapshotSource {
    let source = env::var("SNAPSHOT_SOURCE")
        .unwrap_or_else(|_| "http".to_string())
        .to_lowercase();
    if source == "file" {
        let path = env::var("SNAPSHOT_PATH")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| "championship_results.json".to_string());
        return SnapshotSource::File(path);
    }
    SnapshotSource::Http(snapshot_url())
}

/// Runs the blocking loads off the UI thread. Loads once at startup, then
/// once per `FetchSnapshot` command; exits when the command channel closes.
pub fn spawn_snapshot_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let source = source_from_env();
        let _ = tx.send(Delta::Log(format!("[INFO] loading from {}", source_label(&source))));
        load_and_send(&source, &tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchSnapshot => load_and_send(&source, &tx),
            }
        }
    });
}

fn load_and_send(source: &SnapshotSource, tx: &Sender<Delta>) {
    let result = match source {
        SnapshotSource::Http(url) => fetch_snapshot(url),
        SnapshotSource::File(path) => read_snapshot_file(path),
    };
    let delta = match result {
        Ok(snapshot) => Delta::Snapshot(Box::new(snapshot)),
        Err(err) => Delta::LoadFailed(format!("{err:#}")),
    };
    let _ = tx.send(delta);
}

fn source_label(source: &SnapshotSource) -> String {
    match source {
        SnapshotSource::Http(url) => url.clone(),
        SnapshotSource::File(path) => format!("file {path}"),
    }
}
