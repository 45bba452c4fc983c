//! File watching for `--watch` mode
//!
//! Watches the parent directory of every outlined file with debouncing and
//! reports which of the outlined files changed, so each one can be rescanned
//! from scratch.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};

type EventResult = Result<Vec<DebouncedEvent>, notify::Error>;

/// Debounced watcher over a fixed set of files
pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<EventResult>,
    /// Canonical paths of the watched files
    targets: Vec<PathBuf>,
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

impl FileWatcher {
    /// Start watching `paths`
    ///
    /// Events are debounced with a 250ms delay so an editor's
    /// write-then-rename save produces a single rescan.
    pub fn new(paths: &[PathBuf]) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(Duration::from_millis(250), tx)?;

        let targets: Vec<PathBuf> = paths.iter().map(|p| canonical(p)).collect();
        let parents: BTreeSet<PathBuf> = targets
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();

        for parent in &parents {
            debouncer
                .watcher()
                .watch(parent, notify::RecursiveMode::NonRecursive)?;
            tracing::info!("Watching {}", parent.display());
        }

        Ok(Self {
            _debouncer: debouncer,
            rx,
            targets,
        })
    }

    /// Canonical paths being watched
    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    /// Block until at least one watched file changes
    ///
    /// Returns `None` once the watcher has shut down.
    pub fn next_changes(&self) -> Option<Vec<PathBuf>> {
        loop {
            let result = self.rx.recv().ok()?;
            let changed = self.collect(result);
            if !changed.is_empty() {
                return Some(changed);
            }
        }
    }

    /// Wait up to `timeout` for changes; empty when nothing changed
    pub fn wait_changes(&self, timeout: Duration) -> Vec<PathBuf> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => self.collect(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Vec::new(),
        }
    }

    fn collect(&self, result: EventResult) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        match result {
            Ok(events) => {
                for event in events {
                    if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                        continue;
                    }
                    if let Some(target) = self.matching_target(&event.path) {
                        if !changed.contains(target) {
                            changed.push(target.clone());
                        }
                    }
                }
            }
            Err(e) => tracing::warn!("File watcher error: {:?}", e),
        }

        if !changed.is_empty() {
            tracing::debug!("File watcher detected {} changed files", changed.len());
        }
        changed
    }

    fn matching_target(&self, path: &Path) -> Option<&PathBuf> {
        self.targets
            .iter()
            .find(|target| target.as_path() == path || canonical(path) == **target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("index.html");
        fs::write(&file, "<p></p>").expect("Failed to write file");

        let watcher = FileWatcher::new(&[file.clone()]);
        if let Ok(w) = watcher {
            assert_eq!(w.targets(), &[canonical(&file)]);
        }
    }

    #[test]
    fn test_matching_target_ignores_siblings() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("index.html");
        let sibling = dir.path().join("other.html");
        fs::write(&file, "").expect("Failed to write file");
        fs::write(&sibling, "").expect("Failed to write file");

        let Ok(watcher) = FileWatcher::new(&[file.clone()]) else {
            return;
        };
        assert!(watcher.matching_target(&canonical(&file)).is_some());
        assert!(watcher.matching_target(&canonical(&sibling)).is_none());
    }

    #[test]
    fn test_no_changes_without_writes() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("index.php");
        fs::write(&file, "<?php").expect("Failed to write file");

        if let Ok(w) = FileWatcher::new(&[file]) {
            assert!(w.wait_changes(Duration::from_millis(50)).is_empty());
        }
    }

    #[test]
    #[ignore] // Flaky in CI - file system event timing varies by platform
    fn test_watcher_reports_modified_target() {
        let dir = tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("index.html");
        fs::write(&file, "<p></p>").expect("Failed to write file");

        let watcher = FileWatcher::new(&[file.clone()]).expect("Failed to create watcher");
        fs::write(&file, "<div></div>").expect("Failed to modify file");
        thread::sleep(Duration::from_millis(600));

        let changed = watcher.wait_changes(Duration::from_millis(1000));
        assert_eq!(changed, vec![canonical(&file)]);
    }
}
