//! Shader fragment hot reload
//!
//! Watches the shader directory and reports `.wgsl` files that changed, so the
//! canvas can rebuild its pipeline on the next frame.

use anyhow::{Result, anyhow};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebouncedEvent, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(150);

/// Event emitted by the watcher thread
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A fragment file was written, created or removed
    Changed(PathBuf),
    /// An error occurred while watching
    Error(String),
}

/// Whether `path` names a shader fragment
pub fn is_fragment(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "wgsl")
}

/// Watches a shader directory for fragment edits
pub struct FragmentWatcher {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    receiver: Receiver<WatchEvent>,
}

impl FragmentWatcher {
    /// Start watching `dir` (non-recursive)
    pub fn new(dir: &Path) -> Result<Self> {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(
            DEBOUNCE,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        if is_fragment(&event.path) {
                            let _ = tx.send(WatchEvent::Changed(event.path));
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(format!("Watch error: {:?}", e)));
                }
            },
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {:?}", e))?;

        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch {}: {}", dir.display(), e))?;

        tracing::info!("Watching shader fragments in {}", dir.display());

        Ok(Self {
            _debouncer: debouncer,
            receiver: rx,
        })
    }

    /// Collect every pending event without blocking.
    ///
    /// Returns the changed fragment paths, deduplicated. Errors are logged.
    pub fn drain_changes(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for event in self.receiver.try_iter() {
            match event {
                WatchEvent::Changed(path) => {
                    if !changed.contains(&path) {
                        changed.push(path);
                    }
                }
                WatchEvent::Error(e) => tracing::warn!("{}", e),
            }
        }
        changed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fragment() {
        assert!(is_fragment(Path::new("shaders/palette.wgsl")));
        assert!(is_fragment(Path::new("preview.wgsl")));
        assert!(!is_fragment(Path::new("preview.wgsl.swp")));
        assert!(!is_fragment(Path::new("notes.txt")));
        assert!(!is_fragment(Path::new("wgsl")));
    }

    #[test]
    fn test_watch_missing_dir_fails() {
        let dir = std::env::temp_dir().join("sdfpad-no-such-watch-dir");
        assert!(FragmentWatcher::new(&dir).is_err());
    }

    #[test]
    fn test_watch_existing_dir() {
        let dir = std::env::temp_dir().join(format!("sdfpad-watch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let watcher = FragmentWatcher::new(&dir).unwrap();
        assert!(watcher.drain_changes().is_empty());

        drop(watcher);
        std::fs::remove_dir_all(&dir).ok();
    }
}
