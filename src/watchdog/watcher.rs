//! Filesystem-event subscription for the watched document paths.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Message from the OS-event subscription into the watchdog.
#[derive(Debug)]
pub enum WatchMessage {
    /// A watched path was created, modified, or removed.
    Changed(PathBuf),
    /// The underlying event subsystem reported an error; the subscription
    /// may need to be rebuilt.
    Error(notify::Error),
}

/// Normalize a path for event matching: canonical parent directory joined
/// with the file name. Removed files can still be matched this way, since
/// their parent keeps existing.
pub fn normalized(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let parent = parent
        .canonicalize()
        .unwrap_or_else(|_| parent.to_path_buf());
    match path.file_name() {
        Some(name) => parent.join(name),
        None => parent,
    }
}

/// Subscribe to create/modify/remove events for the given paths.
///
/// Watches the deduplicated set of parent directories (non-recursively) and
/// filters events down to the exact watched paths, so documents that do not
/// exist yet are picked up when they appear. The returned watcher must be
/// kept alive for events to keep flowing.
pub fn subscribe(
    paths: &[PathBuf],
    tx: mpsc::UnboundedSender<WatchMessage>,
) -> Result<RecommendedWatcher, notify::Error> {
    let watched: BTreeSet<PathBuf> = paths.iter().map(|p| normalized(p)).collect();
    let dirs: BTreeSet<PathBuf> = watched
        .iter()
        .filter_map(|p| p.parent().map(Path::to_path_buf))
        .collect();

    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| match result {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                for path in &event.paths {
                    let candidate = normalized(path);
                    if watched.contains(&candidate) {
                        let _ = tx.send(WatchMessage::Changed(candidate));
                    }
                }
            }
            Err(error) => {
                let _ = tx.send(WatchMessage::Error(error));
            }
        },
        Config::default(),
    )?;

    for dir in &dirs {
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
    }
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_keeps_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        let normal = normalized(&path);
        assert_eq!(normal.file_name().unwrap(), "p.json");
    }

    #[test]
    fn normalized_agrees_for_relative_and_canonical_spellings() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("p.json");
        let dotted = dir.path().join(".").join("p.json");
        assert_eq!(normalized(&plain), normalized(&dotted));
    }
}
