//! Debounced file change events.
//!
//! The debouncer folds create, modify, and delete into one "something
//! changed at this path" notification, so events carry only a path. Every
//! debounce window that saw at least one relevant change produces one
//! [`FileEventBatch`].

use std::time::Instant;

use camino::Utf8PathBuf;
use smallvec::SmallVec;

/// A change at one path.
///
/// # Examples
///
/// ```
/// use rw_watcher::FileEvent;
/// use camino::Utf8PathBuf;
///
/// let event = FileEvent::new(Utf8PathBuf::from("/app/routes/about.svelte"));
/// assert_eq!(event.file_name(), Some("about.svelte"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// Absolute path of the changed file or directory.
    pub path: Utf8PathBuf,

    /// When the event left the debouncer.
    pub timestamp: Instant,
}

impl FileEvent {
    /// Creates an event stamped with the current instant.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf) -> Self {
        Self {
            path,
            timestamp: Instant::now(),
        }
    }

    /// The last path component.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

/// All relevant events from one debounce window.
#[derive(Debug, Clone)]
pub struct FileEventBatch {
    /// The events in this batch.
    pub events: SmallVec<[FileEvent; 8]>,

    /// When this batch was created.
    pub received_at: Instant,
}

impl FileEventBatch {
    /// Creates an empty batch.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: SmallVec::new(),
            received_at: Instant::now(),
        }
    }

    /// Creates a batch from events.
    #[inline]
    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = FileEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            received_at: Instant::now(),
        }
    }

    /// Adds an event to the batch.
    #[inline]
    pub fn push(&mut self, event: FileEvent) {
        self.events.push(event);
    }

    /// Number of events.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the batch holds no events.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &FileEvent> {
        self.events.iter()
    }

    /// Distinct paths, sorted.
    #[must_use]
    pub fn unique_paths(&self) -> Vec<&Utf8PathBuf> {
        let mut paths: Vec<&Utf8PathBuf> = self.events.iter().map(|e| &e.path).collect();
        paths.sort();
        paths.dedup();
        paths
    }
}

impl Default for FileEventBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for FileEventBatch {
    type Item = FileEvent;
    type IntoIter = smallvec::IntoIter<[FileEvent; 8]>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileEventBatch {
    type Item = &'a FileEvent;
    type IntoIter = std::slice::Iter<'a, FileEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<FileEvent> for FileEventBatch {
    fn from_iter<T: IntoIterator<Item = FileEvent>>(iter: T) -> Self {
        Self::from_events(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_paths_dedups() {
        let batch: FileEventBatch = ["/r/b.svelte", "/r/a.svelte", "/r/b.svelte"]
            .into_iter()
            .map(|p| FileEvent::new(Utf8PathBuf::from(p)))
            .collect();

        assert_eq!(batch.len(), 3);
        assert_eq!(
            batch.unique_paths().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            ["/r/a.svelte", "/r/b.svelte"]
        );
    }

    #[test]
    fn test_push_and_iterate() {
        let mut batch = FileEventBatch::default();
        assert!(batch.is_empty());
        batch.push(FileEvent::new(Utf8PathBuf::from("/r/index.svelte")));
        assert_eq!(batch.iter().count(), 1);
        assert_eq!((&batch).into_iter().next().unwrap().file_name(), Some("index.svelte"));
    }
}
