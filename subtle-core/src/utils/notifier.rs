//! File change notification for watch-triggered widgets.
use crate::errors::Result;
use nix::sys::inotify::{AddWatchFlags, InitFlags, Inotify, WatchDescriptor};
use std::collections::HashMap;
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::path::Path;

/// Non-blocking inotify instance handing out plain integer keys for watches.
pub struct Notifier {
    inotify: Inotify,
    keys: HashMap<WatchDescriptor, u64>,
    next_key: u64,
}

impl Notifier {
    /// # Errors
    ///
    /// Fails when the process is out of inotify instances.
    pub fn new() -> Result<Self> {
        let inotify = Inotify::init(InitFlags::IN_NONBLOCK | InitFlags::IN_CLOEXEC)?;
        Ok(Self {
            inotify,
            keys: HashMap::new(),
            next_key: 1,
        })
    }

    pub fn fd(&self) -> RawFd {
        self.inotify.as_fd().as_raw_fd()
    }

    /// Watch `path` for writes. Returns the key reported by [`Self::read`].
    ///
    /// # Errors
    ///
    /// Fails when the path does not exist or cannot be watched.
    pub fn watch(&mut self, path: &Path) -> Result<u64> {
        let descriptor = self.inotify.add_watch(
            path,
            AddWatchFlags::IN_MODIFY | AddWatchFlags::IN_CLOSE_WRITE,
        )?;
        if let Some(key) = self.keys.get(&descriptor) {
            return Ok(*key);
        }
        let key = self.next_key;
        self.next_key += 1;
        self.keys.insert(descriptor, key);
        Ok(key)
    }

    pub fn unwatch(&mut self, key: u64) {
        let Some(descriptor) = self
            .keys
            .iter()
            .find(|(_, k)| **k == key)
            .map(|(d, _)| *d)
        else {
            return;
        };
        self.keys.remove(&descriptor);
        if let Err(err) = self.inotify.rm_watch(descriptor) {
            tracing::debug!("Removing watch {key} failed: {err}");
        }
    }

    /// Keys of the watches that fired since the last call, without repeats.
    pub fn read(&mut self) -> Vec<u64> {
        let mut fired = vec![];
        loop {
            let events = match self.inotify.read_events() {
                Ok(events) if !events.is_empty() => events,
                Ok(_) | Err(nix::errno::Errno::EAGAIN) => break,
                Err(err) => {
                    tracing::error!("Reading file notifications failed: {err}");
                    break;
                }
            };
            for event in events {
                if event.mask.contains(AddWatchFlags::IN_IGNORED) {
                    // The file went away with its watch.
                    self.keys.remove(&event.wd);
                    continue;
                }
                if let Some(key) = self.keys.get(&event.wd) {
                    if !fired.contains(key) {
                        fired.push(*key);
                    }
                }
            }
        }
        fired
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("fd", &self.fd())
            .field("watches", &self.keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn writes_to_a_watched_file_are_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut notifier = Notifier::new().unwrap();
        let key = notifier.watch(file.path()).unwrap();
        assert!(notifier.read().is_empty());

        writeln!(file, "changed").unwrap();
        file.flush().unwrap();
        assert_eq!(notifier.read(), vec![key]);
    }

    #[test]
    fn unwatched_files_stay_quiet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut notifier = Notifier::new().unwrap();
        let key = notifier.watch(file.path()).unwrap();
        notifier.unwatch(key);
        writeln!(file, "changed").unwrap();
        assert!(notifier.read().is_empty());
    }

    #[test]
    fn missing_files_cannot_be_watched() {
        let mut notifier = Notifier::new().unwrap();
        assert!(notifier.watch(Path::new("/nonexistent/subtle/file")).is_err());
    }
}
