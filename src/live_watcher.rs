use log::{error, info};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

/// Quiet period after the last event before a reload fires
const DEBOUNCE: Duration = Duration::from_millis(80);

/// Skip editor swap files and similar transient writes
fn is_transient(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| {
            n.ends_with(".swp") || n.ends_with(".tmp") || n.ends_with('~') || n == "4913"
        })
}

/// Watches the data file and reports when it changes
pub struct LiveWatcher {
    watcher: RecommendedWatcher,
    watch_dir: PathBuf,
    last_event: Arc<Mutex<Option<Instant>>>,
    /// Set when the data file (or its SQLite journal) changed and hasn't been processed
    pending: Arc<Mutex<bool>>,
    /// Called on the UI thread once changes have settled
    on_change: Arc<dyn Fn() + Send + Sync>,
}

impl LiveWatcher {
    pub fn new(
        data_path: PathBuf,
        on_event: Arc<dyn Fn() + Send + Sync>,
        on_change: Arc<dyn Fn() + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let watch_dir = data_path
            .parent()
            .map(Path::to_path_buf)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = data_path.file_name().map(|n| n.to_os_string());

        let pending = Arc::new(Mutex::new(false));
        let pending_clone = pending.clone();
        let last_event = Arc::new(Mutex::new(None));
        let last_event_clone = last_event.clone();

        let config = Config::default().with_poll_interval(Duration::from_millis(100));

        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, _>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove())
                    {
                        return;
                    }
                    // Match the file itself plus SQLite's -wal/-journal siblings
                    let relevant = event.paths.iter().any(|path| {
                        !is_transient(path)
                            && match (&file_name, path.file_name()) {
                                (Some(ours), Some(theirs)) => theirs
                                    .to_string_lossy()
                                    .starts_with(&*ours.to_string_lossy()),
                                _ => false,
                            }
                    });
                    if relevant {
                        *last_event_clone.lock() = Some(Instant::now());
                        *pending_clone.lock() = true;
                        on_event();
                    }
                }
                Err(e) => error!("File watcher error: {:?}", e),
            },
            config,
        )?;

        Ok(Self {
            watcher,
            watch_dir,
            last_event,
            pending,
            on_change,
        })
    }

    /// Start watching, creating the data directory if it doesn't exist yet
    pub fn start(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.watch_dir)?;
        self.watcher
            .watch(&self.watch_dir, RecursiveMode::NonRecursive)?;
        info!(
            "Watching directory for live updates: {}",
            self.watch_dir.display()
        );
        Ok(())
    }

    /// Fire `on_change` once no new events arrived for the debounce window
    pub fn process_changes(&self) {
        let mut pending = self.pending.lock();
        if !*pending {
            return;
        }

        if let Some(last_event) = *self.last_event.lock() {
            if last_event.elapsed() < DEBOUNCE {
                return;
            }
        }

        *pending = false;
        drop(pending);
        (self.on_change)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_watcher(data_path: PathBuf) -> (LiveWatcher, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let watcher = LiveWatcher::new(
            data_path,
            Arc::new(|| {}),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
        (watcher, fired)
    }

    #[test]
    fn test_transient_files_are_skipped() {
        assert!(is_transient(Path::new("/data/snapshot.json.swp")));
        assert!(is_transient(Path::new("/data/snapshot.json~")));
        assert!(is_transient(Path::new("/data/snapshot.json.tmp")));
        assert!(is_transient(Path::new("/data/4913")));
        assert!(!is_transient(Path::new("/data/snapshot.json")));
        assert!(!is_transient(Path::new("/data/health.db-wal")));
        // only the file name counts, not the directories above it
        assert!(!is_transient(Path::new("/home/u/.tmpdata/health-dash/snapshot.json")));
        assert!(!is_transient(Path::new("/tmp/.tmpAb12/snapshot.json")));
        assert!(!is_transient(Path::new("/srv/4913-archive/snapshot.json")));
    }

    #[test]
    fn test_start_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("health-dash");
        let (mut watcher, _) = counting_watcher(data_dir.join("snapshot.json"));
        assert!(!data_dir.exists());
        watcher.start().unwrap();
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_changes_fire_once_after_settling() {
        let dir = tempfile::tempdir().unwrap();
        let (watcher, fired) = counting_watcher(dir.path().join("snapshot.json"));

        // nothing pending
        watcher.process_changes();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // a fresh event is still inside the quiet period
        *watcher.pending.lock() = true;
        *watcher.last_event.lock() = Some(Instant::now());
        watcher.process_changes();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(*watcher.pending.lock());

        *watcher.last_event.lock() = Instant::now().checked_sub(DEBOUNCE * 3);
        watcher.process_changes();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!*watcher.pending.lock());

        watcher.process_changes();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
