//! Dataset cache keyed by path and modification time.
//!
//! Snapshots are immutable `Arc<Dataset>` values. Readers clone the `Arc`
//! under a read lock; a (re)load parses outside the lock and swaps the whole
//! entry under the write lock.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::domain::dataset::Dataset;
use crate::domain::error::LakaspiacError;
use crate::ports::dataset_port::DatasetPort;

#[derive(Debug, Clone)]
struct Snapshot {
    modified: SystemTime,
    dataset: Arc<Dataset>,
}

pub struct DatasetCache {
    port: Box<dyn DatasetPort + Send + Sync>,
    entries: RwLock<HashMap<PathBuf, Snapshot>>,
}

impl DatasetCache {
    pub fn new(port: Box<dyn DatasetPort + Send + Sync>) -> Self {
        Self {
            port,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn modified(path: &Path) -> Result<SystemTime, LakaspiacError> {
        let meta = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LakaspiacError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LakaspiacError::Io(e),
        })?;
        Ok(meta.modified()?)
    }

    fn cached(&self, path: &Path) -> Option<Snapshot> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        entries.get(path).cloned()
    }

    fn store(&self, path: &Path, modified: SystemTime) -> Result<Arc<Dataset>, LakaspiacError> {
        let dataset = Arc::new(self.port.load(path)?);
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries.insert(
            path.to_path_buf(),
            Snapshot {
                modified,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// The cached snapshot if the file is unchanged, otherwise a fresh load.
    pub fn get(&self, path: &Path) -> Result<Arc<Dataset>, LakaspiacError> {
        let modified = Self::modified(path)?;
        if let Some(snapshot) = self.cached(path) {
            if snapshot.modified == modified {
                debug!("cache hit for {}", path.display());
                return Ok(snapshot.dataset);
            }
            info!("{} changed on disk, reloading", path.display());
        }
        self.store(path, modified)
    }

    /// Load unconditionally and replace any cached snapshot.
    pub fn reload(&self, path: &Path) -> Result<Arc<Dataset>, LakaspiacError> {
        let modified = Self::modified(path)?;
        info!("reloading {}", path.display());
        self.store(path, modified)
    }

    pub fn invalidate(&self, path: &Path) {
        let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
        entries.remove(path);
    }

    /// Modification time of the cached snapshot, if any.
    pub fn snapshot_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.cached(path).map(|s| DateTime::<Utc>::from(s.modified))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Dataset;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Counts loads and returns an empty dataset.
    struct CountingPort {
        loads: Arc<AtomicUsize>,
    }

    impl DatasetPort for CountingPort {
        fn load(&self, _path: &Path) -> Result<Dataset, LakaspiacError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Dataset::from_records(Vec::new()))
        }
    }

    fn setup() -> (TempDir, PathBuf, DatasetCache, Arc<AtomicUsize>) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "Év,Kerület\n").unwrap();
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = DatasetCache::new(Box::new(CountingPort {
            loads: Arc::clone(&loads),
        }));
        (dir, path, cache, loads)
    }

    #[test]
    fn get_reuses_snapshot_for_unchanged_file() {
        let (_dir, path, cache, loads) = setup();
        let a = cache.get(&path).unwrap();
        let b = cache.get(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.snapshot_time(&path).is_some());
    }

    #[test]
    fn get_reloads_when_mtime_changes() {
        let (_dir, path, cache, loads) = setup();
        cache.get(&path).unwrap();

        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH).unwrap();

        cache.get(&path).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reload_forces_fresh_snapshot() {
        let (_dir, path, cache, loads) = setup();
        let a = cache.get(&path).unwrap();
        let b = cache.reload(&path).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_drops_entry() {
        let (_dir, path, cache, loads) = setup();
        cache.get(&path).unwrap();
        cache.invalidate(&path);
        assert!(cache.is_empty());
        cache.get(&path).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let (dir, _path, cache, loads) = setup();
        let result = cache.get(&dir.path().join("gone.csv"));
        assert!(matches!(result, Err(LakaspiacError::FileNotFound { .. })));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn snapshots_are_shareable_across_threads() {
        let (_dir, path, cache, loads) = setup();
        let cache = Arc::new(cache);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                std::thread::spawn(move || cache.get(&path).unwrap().len())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 0);
        }
        assert!(loads.load(Ordering::SeqCst) >= 1);
    }
}
