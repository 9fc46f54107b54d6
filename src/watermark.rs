use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;

/// Persists the last-processed timestamp, the only state that survives a
/// run. The stored value must be monotonically non-decreasing across
/// successful runs; the coordinator enforces that by only ever writing the
/// run's captured start time after confirmed delivery.
pub struct WatermarkStore {
    path: PathBuf,
    lookback_secs: i64,
}

impl WatermarkStore {
    pub fn new(path: impl Into<PathBuf>, lookback_secs: i64) -> Self {
        Self { path: path.into(), lookback_secs }
    }

    /// The stored watermark, or `None` when the file is missing or its
    /// content does not parse. Garbage content is a re-initialization case,
    /// not a fatal error.
    pub fn read(&self) -> Option<i64> {
        let content = fs::read_to_string(&self.path).ok()?;
        match content.trim().parse::<i64>() {
            Ok(ts) => Some(ts),
            Err(_) => {
                warn!(
                    "Watermark file {} holds unparseable content; treating as uninitialized",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Write the watermark with all-or-nothing visibility: the value lands
    /// in a temp file in the same directory, is synced, then renamed over
    /// the target. A reader can never observe a truncated value.
    pub fn write(&self, ts: i64) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("watermark");
        let tmp_path = parent.join(format!(".{file_name}.tmp.{}", std::process::id()));

        {
            let mut tmp = fs::File::create(&tmp_path)?;
            tmp.write_all(ts.to_string().as_bytes())?;
            tmp.sync_all()?;
        }

        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
        Ok(())
    }

    /// The watermark to gate this run on. A missing or unreadable value is
    /// initialized to `now - lookback` and persisted immediately, so a crash
    /// right after never replays the same unbounded first-run window.
    pub fn load_or_init(&self, now: i64) -> Result<i64> {
        if let Some(ts) = self.read() {
            return Ok(ts);
        }
        let initial = now - self.lookback_secs;
        info!(
            "No watermark at {}; initializing to {} ({}s back)",
            self.path.display(),
            initial,
            self.lookback_secs
        );
        self.write(initial)?;
        Ok(initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> WatermarkStore {
        WatermarkStore::new(dir.join("last_run"), 3600)
    }

    #[test]
    fn missing_file_reads_none() {
        let dir = tempdir().unwrap();
        assert_eq!(store_in(dir.path()).read(), None);
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.write(1_700_000_000).unwrap();
        assert_eq!(store.read(), Some(1_700_000_000));
    }

    #[test]
    fn garbage_content_reads_none() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(dir.path().join("last_run"), "not-a-number").unwrap();
        assert_eq!(store.read(), None);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(dir.path().join("last_run"), "1700000000\n").unwrap();
        assert_eq!(store.read(), Some(1_700_000_000));
    }

    #[test]
    fn load_or_init_applies_lookback_and_persists() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let got = store.load_or_init(10_000).unwrap();
        assert_eq!(got, 10_000 - 3600);
        // The initialized value must already be durable.
        assert_eq!(store.read(), Some(10_000 - 3600));
    }

    #[test]
    fn load_or_init_prefers_existing_value() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.write(5_000).unwrap();
        assert_eq!(store.load_or_init(10_000).unwrap(), 5_000);
    }

    #[test]
    fn overwrite_replaces_previous_value() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.write(1_000).unwrap();
        store.write(2_000).unwrap();
        assert_eq!(store.read(), Some(2_000));
    }
}
