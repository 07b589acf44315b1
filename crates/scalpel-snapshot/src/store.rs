//! Snapshot storage implementation.
//!
//! Layout, per target file's parent directory:
//! ```text
//! <parent>/<backup-dir>/<basename>.<YYYYMMDD_HHMMSS>[.<sanitized-tag>]
//! ```
//! One flat directory; lexicographic name order equals chronological order
//! because timestamps are fixed-width and zero-padded.

use crate::error::{SnapshotError, SnapshotResult};
use chrono::Local;
use scalpel_core::config::BackupConfig;
use scalpel_core::diff;
use scalpel_core::TextDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Tag used for the automatic safety snapshot taken before a restore.
const PRE_RESTORE_TAG: &str = "pre-restore";

/// One retained snapshot of a target file.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    /// Full path inside the backup directory.
    pub path: PathBuf,
    /// Snapshot file name: `<basename>.<timestamp>[.<tag>]`.
    pub name: String,
}

/// Storage for per-file snapshots.
pub struct SnapshotStore {
    config: BackupConfig,
}

impl SnapshotStore {
    pub fn new(config: BackupConfig) -> Self {
        Self { config }
    }

    /// The backup directory belonging to `file`'s parent directory.
    pub fn backup_dir(&self, file: &Path) -> PathBuf {
        let parent = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        parent.join(&self.config.dir)
    }

    /// Create a snapshot of `file`, then enforce retention.
    ///
    /// The copy is byte-for-byte and carries over the source's modification
    /// time. Returns the snapshot's path.
    pub fn save(&self, file: &Path, tag: Option<&str>) -> SnapshotResult<PathBuf> {
        if !file.is_file() {
            return Err(SnapshotError::file_not_found(file));
        }

        let dir = self.backup_dir(file);
        fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let dest = dir.join(snapshot_name(file, tag, &timestamp));

        copy_preserving_mtime(file, &dest)?;
        debug!(snapshot = %dest.display(), "saved snapshot");

        self.prune(file);
        Ok(dest)
    }

    /// All snapshots of `file`, oldest first.
    ///
    /// An absent backup directory or a file without snapshots yields an
    /// empty set, not an error.
    pub fn list(&self, file: &Path) -> SnapshotResult<Vec<SnapshotEntry>> {
        let dir = self.backup_dir(file);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}.", basename(file));
        let mut entries = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) {
                entries.push(SnapshotEntry {
                    path: entry.path(),
                    name,
                });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Evict the oldest snapshots of `file` beyond the retention ceiling.
    ///
    /// Best-effort hygiene: failures are reported to the log sink and
    /// skipped, never surfaced to the caller.
    pub fn prune(&self, file: &Path) {
        let mut entries = match self.list(file) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(file = %file.display(), %err, "cannot list snapshots for pruning");
                return;
            }
        };

        while entries.len() > self.config.max_backups {
            let oldest = entries.remove(0);
            if let Err(err) = fs::remove_file(&oldest.path) {
                warn!(snapshot = %oldest.path.display(), %err, "failed to prune snapshot");
            }
        }
    }

    /// Resolve a snapshot of `file`.
    ///
    /// With a tag, the tag is sanitized exactly as at creation time and the
    /// set is scanned newest-first for the first name containing it as a
    /// substring; if two tags are substrings of each other, the most recent
    /// match wins. Without a tag, the most recent snapshot is returned.
    pub fn resolve(&self, file: &Path, tag: Option<&str>) -> SnapshotResult<PathBuf> {
        let entries = self.list(file)?;

        let latest = match entries.last() {
            Some(entry) => entry.path.clone(),
            None => return Err(SnapshotError::no_backups(file)),
        };

        match tag {
            None => Ok(latest),
            Some(tag) => {
                let needle = sanitize_tag(tag);
                entries
                    .iter()
                    .rev()
                    .find(|entry| entry.name.contains(&needle))
                    .map(|entry| entry.path.clone())
                    .ok_or_else(|| SnapshotError::tag_not_found(tag))
            }
        }
    }

    /// Restore `file` from a snapshot.
    ///
    /// The current state is snapshotted first under the `pre-restore` tag
    /// (skipped only when the file does not exist), so restoration is
    /// itself always undoable. Returns the path restored from.
    pub fn restore(&self, file: &Path, tag: Option<&str>) -> SnapshotResult<PathBuf> {
        let source = self.resolve(file, tag)?;

        if file.is_file() {
            self.save(file, Some(PRE_RESTORE_TAG))?;
        }

        copy_preserving_mtime(&source, file)?;
        Ok(source)
    }

    /// Unified diff between the most recent snapshot and the current file
    /// content, both read through the codec.
    pub fn diff_latest(&self, file: &Path) -> SnapshotResult<Vec<String>> {
        let latest = self.resolve(file, None)?;

        if !file.is_file() {
            return Err(SnapshotError::file_not_found(file));
        }

        let backup = TextDocument::read(&latest)?;
        let current = TextDocument::read(file)?;

        let label_a = format!("backup: {}", basename(&latest));
        let label_b = format!("current: {}", file.display());
        Ok(diff::unified_diff(
            &label_a,
            &backup.lines,
            &label_b,
            &current.lines,
        ))
    }
}

fn basename(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Snapshot file name for `file` at `timestamp`, with the sanitized tag
/// appended when present.
fn snapshot_name(file: &Path, tag: Option<&str>, timestamp: &str) -> String {
    let base = basename(file);
    match tag {
        Some(tag) => format!("{base}.{timestamp}.{}", sanitize_tag(tag)),
        None => format!("{base}.{timestamp}"),
    }
}

/// Tags keep alphanumerics, `-`, and `_`; every other character becomes `_`.
pub fn sanitize_tag(tag: &str) -> String {
    tag.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Byte copy that also carries over the source's modification time.
fn copy_preserving_mtime(src: &Path, dest: &Path) -> std::io::Result<()> {
    let modified = fs::metadata(src)?.modified()?;
    fs::copy(src, dest)?;

    let dest_file = fs::OpenOptions::new().write(true).open(dest)?;
    dest_file.set_modified(modified)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(max_backups: usize) -> SnapshotStore {
        SnapshotStore::new(BackupConfig {
            enabled: true,
            dir: ".aibackup".to_string(),
            max_backups,
        })
    }

    fn write_target(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("target.txt");
        fs::write(&path, content).unwrap();
        path
    }

    /// Plant a snapshot file directly, bypassing `save`, so tests control
    /// timestamps.
    fn plant(store: &SnapshotStore, file: &Path, suffix: &str, content: &str) {
        let dir = store.backup_dir(file);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("target.txt.{suffix}")), content).unwrap();
    }

    #[test]
    fn test_save_copies_bytes() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "original content\n");
        let store = store(20);

        let dest = store.save(&file, None).unwrap();
        assert!(dest.starts_with(store.backup_dir(&file)));
        assert_eq!(fs::read(&dest).unwrap(), b"original content\n");
    }

    #[test]
    fn test_save_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store(20);
        let result = store.save(&dir.path().join("absent.txt"), None);
        assert!(matches!(result, Err(SnapshotError::FileNotFound(_))));
    }

    #[test]
    fn test_save_sanitizes_tag() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        let dest = store.save(&file, Some("before refactor!")).unwrap();
        let name = dest.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with(".before_refactor_"), "{name}");
    }

    #[test]
    fn test_list_empty_without_backup_dir() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        assert!(store(20).list(&file).unwrap().is_empty());
    }

    #[test]
    fn test_list_is_chronological_and_prefix_filtered() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        plant(&store, &file, "20250102_090000", "b");
        plant(&store, &file, "20250101_090000", "a");
        plant(&store, &file, "20250103_090000.tagged", "c");
        // Unrelated file in the same backup directory.
        fs::write(store.backup_dir(&file).join("other.txt.20250101_090000"), "z").unwrap();

        let entries = store.list(&file).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "target.txt.20250101_090000",
                "target.txt.20250102_090000",
                "target.txt.20250103_090000.tagged",
            ]
        );
    }

    #[test]
    fn test_prune_keeps_most_recent() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(3);

        for day in 1..=5 {
            plant(&store, &file, &format!("2025010{day}_090000"), "s");
        }

        store.prune(&file);

        let names: Vec<_> = store
            .list(&file)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "target.txt.20250103_090000",
                "target.txt.20250104_090000",
                "target.txt.20250105_090000",
            ]
        );
    }

    #[test]
    fn test_save_triggers_retention() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(2);

        plant(&store, &file, "20250101_090000", "old");
        plant(&store, &file, "20250102_090000", "mid");

        store.save(&file, None).unwrap();

        let entries = store.list(&file).unwrap();
        assert_eq!(entries.len(), 2);
        // The oldest planted snapshot was evicted; the fresh one survives.
        assert!(!entries.iter().any(|e| e.name.contains("20250101")));
    }

    #[test]
    fn test_resolve_latest() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000", "a");
        plant(&store, &file, "20250102_090000", "b");

        let resolved = store.resolve(&file, None).unwrap();
        assert_eq!(fs::read(&resolved).unwrap(), b"b");
    }

    #[test]
    fn test_resolve_no_backups() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let result = store(20).resolve(&file, None);
        assert!(matches!(result, Err(SnapshotError::NoBackups(_))));
    }

    #[test]
    fn test_resolve_tag_newest_first_substring() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000.pre", "exact");
        plant(&store, &file, "20250102_090000.pre-restore", "longer");

        // "pre" is a substring of the later "pre-restore" name, and the
        // newest match wins.
        let resolved = store.resolve(&file, Some("pre")).unwrap();
        assert_eq!(fs::read(&resolved).unwrap(), b"longer");
    }

    #[test]
    fn test_resolve_tag_sanitized_before_matching() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000.my_tag", "s");

        // "my tag" sanitizes to "my_tag" and matches.
        let resolved = store.resolve(&file, Some("my tag")).unwrap();
        assert_eq!(fs::read(&resolved).unwrap(), b"s");
    }

    #[test]
    fn test_resolve_tag_not_found() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000.other", "s");

        let result = store.resolve(&file, Some("missing"));
        assert!(matches!(result, Err(SnapshotError::TagNotFound(_))));
    }

    #[test]
    fn test_restore_takes_safety_snapshot() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "current state\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000", "old state\n");

        let source = store.restore(&file, None).unwrap();
        assert!(source.to_string_lossy().contains("20250101_090000"));
        assert_eq!(fs::read(&file).unwrap(), b"old state\n");

        // The pre-restore safety snapshot holds the overwritten state.
        let entries = store.list(&file).unwrap();
        let safety = entries
            .iter()
            .find(|e| e.name.contains("pre-restore"))
            .expect("safety snapshot");
        assert_eq!(fs::read(&safety.path).unwrap(), b"current state\n");
    }

    #[test]
    fn test_restore_unknown_tag_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "current state\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000", "old state\n");

        let result = store.restore(&file, Some("nope"));
        assert!(matches!(result, Err(SnapshotError::TagNotFound(_))));
        assert_eq!(fs::read(&file).unwrap(), b"current state\n");
        // No safety snapshot churn either.
        assert_eq!(store.list(&file).unwrap().len(), 1);
    }

    #[test]
    fn test_restore_missing_file_skips_safety_snapshot() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        plant(&store, &file, "20250101_090000", "restored\n");
        fs::remove_file(&file).unwrap();

        store.restore(&file, None).unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"restored\n");
        assert_eq!(store.list(&file).unwrap().len(), 1);
    }

    #[test]
    fn test_same_tag_twice_does_not_collide() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        store.save(&file, Some("work")).unwrap();
        // Names carry second-resolution timestamps; step past the boundary.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        store.save(&file, Some("work")).unwrap();

        let entries = store.list(&file).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.name.ends_with(".work")));
    }

    #[test]
    fn test_save_preserves_mtime() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "x\n");
        let store = store(20);

        let modified = fs::metadata(&file).unwrap().modified().unwrap();
        let dest = store.save(&file, None).unwrap();
        assert_eq!(fs::metadata(&dest).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_diff_latest() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "line 1\nline 2\nline 3\n");
        let store = store(20);

        store.save(&file, None).unwrap();
        fs::write(&file, "line 1\nmodified\nline 3\n").unwrap();

        let records = store.diff_latest(&file).unwrap();
        assert!(records.iter().any(|r| r == "-line 2"));
        assert!(records.iter().any(|r| r == "+modified"));
    }

    #[test]
    fn test_diff_latest_identical() {
        let dir = TempDir::new().unwrap();
        let file = write_target(&dir, "same\n");
        let store = store(20);

        store.save(&file, None).unwrap();
        assert!(store.diff_latest(&file).unwrap().is_empty());
    }

    #[test]
    fn test_sanitize_tag() {
        assert_eq!(sanitize_tag("before-refactor"), "before-refactor");
        assert_eq!(sanitize_tag("a b/c"), "a_b_c");
        assert_eq!(sanitize_tag("v1.2"), "v1_2");
        assert_eq!(sanitize_tag("ok_tag-9"), "ok_tag-9");
    }
}
