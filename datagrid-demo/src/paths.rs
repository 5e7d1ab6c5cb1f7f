//! Where the demo keeps its config file and session logs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use directories::ProjectDirs;

const CONFIG_FILE: &str = "grid.json";
const CURRENT_LOG: &str = "latest.log";
const ARCHIVE_PREFIX: &str = "session-";

/// Archived session logs kept after rotation.
const KEEP_SESSIONS: usize = 10;

/// The demo's config and log directories.
#[derive(Debug, Clone)]
pub struct DemoDirs {
    config: PathBuf,
    logs: PathBuf,
}

impl DemoDirs {
    /// Platform locations: XDG on Linux, `Library/` on macOS, `AppData` on Windows.
    pub fn locate() -> Option<Self> {
        let dirs = ProjectDirs::from("dev", "datagrid", "datagrid-demo")?;
        Some(Self {
            config: dirs.config_dir().to_path_buf(),
            logs: dirs.cache_dir().join("logs"),
        })
    }

    /// Both directories under one root.
    #[cfg(test)]
    fn under(root: &Path) -> Self {
        Self {
            config: root.join("config"),
            logs: root.join("logs"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs.join(CURRENT_LOG)
    }

    /// Archive the previous session's log under `now`, then drop all but the
    /// newest archives. Creates the log directory if needed.
    pub fn rotate_logs<Tz: TimeZone>(&self, now: DateTime<Tz>) -> io::Result<()>
    where
        Tz::Offset: std::fmt::Display,
    {
        fs::create_dir_all(&self.logs)?;

        let current = self.log_file();
        if current.exists() {
            let stamp = now.format("%Y%m%d-%H%M%S%.3f");
            fs::rename(&current, self.logs.join(format!("{ARCHIVE_PREFIX}{stamp}.log")))?;
        }

        for stale in stale_archives(&self.logs, KEEP_SESSIONS)? {
            if let Err(e) = fs::remove_file(&stale) {
                log::warn!("Could not remove old log {}: {}", stale.display(), e);
            }
        }
        Ok(())
    }
}

/// Archived logs in `dir` beyond the newest `keep`.
///
/// Archive names embed a zero-padded timestamp, so name order is age order.
fn stale_archives(dir: &Path, keep: usize) -> io::Result<Vec<PathBuf>> {
    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"))
        })
        .collect();
    archives.sort();
    let excess = archives.len().saturating_sub(keep);
    archives.truncate(excess);
    Ok(archives)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, Utc};

    fn scratch(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("datagrid-demo-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        root
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_files_live_in_their_dirs() {
        let dirs = DemoDirs::under(Path::new("/tmp/x"));
        assert_eq!(dirs.config_file(), Path::new("/tmp/x/config/grid.json"));
        assert_eq!(dirs.log_file(), Path::new("/tmp/x/logs/latest.log"));
    }

    #[test]
    fn test_rotate_archives_current_log() {
        let root = scratch("rotate");
        let dirs = DemoDirs::under(&root);

        // Nothing to archive on first run
        dirs.rotate_logs(Utc::now()).unwrap();
        assert!(file_names(&root.join("logs")).is_empty());

        fs::write(dirs.log_file(), "first session").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        dirs.rotate_logs(now).unwrap();

        assert_eq!(
            file_names(&root.join("logs")),
            vec!["session-20260304-050607.000.log"]
        );
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_rotate_keeps_newest_sessions() {
        let root = scratch("prune");
        let dirs = DemoDirs::under(&root);
        fs::create_dir_all(root.join("logs")).unwrap();
        fs::write(root.join("logs/notes.txt"), "").unwrap();

        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for day in 0..(KEEP_SESSIONS as i64 + 3) {
            fs::write(dirs.log_file(), "").unwrap();
            dirs.rotate_logs(start + Duration::days(day)).unwrap();
        }

        let names = file_names(&root.join("logs"));
        assert_eq!(names.len(), KEEP_SESSIONS + 1);
        assert!(names.contains(&"notes.txt".to_string()));
        assert!(!names.contains(&"session-20260101-000000.000.log".to_string()));
        assert!(names.contains(&"session-20260113-000000.000.log".to_string()));
        fs::remove_dir_all(&root).unwrap();
    }
}
