//! Path utilities.

use std::path::{Path, PathBuf};

/// Get the scalpel configuration directory.
///
/// This follows XDG conventions on Linux/macOS:
/// - `$XDG_CONFIG_HOME/scalpel` if set
/// - `~/.config/scalpel` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("scalpel"))
}

/// Walk upward from `start` looking for a file named `file_name`.
///
/// Returns the first hit, nearest directory wins.
pub fn find_upward(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Render a path relative to the current directory when possible.
///
/// Keeps user-facing messages short; falls back to the path as given.
pub fn display_relative(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_dir() {
        let dir = config_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().ends_with("scalpel"));
    }

    #[test]
    fn test_find_upward() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("a/marker.yml"), "x: 1\n").unwrap();

        let found = find_upward(&nested, "marker.yml");
        assert_eq!(found, Some(dir.path().join("a/marker.yml")));
    }

    #[test]
    fn test_find_upward_missing() {
        let dir = tempdir().unwrap();
        assert_eq!(find_upward(dir.path(), "no-such-file.yml"), None);
    }

    #[test]
    fn test_display_relative_outside_cwd() {
        // A path outside the working directory is rendered as given.
        let rendered = display_relative(Path::new("/definitely/not/under/cwd.txt"));
        assert_eq!(rendered, "/definitely/not/under/cwd.txt");
    }
}
