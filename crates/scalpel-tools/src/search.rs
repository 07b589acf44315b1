//! Recursive regex search across files.
//!
//! Files are read through the encoding codec, so matches land in non-UTF-8
//! files too. Unreadable files are skipped, never fatal.

use crate::error::{ToolError, ToolResult};
use regex::{Regex, RegexBuilder};
use scalpel_core::config::FindConfig;
use scalpel_core::TextDocument;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One matching line.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// Matching line with its terminator stripped.
    pub text: String,
}

/// Caller-side switches.
#[derive(Debug, Default)]
pub struct SearchOptions {
    /// Lower-cased extension filter including the leading dot (".rs").
    pub extensions: Option<Vec<String>>,
    /// Case-sensitive matching; the default is insensitive.
    pub case_sensitive: bool,
    /// Overrides `find.max_results` when set.
    pub max_results: Option<usize>,
}

#[derive(Debug)]
pub struct SearchResults {
    pub matches: Vec<SearchMatch>,
    /// True when the result cap cut the search short.
    pub hit_limit: bool,
    /// The cap that applied.
    pub limit: usize,
}

/// Search `path` (a file or a directory walked recursively) for `pattern`.
///
/// Directory components named in `find.ignore_dirs` are pruned from the
/// walk; the search stops as soon as the result cap is reached.
pub fn search(
    path: &Path,
    pattern: &str,
    config: &FindConfig,
    opts: &SearchOptions,
) -> ToolResult<SearchResults> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(!opts.case_sensitive)
        .build()
        .map_err(|err| ToolError::InvalidPattern(err.to_string()))?;

    if !path.exists() {
        return Err(ToolError::PathNotFound(path.to_path_buf()));
    }

    let limit = opts.max_results.unwrap_or(config.max_results);
    let mut matches = Vec::new();
    let mut hit_limit = false;

    if path.is_file() {
        search_file(path, &regex, limit, &mut matches);
        hit_limit = matches.len() >= limit;
    } else {
        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry, &config.ignore_dirs));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(%err, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(extensions) = &opts.extensions {
                let matched = entry
                    .path()
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                    .is_some_and(|ext| extensions.contains(&ext));
                if !matched {
                    continue;
                }
            }

            if search_file(entry.path(), &regex, limit, &mut matches) {
                hit_limit = true;
                break;
            }
        }
    }

    Ok(SearchResults {
        matches,
        hit_limit,
        limit,
    })
}

/// Scan one file, appending matches up to the cap. Returns true when the
/// cap cut the scan short.
fn search_file(path: &Path, regex: &Regex, limit: usize, matches: &mut Vec<SearchMatch>) -> bool {
    let doc = match TextDocument::read(path) {
        Ok(doc) => doc,
        Err(err) => {
            debug!(file = %path.display(), %err, "skipping unreadable file");
            return false;
        }
    };

    for (index, line) in doc.lines.iter().enumerate() {
        if matches.len() >= limit {
            return true;
        }
        if regex.is_match(line) {
            matches.push(SearchMatch {
                path: path.to_path_buf(),
                line: index + 1,
                text: line.trim_end_matches(['\n', '\r']).to_string(),
            });
        }
    }

    false
}

fn is_ignored(entry: &walkdir::DirEntry, ignore_dirs: &[String]) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| ignore_dirs.iter().any(|dir| dir == name))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> FindConfig {
        FindConfig {
            ignore_dirs: vec![".git".to_string(), "skipme".to_string()],
            max_results: 100,
        }
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "hello world\nTODO fix this\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.rs"), "// TODO later\nfn main() {}\n").unwrap();
        fs::create_dir(dir.path().join("skipme")).unwrap();
        fs::write(dir.path().join("skipme/c.txt"), "TODO hidden\n").unwrap();
        dir
    }

    #[test]
    fn test_recursive_search_prunes_ignored_dirs() {
        let dir = tree();
        let results = search(dir.path(), "TODO", &config(), &SearchOptions::default()).unwrap();

        assert_eq!(results.matches.len(), 2);
        assert!(!results
            .matches
            .iter()
            .any(|m| m.path.to_string_lossy().contains("skipme")));
        assert!(!results.hit_limit);
    }

    #[test]
    fn test_match_fields() {
        let dir = tree();
        let results = search(dir.path(), "fix", &config(), &SearchOptions::default()).unwrap();

        assert_eq!(results.matches.len(), 1);
        let m = &results.matches[0];
        assert_eq!(m.line, 2);
        assert_eq!(m.text, "TODO fix this");
    }

    #[test]
    fn test_extension_filter() {
        let dir = tree();
        let opts = SearchOptions {
            extensions: Some(vec![".rs".to_string()]),
            ..Default::default()
        };
        let results = search(dir.path(), "TODO", &config(), &opts).unwrap();

        assert_eq!(results.matches.len(), 1);
        assert!(results.matches[0].path.to_string_lossy().ends_with("b.rs"));
    }

    #[test]
    fn test_case_sensitivity() {
        let dir = tree();

        let insensitive = search(dir.path(), "todo", &config(), &SearchOptions::default()).unwrap();
        assert_eq!(insensitive.matches.len(), 2);

        let opts = SearchOptions {
            case_sensitive: true,
            ..Default::default()
        };
        let sensitive = search(dir.path(), "todo", &config(), &opts).unwrap();
        assert!(sensitive.matches.is_empty());
    }

    #[test]
    fn test_result_cap() {
        let dir = TempDir::new().unwrap();
        let lines: String = (0..10).map(|i| format!("match {i}\n")).collect();
        fs::write(dir.path().join("many.txt"), lines).unwrap();

        let opts = SearchOptions {
            max_results: Some(3),
            ..Default::default()
        };
        let results = search(dir.path(), "match", &config(), &opts).unwrap();

        assert_eq!(results.matches.len(), 3);
        assert!(results.hit_limit);
        assert_eq!(results.limit, 3);
    }

    #[test]
    fn test_single_file_search() {
        let dir = tree();
        let file = dir.path().join("a.txt");
        let results = search(&file, "hello", &config(), &SearchOptions::default()).unwrap();

        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.matches[0].line, 1);
    }

    #[test]
    fn test_missing_path() {
        let dir = TempDir::new().unwrap();
        let result = search(
            &dir.path().join("absent"),
            "x",
            &config(),
            &SearchOptions::default(),
        );
        assert!(matches!(result, Err(ToolError::PathNotFound(_))));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tree();
        let result = search(dir.path(), "(unclosed", &config(), &SearchOptions::default());
        assert!(matches!(result, Err(ToolError::InvalidPattern(_))));
    }
}
