//! Layered configuration.
//!
//! Values merge from three layers, later layers winning per dotted key:
//! 1. Built-in defaults
//! 2. Global config: `<config_dir>/scalpel/config.yml`
//! 3. Project config: `scalpel.yml`, found by walking up from the working
//!    directory
//!
//! The resolved [`Config`] is constructed once at process start and passed
//! into components explicitly; there is no process-wide singleton.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Project-level configuration file name, searched upward from the working
/// directory.
pub const PROJECT_CONFIG_FILE: &str = "scalpel.yml";

/// A parsed configuration scalar.
///
/// YAML values land in an explicit tagged variant; the typed accessors fall
/// back to the supplied default when the stored variant does not match, so a
/// mistyped key degrades predictably instead of coercing.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn as_bool(&self, default: bool) -> bool {
        match self {
            Self::Bool(value) => *value,
            _ => default,
        }
    }

    pub fn as_int(&self, default: i64) -> i64 {
        match self {
            Self::Int(value) => *value,
            _ => default,
        }
    }

    pub fn as_float(&self, default: f64) -> f64 {
        match self {
            Self::Float(value) => *value,
            Self::Int(value) => *value as f64,
            _ => default,
        }
    }

    pub fn as_str(&self, default: &str) -> String {
        match self {
            Self::Str(value) => value.clone(),
            _ => default.to_string(),
        }
    }

    pub fn as_list(&self, default: &[String]) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            _ => default.to_vec(),
        }
    }

    fn from_yaml(value: &serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_yaml::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_yaml::Value::String(s) => Some(Self::Str(s.clone())),
            serde_yaml::Value::Sequence(items) => Some(Self::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// Flat table of dotted keys (`backup.enabled`) to parsed values, the
/// intermediate form every configuration layer merges into.
#[derive(Debug, Clone, Default)]
pub struct ConfigTable {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigTable {
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).map_or(default, |v| v.as_bool(default))
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).map_or(default, |v| v.as_int(default))
    }

    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        usize::try_from(self.get_int(key, default as i64)).unwrap_or(default)
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.values.get(key).map_or_else(|| default.to_string(), |v| v.as_str(default))
    }

    pub fn get_list(&self, key: &str, default: &[String]) -> Vec<String> {
        self.values.get(key).map_or_else(|| default.to_vec(), |v| v.as_list(default))
    }

    /// Merge one YAML document into the table. Section mappings flatten to
    /// dotted keys; top-level scalars keep their bare key.
    pub fn merge_yaml(&mut self, text: &str) -> Result<(), serde_yaml::Error> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text)?;

        let serde_yaml::Value::Mapping(sections) = doc else {
            return Ok(());
        };

        for (section_key, section_value) in &sections {
            let Some(section) = section_key.as_str() else {
                continue;
            };

            match section_value {
                serde_yaml::Value::Mapping(entries) => {
                    for (key, value) in entries {
                        let Some(name) = key.as_str() else { continue };
                        if let Some(parsed) = ConfigValue::from_yaml(value) {
                            self.values.insert(format!("{section}.{name}"), parsed);
                        }
                    }
                }
                other => {
                    if let Some(parsed) = ConfigValue::from_yaml(other) {
                        self.values.insert(section.to_string(), parsed);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Backup retention settings.
#[derive(Debug, Clone, Serialize)]
pub struct BackupConfig {
    /// Gate the automatic pre-edit snapshot.
    pub enabled: bool,
    /// Backup subdirectory name, created next to each edited file.
    pub dir: String,
    /// Retention ceiling per file; oldest snapshots are evicted beyond it.
    pub max_backups: usize,
}

/// Edit engine settings.
#[derive(Debug, Clone, Serialize)]
pub struct EditConfig {
    /// Line-count threshold above which a delete requires an override.
    pub confirm_large_delete: usize,
    /// Allow editing a file that does not exist yet.
    pub create_if_missing: bool,
}

/// View command settings.
#[derive(Debug, Clone, Serialize)]
pub struct ViewConfig {
    /// Cap on whole-file output before truncation.
    pub max_lines: usize,
    /// Width of the right-aligned line number gutter.
    pub number_width: usize,
}

/// Search settings.
#[derive(Debug, Clone, Serialize)]
pub struct FindConfig {
    /// Directory names pruned from recursive walks.
    pub ignore_dirs: Vec<String>,
    /// Result cap across the whole search.
    pub max_results: usize,
}

/// Resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub backup: BackupConfig,
    pub edit: EditConfig,
    pub view: ViewConfig,
    pub find: FindConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup: BackupConfig {
                enabled: true,
                dir: ".aibackup".to_string(),
                max_backups: 20,
            },
            edit: EditConfig {
                confirm_large_delete: 50,
                create_if_missing: false,
            },
            view: ViewConfig {
                max_lines: 500,
                number_width: 5,
            },
            find: FindConfig {
                ignore_dirs: [
                    ".git",
                    "node_modules",
                    "__pycache__",
                    ".aibackup",
                    ".venv",
                    "venv",
                    "target",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                max_results: 100,
            },
        }
    }
}

impl Config {
    /// Load the merged configuration for a process working in `cwd`.
    ///
    /// Unreadable or unparsable layers are skipped with a logged warning;
    /// loading itself never fails.
    pub fn load(cwd: &Path) -> Self {
        let mut table = ConfigTable::default();

        if let Some(global) = scalpel_util::path::config_dir().map(|d| d.join("config.yml")) {
            merge_file(&mut table, &global);
        }

        if let Some(project) = scalpel_util::path::find_upward(cwd, PROJECT_CONFIG_FILE) {
            merge_file(&mut table, &project);
        }

        Self::from_table(&table)
    }

    /// Resolve a merged table against the built-in defaults.
    pub fn from_table(table: &ConfigTable) -> Self {
        let defaults = Config::default();

        Config {
            backup: BackupConfig {
                enabled: table.get_bool("backup.enabled", defaults.backup.enabled),
                dir: table.get_str("backup.dir", &defaults.backup.dir),
                max_backups: table.get_usize("backup.max_backups", defaults.backup.max_backups),
            },
            edit: EditConfig {
                confirm_large_delete: table.get_usize(
                    "edit.confirm_large_delete",
                    defaults.edit.confirm_large_delete,
                ),
                create_if_missing: table
                    .get_bool("edit.create_if_missing", defaults.edit.create_if_missing),
            },
            view: ViewConfig {
                max_lines: table.get_usize("view.max_lines", defaults.view.max_lines),
                number_width: table.get_usize("view.number_width", defaults.view.number_width),
            },
            find: FindConfig {
                ignore_dirs: table.get_list("find.ignore_dirs", &defaults.find.ignore_dirs),
                max_results: table.get_usize("find.max_results", defaults.find.max_results),
            },
        }
    }
}

fn merge_file(table: &mut ConfigTable, path: &Path) {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return,
    };

    if let Err(err) = table.merge_yaml(&text) {
        warn!(path = %path.display(), %err, "skipping unparsable config file");
    }
}
