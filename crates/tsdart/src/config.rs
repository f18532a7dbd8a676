//! Configuration for tsdart.
//!
//! Loads config from:
//! 1. Global: ~/.config/tsdart/config.toml
//! 2. Per-project: .tsdart/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [output]
//! path = "out.dart"
//!
//! [log]
//! filter = "tsdart=debug"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where translated output goes.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the result to this file instead of stdout.
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive. `RUST_LOG` takes precedence.
    pub filter: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TsdartConfig {
    pub output: OutputConfig,
    pub log: LogConfig,
}

impl TsdartConfig {
    /// Load configuration for a project rooted at `root`.
    pub fn load(root: &Path) -> Self {
        Self::load_with_global(Self::global_config_path().as_deref(), root)
    }

    fn load_with_global(global_path: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global_path.and_then(Self::load_file) {
            config = config.merge(global);
        }

        // Per-project config overrides global
        let project_path = root.join(".tsdart").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("tsdart").join("config.toml"))
    }

    /// Missing or malformed files yield `None`.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Values set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            output: OutputConfig {
                path: other.output.path.or(self.output.path),
            },
            log: LogConfig {
                filter: other.log.filter.or(self.log.filter),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = TsdartConfig::load_with_global(None, dir.path());
        assert_eq!(config, TsdartConfig::default());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".tsdart"),
            r#"
[output]
path = "out.dart"
"#,
        );

        let config = TsdartConfig::load_with_global(None, dir.path());
        assert_eq!(config.output.path, Some(PathBuf::from("out.dart")));
        assert_eq!(config.log.filter, None);
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = write_config(
            &dir.path().join("global"),
            r#"
[output]
path = "global.dart"

[log]
filter = "debug"
"#,
        );
        write_config(
            &dir.path().join(".tsdart"),
            r#"
[output]
path = "project.dart"
"#,
        );

        let config = TsdartConfig::load_with_global(Some(&global), dir.path());
        assert_eq!(config.output.path, Some(PathBuf::from("project.dart")));
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_malformed_config_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join(".tsdart"), "[output\npath = ");
        let config = TsdartConfig::load_with_global(None, dir.path());
        assert_eq!(config, TsdartConfig::default());
    }
}
