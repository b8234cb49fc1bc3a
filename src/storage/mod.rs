pub mod config;
pub mod ledger;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "TODO_LEDGER_HOME";

/// Data directory: `$TODO_LEDGER_HOME`, else `~/.todo-ledger/`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".todo-ledger")
}

/// Make sure the data directory exists
pub fn ensure_data_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Load and deserialize a TOML file
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Serialize to TOML and replace `path` atomically (temp file + rename).
pub fn save_toml<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = toml::to_string_pretty(data)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_toml_round_trip_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.toml");
        let sample = Sample {
            name: "tasks".to_string(),
            count: 3,
        };

        save_toml(&path, &sample).unwrap();
        let loaded: Sample = load_toml(&path).unwrap();
        assert_eq!(loaded, sample);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_load_toml_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "name = [").unwrap();
        let result: Result<Sample> = load_toml(&path);
        assert!(matches!(result, Err(crate::error::TodoError::TomlParse(_))));
    }
}
