//! Project discovery and `unb.toml` configuration.
//!
//! A project is the nearest directory, walking up from the working directory, that contains
//! [`CONFIG_FILE`]. Every key in the file is optional.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker and configuration file of a project root.
pub const CONFIG_FILE: &str = "unb.toml";

static CURRENT: OnceCell<Option<Project>> = OnceCell::new();

/// Errors raised while loading project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `unb.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Requirements file installed by `install-requirements`.
    pub requirements: PathBuf,
    pub dev_requirements: PathBuf,
    /// File holding the project's semantic version.
    pub version_file: PathBuf,
    /// Interpreter used to run `manage.py`.
    pub python: String,
    /// Linter command line; the project root is appended.
    pub lint: Vec<String>,
    /// Value for `DJANGO_SETTINGS_MODULE` when running management commands.
    pub django_settings: Option<String>,
    /// Named command lines run by `unb b <name>`.
    pub scripts: BTreeMap<String, String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            requirements: PathBuf::from("requirements.txt"),
            dev_requirements: PathBuf::from("dev-requirements.txt"),
            version_file: PathBuf::from("VERSION"),
            python: "python".to_string(),
            lint: vec!["flake8".to_string()],
            django_settings: None,
            scripts: BTreeMap::new(),
        }
    }
}

/// A discovered project root with its configuration.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Finds the project containing `start`, if any.
    pub fn discover(start: &Path) -> Result<Option<Self>, ConfigError> {
        match start.ancestors().find(|dir| dir.join(CONFIG_FILE).is_file()) {
            Some(root) => Self::load(root).map(Some),
            None => Ok(None),
        }
    }

    /// Loads the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("loaded project config {}", path.display());
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolves a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// A Django project keeps `manage.py` at its root.
    pub fn is_django(&self) -> bool {
        self.root.join("manage.py").is_file()
    }
}

/// Discovers the project around the working directory, once per process.
pub fn init() -> anyhow::Result<()> {
    CURRENT.get_or_try_init(|| {
        let cwd = std::env::current_dir()?;
        let project = Project::discover(&cwd)?;
        if project.is_none() {
            tracing::debug!("no {CONFIG_FILE} found above {}", cwd.display());
        }
        anyhow::Ok(project)
    })?;
    Ok(())
}

/// The project found by [`init`], if any.
pub fn current() -> Option<&'static Project> {
    CURRENT.get().and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_discover_walks_up() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "python = \"python3\"\n").unwrap();
        let nested = dir.path().join("app").join("views");
        fs::create_dir_all(&nested).unwrap();

        let project = Project::discover(&nested).unwrap().unwrap();
        assert_eq!(project.root(), dir.path());
        assert_eq!(project.config().python, "python3");
        assert_eq!(project.config().version_file, PathBuf::from("VERSION"));
        assert_eq!(project.resolve(Path::new("VERSION")), dir.path().join("VERSION"));
    }

    #[test]
    fn test_discover_without_config() {
        let dir = tempdir().unwrap();
        assert!(Project::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_scripts_table() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "lint = [\"ruff\", \"check\"]\n\n[scripts]\ntest = \"cargo test\"\n",
        )
        .unwrap();
        let project = Project::load(dir.path()).unwrap();
        assert_eq!(project.config().lint, ["ruff", "check"]);
        assert_eq!(
            project.config().scripts.get("test").map(String::as_str),
            Some("cargo test")
        );
        assert!(!project.is_django());
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "python = [").unwrap();
        let err = Project::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "pyhton = \"x\"\n").unwrap();
        assert!(Project::load(dir.path()).is_err());
    }
}
