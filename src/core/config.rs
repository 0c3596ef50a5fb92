//! Project configuration (`pyship.json`).
//!
//! All fields are optional; a project with no config file gets the defaults
//! and a package name parsed from `setup.py`.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = "pyship.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Package name, used to locate the `<package>.egg-info` directory.
    /// Falls back to the `name=` argument in setup.py when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Python interpreter used for packaging and upload tooling.
    #[serde(default = "default_python")]
    pub python: String,

    /// Directory packaging writes artifacts into.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Local build directory cleaned before packaging.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Additional cache paths to clean, tilde-expanded. Typically external
    /// build caches that live outside the project tree.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_clean_paths: Vec<String>,

    /// Override for the packaging command, run via `sh -c`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,

    /// Twine repository name (`--repository`). None uses twine's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Pass `--skip-existing` to twine so re-runs tolerate published versions.
    #[serde(default)]
    pub skip_existing: bool,
}

fn default_python() -> String {
    "python".to_string()
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_build_dir() -> String {
    "build".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package: None,
            python: default_python(),
            dist_dir: default_dist_dir(),
            build_dir: default_build_dir(),
            extra_clean_paths: Vec::new(),
            build_command: None,
            repository: None,
            skip_existing: false,
        }
    }
}

/// A directory the cleanup phase empties.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanTarget {
    pub label: String,
    pub path: PathBuf,
}

impl ProjectConfig {
    /// Load the project config, or defaults if no config file exists.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", CONFIG_FILE)))
        })?;

        let config: ProjectConfig = serde_json::from_str(&content)
            .map_err(|e| Error::config_invalid_json(path.display().to_string(), e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the config to `pyship.json` in the project directory.
    pub fn save(&self, project_dir: &Path) -> Result<PathBuf> {
        let path = project_dir.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize config".to_string()))
        })?;
        fs::write(&path, content + "\n").map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("write {}", CONFIG_FILE)))
        })?;
        Ok(path)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("python", &self.python),
            ("distDir", &self.dist_dir),
            ("buildDir", &self.build_dir),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config_invalid_value(
                    key,
                    Some(value.clone()),
                    "must not be empty",
                ));
            }
        }

        // Relative dirs must stay inside the project tree.
        for (key, value) in [("distDir", &self.dist_dir), ("buildDir", &self.build_dir)] {
            if Path::new(value).is_absolute() || value.contains("..") {
                return Err(Error::config_invalid_value(
                    key,
                    Some(value.clone()),
                    "must be a relative path inside the project",
                ));
            }
        }

        Ok(())
    }

    /// Package name from config, falling back to `setup.py`.
    pub fn package_name(&self, project_dir: &Path) -> Option<String> {
        if let Some(name) = &self.package {
            return Some(name.clone());
        }

        let setup_py = project_dir.join("setup.py");
        let content = fs::read_to_string(setup_py).ok()?;
        parse_setup_py_name(&content)
    }

    pub fn dist_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.dist_dir)
    }

    /// Egg-info metadata directory, when a package name is known.
    pub fn egg_info_path(&self, project_dir: &Path) -> Option<PathBuf> {
        self.package_name(project_dir)
            .map(|name| project_dir.join(format!("{}.egg-info", name)))
    }

    /// Ordered cleanup targets: build dir, extra cache paths, dist, egg-info.
    ///
    /// A missing package name silently drops the egg-info target; callers that
    /// care surface their own warning.
    pub fn cleanup_targets(&self, project_dir: &Path) -> Result<Vec<CleanTarget>> {
        let mut targets = vec![CleanTarget {
            label: "build".to_string(),
            path: project_dir.join(&self.build_dir),
        }];

        for raw in &self.extra_clean_paths {
            let expanded = shellexpand::tilde(raw);
            let path = PathBuf::from(expanded.as_ref());
            if !path.is_absolute() {
                return Err(Error::config_invalid_value(
                    "extraCleanPaths",
                    Some(raw.clone()),
                    "entries must be absolute paths",
                ));
            }
            targets.push(CleanTarget {
                label: "cache".to_string(),
                path,
            });
        }

        targets.push(CleanTarget {
            label: "dist".to_string(),
            path: self.dist_path(project_dir),
        });

        if let Some(egg_info) = self.egg_info_path(project_dir) {
            targets.push(CleanTarget {
                label: "egg-info".to_string(),
                path: egg_info,
            });
        }

        Ok(targets)
    }
}

/// Extract the `name=` argument from a setup.py source.
pub fn parse_setup_py_name(content: &str) -> Option<String> {
    let re = Regex::new(r#"name\s*=\s*['"]([A-Za-z0-9][A-Za-z0-9._-]*)['"]"#).ok()?;
    re.captures(content).map(|caps| caps[1].to_string())
}
