//! `.gocov` settings files and the effective configuration of a run.

use std::path::Path;

use serde::Deserialize;

use crate::error::{GocovError, Result};
use crate::sys::FileSystem;

/// Name of the settings file, both in the module root and the home directory.
pub const CONFIG_FILE: &str = ".gocov";

/// Profile read when no other is configured.
pub const DEFAULT_REPORT_FILE: &str = "coverage.out";

/// Printed by the `config` view when the project has no settings file.
pub const DEFAULT_TEMPLATE: &str = "{\n  \"threshold\": 50,\n  \"ignore\": [\n  ]\n}\n";

/// Contents of a `.gocov` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GocovConfig {
    /// Module-relative path prefixes left out of every view.
    pub ignore: Vec<String>,
    pub threshold: f64,
    /// Pattern whose first capture group is a threshold stated in README.md.
    pub readme_threshold_regex: Option<String>,
    /// The file as read, for the `config` view.
    #[serde(skip)]
    pub contents: Vec<u8>,
}

impl GocovConfig {
    /// Parse a settings file. A literal `null` document counts as absent.
    pub fn parse(contents: &[u8]) -> Result<Option<Self>> {
        let parsed: Option<Self> =
            serde_json::from_slice(contents).map_err(|e| GocovError::InvalidConfig {
                cause: e.to_string(),
            })?;
        Ok(parsed.map(|mut config| {
            config.contents = contents.to_vec();
            config
        }))
    }
}

/// Load the project settings from the module root, if there are any.
pub fn load_project(fs: &dyn FileSystem) -> Result<Option<GocovConfig>> {
    match fs.read(CONFIG_FILE)? {
        Some(contents) => GocovConfig::parse(&contents),
        None => Ok(None),
    }
}

/// Load the per-user settings from `home`. Problems with this file never
/// fail a run; it is skipped instead.
pub fn load_global(home: &Path) -> Option<GocovConfig> {
    let path = home.join(CONFIG_FILE);
    let contents = match std::fs::read(&path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("skipping global config {}: {e}", path.display());
            return None;
        }
    };
    match GocovConfig::parse(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::debug!("skipping global config {}: {e}", path.display());
            None
        }
    }
}

/// Effective settings of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub color: bool,
    /// Deepest tree level the report shows; 0 shows everything.
    pub depth: usize,
    pub with_full_path: bool,
    /// Inspect only an exactly matching path instead of searching.
    pub exact_path: bool,
    pub html_output: bool,
    pub threshold: f64,
    /// Project `.gocov`.
    pub file: Option<GocovConfig>,
    /// Per-user `~/.gocov`.
    pub global: Option<GocovConfig>,
    pub report_file: String,
}

impl Config {
    /// Fill in derived settings. A threshold given on the command line wins
    /// over the project file, which wins over the global file.
    pub fn update(&mut self) {
        self.update_threshold();
        if self.report_file.is_empty() {
            self.report_file = DEFAULT_REPORT_FILE.to_string();
        }
    }

    fn update_threshold(&mut self) {
        if self.threshold != 0.0 {
            log::debug!("threshold {} from the command line", self.threshold);
            return;
        }
        if let Some(file) = self.file.as_ref().filter(|f| f.threshold != 0.0) {
            log::debug!("threshold {} from {CONFIG_FILE}", file.threshold);
            self.threshold = file.threshold;
            return;
        }
        if let Some(global) = self.global.as_ref().filter(|g| g.threshold != 0.0) {
            log::debug!("threshold {} from ~/{CONFIG_FILE}", global.threshold);
            self.threshold = global.threshold;
        }
    }

    /// Ignore prefixes; only the project file can set them.
    pub fn ignore(&self) -> &[String] {
        self.file.as_ref().map_or(&[], |f| f.ignore.as_slice())
    }

    pub fn readme_threshold_regex(&self) -> Option<&str> {
        self.file
            .as_ref()
            .and_then(|f| f.readme_threshold_regex.as_deref())
    }
}
