//! Fold parsed profile records into one `FileCoverage` per source file.

use std::collections::BTreeMap;

use crate::error::{GocovError, Result};
use crate::model::{CoverageRecord, FileCoverage};
use crate::profile::Profile;

const MODULE_PREFIX: &str = "module ";

/// Read the module path from the first line of a module descriptor
/// (`module example.com/user/project`).
pub fn parse_module(descriptor: &[u8]) -> Result<String> {
    let text = String::from_utf8_lossy(descriptor);
    let first = text.lines().next().unwrap_or_default();
    let module = first
        .strip_prefix(MODULE_PREFIX)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(GocovError::InvalidModuleDescriptor)?;
    Ok(module.to_string())
}

/// Directory containing the module, in import path form. Profile paths are
/// made relative to it, so the module's own name stays as the first segment.
///
/// A module path without a slash has no parent and nothing gets stripped.
#[must_use]
pub fn module_dir(module: &str) -> &str {
    match module.trim_end_matches('/').rfind('/') {
        Some(index) => &module[..index],
        None => "",
    }
}

/// Whether a module-relative path falls under one of the ignore prefixes.
#[must_use]
pub fn is_ignored(path: &str, ignore: &[String]) -> bool {
    ignore.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// Per-invocation collection of file coverage, keyed by profile path.
#[derive(Debug, Default)]
pub struct Aggregator {
    files: BTreeMap<String, FileCoverage>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: &str, record: CoverageRecord) {
        if let Some(existing) = self.files.get_mut(file) {
            existing.add(record);
            return;
        }
        let mut coverage = FileCoverage::new(file.to_string());
        coverage.add(record);
        self.files.insert(file.to_string(), coverage);
    }

    /// Compute totals and module-relative paths, consuming the aggregator.
    pub fn finish(self, module_dir: &str) -> Files {
        let prefix = if module_dir.is_empty() {
            String::new()
        } else {
            format!("{module_dir}/")
        };

        let files = self
            .files
            .into_values()
            .map(|mut file| {
                file.calc();
                file.path = file
                    .name
                    .strip_prefix(prefix.as_str())
                    .unwrap_or(&file.name)
                    .to_string();
                (file.path.clone(), file)
            })
            .collect();
        Files { files }
    }
}

/// Finalized coverage for every file in the profile, keyed by module-relative
/// path.
#[derive(Debug, Default)]
pub struct Files {
    files: BTreeMap<String, FileCoverage>,
}

impl Files {
    /// Aggregate a parsed profile in one go.
    pub fn from_profile(profile: &Profile, module_dir: &str) -> Self {
        let mut aggregator = Aggregator::new();
        for (file, record) in &profile.entries {
            aggregator.add(file, *record);
        }
        aggregator.finish(module_dir)
    }

    pub fn get(&self, path: &str) -> Option<&FileCoverage> {
        self.files.get(path)
    }

    /// Files in ascending module-relative path order.
    pub fn iter(&self) -> impl Iterator<Item = &FileCoverage> {
        self.files.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
