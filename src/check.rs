//! Pass/fail threshold check against the project's total coverage.

use regex::Regex;

use crate::config::Config;
use crate::error::{GocovError, Result, ThresholdOrigin};
use crate::sys::FileSystem;

pub const README_FILE: &str = "README.md";

/// Fail unless `actual` meets the effective threshold and, when the project
/// settings name a README pattern, the threshold stated in README.md too.
pub fn check(actual: f64, config: &Config, fs: &dyn FileSystem) -> Result<()> {
    if config.file.is_none() {
        return Err(GocovError::ThresholdConfigMissing);
    }
    if actual < config.threshold {
        return Err(GocovError::ThresholdNotMet {
            expected: config.threshold,
            actual,
            origin: ThresholdOrigin::Config,
        });
    }

    let Some(pattern) = config.readme_threshold_regex() else {
        return Ok(());
    };
    let expected = readme_threshold(fs, pattern)?;
    log::debug!("threshold {expected} from {README_FILE}");
    if actual < expected {
        return Err(GocovError::ThresholdNotMet {
            expected,
            actual,
            origin: ThresholdOrigin::Readme,
        });
    }
    Ok(())
}

/// Find the threshold stated in README.md: the first capture group of the
/// first line matching `pattern`.
pub fn readme_threshold(fs: &dyn FileSystem, pattern: &str) -> Result<f64> {
    let readme = fs.read(README_FILE)?.ok_or(GocovError::ReadmeMissing)?;
    let re = Regex::new(pattern).map_err(GocovError::InvalidReadmeRegex)?;

    let text = String::from_utf8_lossy(&readme);
    let value = text
        .lines()
        .find_map(|line| re.captures(line)?.get(1).map(|m| m.as_str().to_string()))
        .ok_or(GocovError::ReadmeThresholdMissing)?;

    value
        .trim()
        .parse()
        .map_err(|_| GocovError::InvalidReadmeThreshold { value })
}
