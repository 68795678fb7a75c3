//! In-memory representation of a statement-level coverage profile. The
//! parser produces `CoverageRecord`s, the aggregator folds them into one
//! `FileCoverage` per source file, and the path tree sums those up.

use std::collections::BTreeMap;

/// Compute a coverage percentage, returning 0.0 when there are no statements.
#[must_use]
pub fn percent(covered: u64, all: u64) -> f64 {
    if all == 0 {
        0.0
    } else {
        covered as f64 * 100.0 / all as f64
    }
}

/// Number of decimal digits needed to print `num`.
#[must_use]
pub fn digits_count(mut num: u64) -> usize {
    if num == 0 {
        return 1;
    }
    let mut digits = 0;
    while num != 0 {
        num /= 10;
        digits += 1;
    }
    digits
}

/// Severity band a coverage percentage falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Ok,
    Warn,
    Error,
}

impl Band {
    #[must_use]
    pub fn of(percent: f64) -> Self {
        if percent >= 80.0 {
            Band::Ok
        } else if percent >= 50.0 {
            Band::Warn
        } else {
            Band::Error
        }
    }
}

/// One block of the profile: a source range, its statement count and how
/// many times it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageRecord {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub statements: u64,
    pub hits: u64,
}

/// Identity of a record for deduplication. The hit count is deliberately
/// not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub statements: u64,
}

impl CoverageRecord {
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey {
            start_line: self.start_line,
            start_column: self.start_column,
            end_line: self.end_line,
            end_column: self.end_column,
            statements: self.statements,
        }
    }

    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.hits > 0
    }
}

/// Coverage data for a single source file.
#[derive(Debug, Clone, Default)]
pub struct FileCoverage {
    /// Path as it appears in the profile (import path form).
    pub name: String,
    /// Path relative to the module's parent directory.
    pub path: String,
    pub all_statements: u64,
    pub covered: u64,
    pub percent: f64,
    records: BTreeMap<RecordKey, CoverageRecord>,
}

impl FileCoverage {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Add a record; a record with the same key replaces the earlier one.
    pub fn add(&mut self, record: CoverageRecord) {
        self.records.insert(record.key(), record);
    }

    /// Recompute totals from the deduplicated records.
    pub fn calc(&mut self) {
        self.all_statements = self.records.values().map(|r| r.statements).sum();
        self.covered = self
            .records
            .values()
            .filter(|r| r.is_covered())
            .map(|r| r.statements)
            .sum();
        self.percent = percent(self.covered, self.all_statements);
    }

    pub fn records(&self) -> impl Iterator<Item = &CoverageRecord> {
        self.records.values()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
