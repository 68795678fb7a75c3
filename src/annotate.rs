//! Highlight uncovered blocks in a source file and pick which file to show.

use std::cmp::Reverse;
use std::fmt::Write;

use crate::aggregate::Files;
use crate::error::{GocovError, Result};
use crate::model::{digits_count, CoverageRecord, FileCoverage};

/// Strings spliced around every uncovered block.
#[derive(Debug, Clone, Copy)]
pub struct Markers<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

/// Red-on-terminal markers used by the inspect view.
pub const TERMINAL_MARKERS: Markers<'static> = Markers {
    start: "\x1b[0;31m",
    end: "\x1b[0m",
};

/// Split `source` into lines and wrap every block that never ran in
/// `markers`.
///
/// Blocks are processed from the bottom of the file upwards and, within a
/// line, right to left. A block pointing outside the source yields
/// [`GocovError::InconsistentCoverageData`]: the file changed after the
/// profile was written.
pub fn annotate(source: &str, file: &FileCoverage, markers: &Markers<'_>) -> Result<Vec<String>> {
    annotate_with(source, file, markers, str::to_string)
}

/// Like [`annotate`], but every run of source text between markers goes
/// through `escape` while the markers are inserted verbatim.
pub fn annotate_with(
    source: &str,
    file: &FileCoverage,
    markers: &Markers<'_>,
    escape: impl Fn(&str) -> String,
) -> Result<Vec<String>> {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut points: Vec<Vec<(usize, &str)>> = vec![Vec::new(); lines.len()];

    let mut uncovered: Vec<&CoverageRecord> = file.records().filter(|r| !r.is_covered()).collect();
    uncovered.sort_by_key(|r| (Reverse(r.end_line), Reverse(r.start_column)));

    for record in uncovered {
        place(&lines, &mut points, record.end_line, record.end_column, markers.end)?;
        place(&lines, &mut points, record.start_line, record.start_column, markers.start)?;
    }

    Ok(lines
        .iter()
        .zip(&points)
        .map(|(line, points)| {
            let mut out = String::with_capacity(line.len());
            let mut from = 0;
            for &(offset, marker) in points {
                out.push_str(&escape(&line[from..offset]));
                out.push_str(marker);
                from = offset;
            }
            out.push_str(&escape(&line[from..]));
            out
        })
        .collect())
}

/// Put `marker` before the 1-based `column` of the 1-based `line`, ahead of
/// any marker already placed at that column.
fn place<'m>(
    lines: &[&str],
    points: &mut [Vec<(usize, &'m str)>],
    line: usize,
    column: usize,
    marker: &'m str,
) -> Result<()> {
    let index = line
        .checked_sub(1)
        .filter(|&index| index < lines.len())
        .ok_or(GocovError::InconsistentCoverageData)?;
    let offset = column
        .checked_sub(1)
        .filter(|&offset| lines[index].is_char_boundary(offset))
        .ok_or(GocovError::InconsistentCoverageData)?;
    let line_points = &mut points[index];
    let at = line_points.partition_point(|&(placed, _)| placed < offset);
    line_points.insert(at, (offset, marker));
    Ok(())
}

/// Prefix every line with its right-aligned, 1-based number.
pub fn number_lines(lines: &[String]) -> String {
    let width = digits_count(lines.len() as u64);
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        writeln!(out, "{:>width$}| {line}", index + 1).unwrap();
    }
    out
}

/// The on-disk location of a module-relative path: the first segment is the
/// module's own directory, which is the working directory.
#[must_use]
pub fn target_file(path: &str) -> &str {
    match path.split_once('/') {
        Some((_, rest)) => rest,
        None => path,
    }
}

/// A file picked for inspection.
#[derive(Debug)]
pub struct Selection<'f> {
    pub file: &'f FileCoverage,
    /// Path to read the source from.
    pub target: String,
    /// Other files that matched a fuzzy search.
    pub skipped: usize,
}

/// Select the file whose module-relative path is exactly `path`.
pub fn find_exact<'f>(files: &'f Files, path: &str) -> Result<Selection<'f>> {
    let file = files.get(path).ok_or_else(|| GocovError::NotFound {
        path: path.to_string(),
    })?;
    Ok(Selection {
        file,
        target: target_file(&file.path).to_string(),
        skipped: 0,
    })
}

/// Select the lexicographically first file whose module-relative path
/// contains `query`.
pub fn find_fuzzy<'f>(files: &'f Files, query: &str) -> Result<Selection<'f>> {
    let mut matches = files.iter().filter(|f| f.path.contains(query));
    let file = matches.next().ok_or_else(|| GocovError::NoMatch {
        query: query.to_string(),
    })?;
    let skipped = matches.count();
    if skipped > 0 {
        log::warn!("{query:?} matched {} files, showing {}", skipped + 1, file.path);
    }
    Ok(Selection {
        file,
        target: target_file(&file.path).to_string(),
        skipped,
    })
}
