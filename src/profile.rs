/// Parser for the statement coverage profile written by `go test -coverprofile`.
///
/// Format:
///   mode: set|count|atomic
///   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStatements> <count>
///
/// Each record line describes one block. Records for the same file need not
/// be contiguous and the same block may show up more than once when several
/// packages were instrumented together; the parser keeps them all, in the
/// order they appear, and leaves deduplication to the aggregator.
use std::io::BufRead;

use crate::error::{GocovError, Result};
use crate::model::CoverageRecord;

const HEADER_PREFIX: &str = "mode: ";

/// A parsed profile: the declared mode and every (file, record) pair.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub mode: String,
    pub entries: Vec<(String, CoverageRecord)>,
}

/// Parse a coverage profile from raw bytes.
pub fn parse(input: &[u8]) -> Result<Profile> {
    parse_reader(&mut &*input)
}

/// Parse a coverage profile line by line from a buffered reader.
pub fn parse_reader(reader: &mut dyn BufRead) -> Result<Profile> {
    let mut raw_line = Vec::new();

    if reader.read_until(b'\n', &mut raw_line)? == 0 {
        return Err(GocovError::InvalidProfileHeader);
    }
    let mode = std::str::from_utf8(&raw_line)
        .ok()
        .and_then(|header| header.trim_end_matches(['\r', '\n']).strip_prefix(HEADER_PREFIX))
        .ok_or(GocovError::InvalidProfileHeader)?
        .to_string();
    log::debug!("coverage profile mode: {mode}");

    let mut entries = Vec::new();
    let mut line_number = 1;
    loop {
        raw_line.clear();
        if reader.read_until(b'\n', &mut raw_line)? == 0 {
            break;
        }
        line_number += 1;
        let malformed = GocovError::MalformedRecord { line: line_number };

        let Ok(line) = std::str::from_utf8(&raw_line) else {
            return Err(malformed);
        };
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }

        let (file, record) = parse_record_line(line).ok_or(malformed)?;
        entries.push((file.to_string(), record));
    }

    log::debug!("parsed {} coverage records", entries.len());
    Ok(Profile { mode, entries })
}

/// Split a record line into its file path and record.
///
/// The numeric part never contains a colon, so anchoring on the last one
/// keeps paths with colons intact.
fn parse_record_line(line: &str) -> Option<(&str, CoverageRecord)> {
    let colon = line.rfind(':')?;
    let file = &line[..colon];
    if file.is_empty() {
        return None;
    }
    let record = parse_record(&line[colon + 1..])?;
    Some((file, record))
}

/// Parse `startLine.startCol,endLine.endCol numStmt count` in a single scan.
///
/// Fields are split at any of ` `, `.` and `,` and assigned by position.
/// Anything other than exactly six integer fields is rejected, as is a
/// statement count that does not fit in 32 bits, so per-file and tree
/// totals stay far from `u64::MAX`.
pub fn parse_record(fields: &str) -> Option<CoverageRecord> {
    let mut values = [0u64; 6];
    let mut count = 0;

    for part in fields.split(|c: char| c == ' ' || c == '.' || c == ',') {
        if count == values.len() {
            return None;
        }
        values[count] = part.parse().ok()?;
        count += 1;
    }
    if count != values.len() {
        return None;
    }

    let [start_line, start_column, end_line, end_column, statements, hits] = values;
    Some(CoverageRecord {
        start_line: usize::try_from(start_line).ok()?,
        start_column: usize::try_from(start_column).ok()?,
        end_line: usize::try_from(end_line).ok()?,
        end_column: usize::try_from(end_column).ok()?,
        statements: u32::try_from(statements).ok()?.into(),
        hits,
    })
}
