#![no_main]
use libfuzzer_sys::fuzz_target;

use gocov::annotate::{annotate, TERMINAL_MARKERS};
use gocov::model::FileCoverage;

fuzz_target!(|data: &[u8]| {
    // First line is a record, the rest the source. Annotating must fail
    // cleanly, never panic, when the record does not fit the source.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (record, source) = text.split_once('\n').unwrap_or((text, ""));
    let Some(record) = gocov::profile::parse_record(record) else {
        return;
    };
    let mut file = FileCoverage::new("example.com/m/a.go".to_string());
    file.add(record);
    let _ = annotate(source, &file, &TERMINAL_MARKERS);
});
