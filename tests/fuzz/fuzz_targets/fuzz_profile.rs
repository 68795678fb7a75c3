#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Profile parser and aggregation must not panic on any input.
    if let Ok(profile) = gocov::profile::parse(data) {
        let files = gocov::aggregate::Files::from_profile(&profile, "example.com");
        for file in files.iter() {
            assert!(file.covered <= file.all_statements);
        }
    }
});
