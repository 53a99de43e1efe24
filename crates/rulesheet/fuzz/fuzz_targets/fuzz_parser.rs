//! Fuzz target for the sheet parser.
//!
//! The CSV/TSV parser must never panic on malformed input, whatever
//! delimiter it ends up detecting.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rulesheet::input::Parser;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let parser = Parser::new();
            if let Ok((sheet, _)) = parser.parse_file(temp_file.path()) {
                let _ = rulesheet::Rulesheet::new().normalize_rows(&sheet);
            }
        }
    }
});
