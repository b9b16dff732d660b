//! Fuzz target for the DDL splitter and parser.
//!
//! This target feeds arbitrary byte sequences to `parse_schema` to find
//! crashes, panics, and other unexpected behavior.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_schema_parser
//! ```

#![no_main]

use ddlgen_schema::{parse_schema, split_statements};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string, ignoring invalid UTF-8
    if let Ok(input) = std::str::from_utf8(data) {
        // Splitting and parsing never fail, they only skip statements
        let statements = split_statements(input);
        assert!(statements.iter().all(|s| !s.trim().is_empty()));

        let parsed = parse_schema(input);
        assert!(parsed.tables.len() + parsed.skipped.len() <= statements.len());
    }
});
