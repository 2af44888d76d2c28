#![no_main]

//! Fuzz target for the license header rewriter.
//!
//! Upserting must never panic and must be idempotent: classifying the
//! updated content again reports up-to-date.

use libfuzzer_sys::fuzz_target;
use shipwright_edit::{HeaderAction, has_different_header, upsert_header};

const HEADER: &str = "/*\n * Copyright © 2026 Shipwright Authors\n */";

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let _ = has_different_header(HEADER, content);

    if let HeaderAction::Updated(updated) = upsert_header(HEADER, content) {
        assert_eq!(upsert_header(HEADER, &updated), HeaderAction::UpToDate);
    }
});
