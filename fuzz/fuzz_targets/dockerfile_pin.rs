#![no_main]

//! Fuzz target for the Dockerfile npm pin patcher.
//!
//! Patching must never panic and must be idempotent for a fixed version.

use libfuzzer_sys::fuzz_target;
use shipwright_edit::update_npm_install;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let once = update_npm_install(content, "@atomist/cli", "1.9.0");
    let twice = update_npm_install(&once, "@atomist/cli", "1.9.0");
    assert_eq!(once, twice);
});
