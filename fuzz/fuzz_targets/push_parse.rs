#![no_main]

//! Fuzz target for push event parsing.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(push) = serde_json::from_str::<shipwright_types::push::PushEvent>(s) {
        // Accessors must not panic on any parsed event.
        let _ = push.slug();
        let _ = push.short_sha();
        let _ = push.is_default_branch();
        let _ = serde_json::to_string(&push);
    }
});
