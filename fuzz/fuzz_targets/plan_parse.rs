#![no_main]

//! Fuzz target for plan.json parsing.
//!
//! Fuzzes `ShipwrightPlan` deserialization with arbitrary JSON bytes to
//! ensure the parser handles malformed input gracefully.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let result = serde_json::from_str::<shipwright_types::plan::ShipwrightPlan>(s);

    if let Ok(plan) = result {
        let _ = serde_json::to_string(&plan);
        let _ = serde_json::to_string_pretty(&plan);
    }

    let _ = serde_json::from_str::<shipwright_types::plan::PlanPolicy>(s);
    let _ = serde_json::from_str::<shipwright_types::plan::PlanSummary>(s);
    let _ = serde_json::from_str::<shipwright_types::goal::PlannedGoal>(s);
    let _ = serde_json::from_str::<shipwright_types::wire::PlanV1>(s);
});
