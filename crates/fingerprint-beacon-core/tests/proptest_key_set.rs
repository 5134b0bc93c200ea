// crates/fingerprint-beacon-core/tests/proptest_key_set.rs
// ============================================================================
// Module: Envelope Key Set Property Tests
// Description: Envelope engines always mirror the profile's declared engines.
// ============================================================================
//! ## Overview
//! Generates random engine selections and behaviors and checks the key set,
//! the disabled markers, and loader laziness.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::Behavior;
use common::RecordingAudit;
use common::ScriptedLoader;
use common::orchestrator;
use common::report;
use fingerprint_beacon_core::EngineId;
use fingerprint_beacon_core::EngineSelection;
use fingerprint_beacon_core::ExecutionMode;
use fingerprint_beacon_core::Profile;
use fingerprint_beacon_core::ProfileId;
use proptest::prelude::*;
use serde_json::json;

/// Per-engine scenario: (enabled, registered, fails).
fn engine_strategy() -> impl Strategy<Value = Vec<(bool, bool, bool)>> {
    prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn envelope_keys_match_profile(engines in engine_strategy(), concurrent in any::<bool>()) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let mut loader = ScriptedLoader::new();
        let mut selection = Vec::new();
        for (index, (enabled, registered, fails)) in engines.iter().enumerate() {
            let id = format!("engine-{index}");
            if *registered {
                let behavior = if *fails {
                    Behavior::Fail("scripted".to_string())
                } else {
                    Behavior::Succeed(report(&id, 0.5, json!({"index": index})))
                };
                loader = loader.with(&id, behavior);
            }
            selection.push((EngineId::new(id), *enabled));
        }
        let profile = Profile::new(
            ProfileId::new("generated"),
            EngineSelection::new(selection.clone()).unwrap(),
            "sha256",
        );
        let loader = Arc::new(loader);
        let mode = if concurrent { ExecutionMode::Concurrent } else { ExecutionMode::Sequential };
        let orchestrator = orchestrator(
            Arc::clone(&loader),
            Arc::new(RecordingAudit::default()),
            mode,
            Duration::from_secs(5),
        );

        let envelope = runtime.block_on(orchestrator.orchestrate(&profile)).unwrap();

        let keys: Vec<EngineId> = envelope.engines().keys().cloned().collect();
        let declared: Vec<EngineId> = selection.iter().map(|(id, _)| id.clone()).collect();
        prop_assert_eq!(keys, declared);
        for (id, enabled) in &selection {
            let outcome = envelope.engines().get(id).unwrap();
            prop_assert_eq!(outcome.is_disabled(), !enabled);
            if !enabled {
                prop_assert_eq!(loader.load_count(id.as_str()), 0);
            }
        }
        let enabled_count = selection.iter().filter(|(_, enabled)| *enabled).count();
        prop_assert_eq!(loader.total_loads(), enabled_count);
    }
}
