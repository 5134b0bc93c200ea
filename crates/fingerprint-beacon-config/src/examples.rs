// crates/fingerprint-beacon-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `fingerprint-beacon.toml`. The output is static and
//! must always pass [`crate::FingerprintBeaconConfig::parse`].

/// Returns a canonical example `fingerprint-beacon.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[profiles]
source = "file"
path = "profiles.json"
max_bytes = 1048576
timeout_ms = 5000
# source = "http"
# url = "https://collector.example.com/static/fingerprint/profiles.json"

[engines]
execution = "sequential"
timeout_ms = 10000
denylist = []

[engines.env]
allowlist = ["LANG", "LC_ALL", "TZ", "TERM", "SHELL"]
max_value_bytes = 4096
max_key_bytes = 255

[[engines.files]]
id = "fingerprintjs"
path = "captures/fingerprintjs.json"
max_bytes = 262144

[submission]
enabled = true
mode = "two_step"
origin = "baliza-001"
origin_label = "HTML"
base_url = "https://collector.example.com"
timeout_ms = 5000
max_response_bytes = 65536

[submission.endpoints]
fingerprint = "/webhook/fingerprint"
event = "/balizas/event"
unified = "/fingerprint/collect_baliza"
collect = "/fingerprint/collect"

[audit]
sink = "stderr"
# sink = "file"
# path = "fingerprint-beacon-audit.jsonl"

[environment]
# user_agent = "Mozilla/5.0"
# language = "es-ES"
# timezone = "Europe/Madrid"
# screen = "1920x1080"
# platform = "Linux x86_64"
"#,
    )
}
