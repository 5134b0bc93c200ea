// crates/fingerprint-beacon-engines/src/system.rs
// ============================================================================
// Module: Host Context Providers
// Description: Wall-clock and host environment implementations for the core.
// Purpose: Supply session metadata fields that are not measured by engines.
// Dependencies: fingerprint-beacon-core, time
// ============================================================================

//! ## Overview
//! [`SystemClock`] reads UTC wall-clock time. [`HostEnvironment`] derives the
//! contextual session fields (user agent, language, timezone, screen,
//! platform) from the process environment, with per-field overrides taking
//! precedence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use fingerprint_beacon_core::Clock;
use fingerprint_beacon_core::EnvironmentProbe;
use fingerprint_beacon_core::EnvironmentSnapshot;
use fingerprint_beacon_core::ScreenDimensions;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// UTC wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Per-field overrides for the host snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentOverrides {
    /// User-agent string.
    pub user_agent: Option<String>,
    /// Preferred locale (BCP 47).
    pub language: Option<String>,
    /// IANA timezone identifier.
    pub timezone: Option<String>,
    /// Screen dimensions.
    pub screen: Option<ScreenDimensions>,
    /// Platform string.
    pub platform: Option<String>,
}

/// Environment probe backed by the running process.
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    /// Values replacing detected fields.
    overrides: EnvironmentOverrides,
}

impl HostEnvironment {
    /// Creates a probe with the given overrides.
    #[must_use]
    pub const fn new(overrides: EnvironmentOverrides) -> Self {
        Self {
            overrides,
        }
    }
}

impl EnvironmentProbe for HostEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        let overrides = self.overrides.clone();
        EnvironmentSnapshot {
            user_agent: overrides.user_agent.unwrap_or_else(default_user_agent),
            language: overrides.language.unwrap_or_else(detect_language),
            timezone: overrides.timezone.unwrap_or_else(detect_timezone),
            screen: overrides.screen,
            platform: overrides.platform.unwrap_or_else(default_platform),
        }
    }
}

// ============================================================================
// SECTION: Detection
// ============================================================================

/// `fingerprint-beacon/<version> (<os>; <arch>)`.
fn default_user_agent() -> String {
    format!(
        "fingerprint-beacon/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// `<os> <arch>`.
fn default_platform() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Locale from `LC_ALL` then `LANG`, defaulting to `en-US`.
fn detect_language() -> String {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|value| posix_locale_to_tag(&value))
        .unwrap_or_else(|| "en-US".to_string())
}

/// Timezone from `TZ`, defaulting to `UTC`.
fn detect_timezone() -> String {
    std::env::var("TZ")
        .ok()
        .map(|value| value.trim_start_matches(':').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "UTC".to_string())
}

/// Converts `es_ES.UTF-8@euro` into `es-ES`; `C`/`POSIX` yield nothing.
pub(crate) fn posix_locale_to_tag(value: &str) -> Option<String> {
    let base = value.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
