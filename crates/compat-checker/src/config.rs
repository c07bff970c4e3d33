//! Checker configuration: entry point and per-step time bounds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-step timing for the check sequence. Timeouts are per step, not
/// per request; worst-case latency is their sum.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Entry URL of the carrier's BYOD flow.
    pub entry_url: String,

    /// Sentinel ZIP typed into the optional entry prompt.
    pub zip_code: String,

    /// Short bound for the optional ZIP prompt; its absence is normal.
    pub zip_prompt_timeout_ms: u64,

    /// Pause after typing the ZIP so client-side validation can enable
    /// the continue control.
    pub zip_settle_ms: u64,

    /// Bound for the identifier field and the check button.
    pub field_timeout_ms: u64,

    /// Bound for the inline results panel after triggering the check.
    pub results_timeout_ms: u64,

    /// Pause after the click so a modal dialog gets a chance to render
    /// before the inline panel is consulted.
    pub dialog_settle_ms: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            entry_url: "https://prepaid.t-mobile.com/bring-your-own-device?brand=TMOPrepaid"
                .to_string(),
            zip_code: "33129".to_string(),
            zip_prompt_timeout_ms: 4_000,
            zip_settle_ms: 1_000,
            field_timeout_ms: 10_000,
            results_timeout_ms: 5_000,
            dialog_settle_ms: 500,
        }
    }
}

impl CheckerConfig {
    pub fn zip_prompt_timeout(&self) -> Duration {
        Duration::from_millis(self.zip_prompt_timeout_ms)
    }

    pub fn zip_settle(&self) -> Duration {
        Duration::from_millis(self.zip_settle_ms)
    }

    pub fn field_timeout(&self) -> Duration {
        Duration::from_millis(self.field_timeout_ms)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    pub fn dialog_settle(&self) -> Duration {
        Duration::from_millis(self.dialog_settle_ms)
    }
}
