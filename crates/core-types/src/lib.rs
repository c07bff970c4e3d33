//! Shared primitives for the BYOD compatibility checker: the validated
//! IMEI identifier and the typed outcome of a compatibility check.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Raised when a raw identifier fails format or checksum validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid IMEI: {reason}")]
pub struct InvalidImei {
    pub reason: String,
}

/// A validated 15-digit IMEI. Construction goes through [`Imei::parse`],
/// so holding one implies both the format and the Luhn checksum held.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Imei(String);

impl Imei {
    /// Parse and validate a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, InvalidImei> {
        if raw.len() != 15 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidImei {
                reason: "expected exactly 15 decimal digits".to_string(),
            });
        }
        if !luhn_checksum_ok(raw) {
            return Err(InvalidImei {
                reason: "checksum mismatch".to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    /// The pure `validate(raw) -> bool` gate, applied before any
    /// automation session is opened.
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Imei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Standard telecom Luhn check: from the rightmost digit moving left,
/// every second digit is doubled and digit-summed; the grand total must
/// be divisible by 10.
fn luhn_checksum_ok(digits: &str) -> bool {
    let total: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                doubled / 10 + doubled % 10
            } else {
                d
            }
        })
        .sum();
    total % 10 == 0
}

/// Order-preserving label/value pairs read off the results panel.
pub type DeviceInfo = IndexMap<String, String>;

/// Why a check terminated without a compatibility determination.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The identifier never passed validation; no session was opened.
    InvalidFormat,
    /// The IMEI input field never became available.
    FieldNotFound,
    /// The check-compatibility control never became available.
    ButtonNotFound,
    /// The results block never rendered and no page error was shown.
    ResultsTimeout,
    /// The page itself reported an error for this identifier.
    PageReportedError,
}

impl FailureReason {
    /// Wire-level message, matching what callers of the original
    /// service were taught to expect.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::InvalidFormat => "Invalid IMEI format",
            FailureReason::FieldNotFound => "Timeout error: IMEI input field not found",
            FailureReason::ButtonNotFound => "Timeout error: Compatibility check button not found",
            FailureReason::ResultsTimeout => "Timeout error: Results not found",
            FailureReason::PageReportedError => "Page reported an error",
        }
    }
}

/// Terminal outcome of a compatibility check.
///
/// Exactly one variant is produced per check. Session-acquisition and
/// navigation faults are not outcomes; they surface as errors from the
/// checker instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    Compatible {
        device_name: String,
        device_info: DeviceInfo,
        compatibility_message: String,
    },
    Incompatible {
        compatibility_message: String,
        header_message: Option<String>,
    },
    Failed {
        reason: FailureReason,
        detail: Option<String>,
    },
}

impl CheckOutcome {
    pub fn failed(reason: FailureReason) -> Self {
        CheckOutcome::Failed {
            reason,
            detail: None,
        }
    }

    pub fn failed_with(reason: FailureReason, detail: impl Into<String>) -> Self {
        CheckOutcome::Failed {
            reason,
            detail: Some(detail.into()),
        }
    }

    /// Whether this outcome is a definitive answer from the target page
    /// and therefore eligible for the result cache. Transient
    /// infrastructure failures must be retried by a fresh call.
    pub fn is_cacheable(&self) -> bool {
        match self {
            CheckOutcome::Compatible { .. } | CheckOutcome::Incompatible { .. } => true,
            CheckOutcome::Failed { reason, .. } => {
                matches!(reason, FailureReason::PageReportedError)
            }
        }
    }

    /// Serialize into the flat payload shape the `/check` endpoint
    /// returns, keyed back to the queried identifier.
    pub fn to_wire(&self, imei: &str) -> Value {
        match self {
            CheckOutcome::Compatible {
                device_name,
                device_info,
                compatibility_message,
            } => json!({
                "imei": imei,
                "compatible": true,
                "device_name": device_name,
                "device_info": device_info,
                "compatibility_message": compatibility_message,
            }),
            CheckOutcome::Incompatible {
                compatibility_message,
                header_message,
            } => {
                let mut payload = json!({
                    "imei": imei,
                    "compatible": false,
                    "compatibility_message": compatibility_message,
                });
                if let Some(header) = header_message {
                    payload["header_message"] = Value::String(header.clone());
                }
                payload
            }
            CheckOutcome::Failed {
                reason: FailureReason::PageReportedError,
                detail,
            } => json!({
                "imei": imei,
                "error_message": detail.clone().unwrap_or_default(),
            }),
            CheckOutcome::Failed { reason, .. } => json!({
                "error": reason.message(),
            }),
        }
    }
}
