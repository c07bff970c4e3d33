//! Error types for the automation-session port.

use thiserror::Error;

/// Failures raised by a session implementation.
///
/// `Launch` and `Navigation` are fatal for the request that triggered
/// them; the checker propagates them instead of mapping them to a
/// terminal outcome. `CdpIo` faults on individual element interactions
/// are caught at the step level by the checker.
#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// Browser process or page could not be acquired.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Initial navigation to the entry URL failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// CDP communication or protocol error during an interaction.
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// An element handle no longer resolves to a live element.
    #[error("stale element handle: {0}")]
    StaleHandle(String),
}
