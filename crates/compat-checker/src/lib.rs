//! Compatibility check orchestrator.
//!
//! Sequences the UI automation steps against the carrier's BYOD form,
//! interprets intermediate and terminal page states, and caches
//! definitive results per identifier.

pub mod cache;
pub mod checker;
pub mod config;
pub mod selectors;

pub use cache::ResultCache;
pub use checker::CompatChecker;
pub use config::CheckerConfig;
