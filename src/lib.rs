//! HTTP surface for the BYOD compatibility checker.
//!
//! The core lives in the workspace crates; this package only translates
//! an inbound query parameter into a checker call and serializes the
//! outcome.

pub mod config;
pub mod server;
