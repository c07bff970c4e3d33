//! Automation-session port for the compatibility checker.
//!
//! The checker depends only on the [`PageSession`] / [`SessionFactory`]
//! contracts; the concrete engine behind them is replaceable. The
//! default implementation drives a headless Chromium over CDP via
//! chromiumoxide.

pub mod chromium;
pub mod config;
pub mod error;
pub mod session;

pub use chromium::ChromiumFactory;
pub use config::BrowserOptions;
pub use error::SessionError;
pub use session::{ElementId, PageSession, SessionFactory};
