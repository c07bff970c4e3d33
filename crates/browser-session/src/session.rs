//! The engine-agnostic session contract the checker drives.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SessionError;

/// Opaque handle to an element located in a live page. Valid only for
/// the session that produced it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One controlled page lifecycle.
///
/// Locators are opaque selector strings; the checker supplies them as
/// page-specific constants. Lookup methods distinguish "not present"
/// (`Ok(None)` / empty) from engine faults (`Err`).
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Poll until an element matching `locator` is present and
    /// interactable, or the timeout elapses.
    async fn wait_for_clickable(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<Option<ElementId>, SessionError>;

    /// Single lookup, no waiting.
    async fn find(&self, locator: &str) -> Result<Option<ElementId>, SessionError>;

    /// All current matches, in document order. No waiting.
    async fn find_all(&self, locator: &str) -> Result<Vec<ElementId>, SessionError>;

    async fn click(&self, element: &ElementId) -> Result<(), SessionError>;

    async fn type_text(&self, element: &ElementId, text: &str) -> Result<(), SessionError>;

    /// Rendered text content of the element.
    async fn read_text(&self, element: &ElementId) -> Result<String, SessionError>;

    /// Release the session. Must be called on every exit path; calling
    /// it more than once is harmless.
    async fn close(&self) -> Result<(), SessionError>;
}

/// Acquires fresh sessions. One session per in-flight check; sessions
/// are never pooled or shared.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageSession>, SessionError>;
}
