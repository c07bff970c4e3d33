use std::sync::Arc;

use compat_checker::CompatChecker;

/// Shared handler state: the checker owns the cache and the session
/// factory.
#[derive(Clone)]
pub struct ServeState {
    pub checker: Arc<CompatChecker>,
}
