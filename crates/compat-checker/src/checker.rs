//! The check sequence: a small state machine over an unreliable,
//! latency-bound page.

use std::sync::Arc;
use std::time::Duration;

use browser_session::{ElementId, PageSession, SessionError, SessionFactory};
use compat_core_types::{CheckOutcome, DeviceInfo, FailureReason, Imei};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::config::CheckerConfig;
use crate::selectors;

/// Orchestrates one compatibility check per call: validate, consult the
/// cache, drive a fresh session through the form, type the terminal
/// page state, and cache definitive answers.
pub struct CompatChecker {
    factory: Arc<dyn SessionFactory>,
    cache: ResultCache,
    config: CheckerConfig,
}

impl CompatChecker {
    pub fn new(factory: Arc<dyn SessionFactory>, config: CheckerConfig) -> Self {
        Self {
            factory,
            cache: ResultCache::new(),
            config,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Run a check for a raw identifier.
    ///
    /// Page-level terminal states come back as [`CheckOutcome`];
    /// `Err` is reserved for session acquisition and navigation
    /// faults, which are never cached and should be retried by the
    /// caller.
    pub async fn check(&self, raw: &str) -> Result<CheckOutcome, SessionError> {
        let imei = match Imei::parse(raw) {
            Ok(imei) => imei,
            Err(err) => {
                debug!(error = %err, "rejected identifier before opening a session");
                return Ok(CheckOutcome::failed(FailureReason::InvalidFormat));
            }
        };

        if let Some(hit) = self.cache.get(&imei) {
            debug!(%imei, "cache hit");
            return Ok(hit);
        }

        let session = self.factory.open().await?;
        let outcome = self.run(session.as_ref(), &imei).await;
        // Teardown happens on every exit path, including the navigation
        // fault below.
        if let Err(err) = session.close().await {
            warn!(error = %err, "session teardown failed");
        }
        let outcome = outcome?;

        if outcome.is_cacheable() {
            self.cache.put(imei.clone(), outcome.clone());
        }
        info!(%imei, cacheable = outcome.is_cacheable(), "check finished");
        Ok(outcome)
    }

    async fn run(
        &self,
        session: &dyn PageSession,
        imei: &Imei,
    ) -> Result<CheckOutcome, SessionError> {
        session.navigate(&self.config.entry_url).await?;

        self.pass_zip_gate(session).await;

        let Some(field) = self
            .wait_clickable(session, selectors::IMEI_INPUT, self.config.field_timeout())
            .await
        else {
            return Ok(CheckOutcome::failed(FailureReason::FieldNotFound));
        };
        if let Err(err) = session.type_text(&field, imei.as_str()).await {
            warn!(error = %err, "typing the identifier failed");
            return Ok(CheckOutcome::failed_with(
                FailureReason::FieldNotFound,
                err.to_string(),
            ));
        }

        let Some(button) = self
            .wait_clickable(session, selectors::CHECK_BUTTON, self.config.field_timeout())
            .await
        else {
            return Ok(CheckOutcome::failed(FailureReason::ButtonNotFound));
        };
        if let Err(err) = session.click(&button).await {
            warn!(error = %err, "check button click failed");
            return Ok(CheckOutcome::failed_with(
                FailureReason::ButtonNotFound,
                err.to_string(),
            ));
        }

        // The page answers either with a modal dialog or with the
        // inline panel, on different timelines. Give the modal a moment
        // to render; when present it supersedes the page body.
        sleep(self.config.dialog_settle()).await;
        if let Some(outcome) = self.intercept_incompatible_dialog(session).await {
            return Ok(outcome);
        }

        let results = self
            .wait_clickable(
                session,
                selectors::RESULTS_BLOCK,
                self.config.results_timeout(),
            )
            .await;
        if results.is_none() {
            // No panel: either the page rejected the identifier
            // outright or it is just slow. Only the former is
            // definitive.
            if let Some(error_el) = self.find(session, selectors::INLINE_ERROR).await {
                if let Some(text) = self.read_text(session, &error_el).await {
                    return Ok(CheckOutcome::failed_with(
                        FailureReason::PageReportedError,
                        text.trim(),
                    ));
                }
            }
            return Ok(CheckOutcome::failed(FailureReason::ResultsTimeout));
        }

        if let Some(banner) = self.find(session, selectors::ERROR_BANNER).await {
            if let Some(text) = self.read_text(session, &banner).await {
                return Ok(CheckOutcome::Incompatible {
                    compatibility_message: text.trim().to_string(),
                    header_message: None,
                });
            }
        }

        Ok(self.extract_compatible(session).await)
    }

    /// Some entry flows front the form with a ZIP-code prompt. The step
    /// is optional: absence within its short timeout, and any fault
    /// while filling it, are not errors.
    async fn pass_zip_gate(&self, session: &dyn PageSession) {
        let Some(zip_field) = self
            .wait_clickable(session, selectors::ZIP_INPUT, self.config.zip_prompt_timeout())
            .await
        else {
            debug!("no zip prompt, continuing to the form");
            return;
        };
        if let Err(err) = session.type_text(&zip_field, &self.config.zip_code).await {
            warn!(error = %err, "zip entry failed, continuing anyway");
            return;
        }
        // Client-side validation needs a beat before the continue
        // control activates.
        sleep(self.config.zip_settle()).await;
        if let Some(proceed) = self.find(session, selectors::ZIP_CONTINUE).await {
            if let Err(err) = session.click(&proceed).await {
                warn!(error = %err, "zip continue click failed");
            }
        }
    }

    /// Detect the non-compatibility modal. Requires the dialog, its
    /// body message, and a header whose text marks the verdict; partial
    /// dialogs fall through to the inline path.
    async fn intercept_incompatible_dialog(
        &self,
        session: &dyn PageSession,
    ) -> Option<CheckOutcome> {
        self.find(session, selectors::DIALOG).await?;
        let body = self.find(session, selectors::DIALOG_BODY).await?;
        let message = self.read_text(session, &body).await?;
        let header = self.find(session, selectors::DIALOG_HEADER).await?;
        let header_text = self
            .read_text(session, &header)
            .await
            .filter(|text| text.contains(selectors::INCOMPATIBLE_HEADER_MARKER))?;
        Some(CheckOutcome::Incompatible {
            compatibility_message: message.trim().to_string(),
            header_message: Some(header_text.trim().to_string()),
        })
    }

    async fn extract_compatible(&self, session: &dyn PageSession) -> CheckOutcome {
        let Some(name_el) = self
            .wait_clickable(session, selectors::DEVICE_NAME, self.config.field_timeout())
            .await
        else {
            return CheckOutcome::failed_with(FailureReason::ResultsTimeout, "device name missing");
        };
        let Some(device_name) = self.read_text(session, &name_el).await else {
            return CheckOutcome::failed_with(
                FailureReason::ResultsTimeout,
                "device name unreadable",
            );
        };

        let Some(message_el) = self
            .wait_clickable(
                session,
                selectors::COMPAT_MESSAGE,
                self.config.field_timeout(),
            )
            .await
        else {
            return CheckOutcome::failed_with(
                FailureReason::ResultsTimeout,
                "compatibility message missing",
            );
        };
        let Some(compatibility_message) = self.read_text(session, &message_el).await else {
            return CheckOutcome::failed_with(
                FailureReason::ResultsTimeout,
                "compatibility message unreadable",
            );
        };

        let mut device_info = DeviceInfo::new();
        let rows = match session.find_all(selectors::DEVICE_INFO_ROWS).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(error = %err, "device info enumeration failed");
                Vec::new()
            }
        };
        for row in rows {
            let Some(text) = self.read_text(session, &row).await else {
                continue;
            };
            // Rows read as "Label: value"; split at the first colon.
            if let Some((label, value)) = text.split_once(':') {
                device_info.insert(label.trim().to_string(), value.trim().to_string());
            }
        }

        CheckOutcome::Compatible {
            device_name: device_name.trim().to_string(),
            device_info,
            compatibility_message: compatibility_message.trim().to_string(),
        }
    }

    async fn wait_clickable(
        &self,
        session: &dyn PageSession,
        locator: &str,
        timeout: Duration,
    ) -> Option<ElementId> {
        match session.wait_for_clickable(locator, timeout).await {
            Ok(found) => found,
            Err(err) => {
                warn!(locator, error = %err, "wait failed");
                None
            }
        }
    }

    async fn find(&self, session: &dyn PageSession, locator: &str) -> Option<ElementId> {
        match session.find(locator).await {
            Ok(found) => found,
            Err(err) => {
                warn!(locator, error = %err, "lookup failed");
                None
            }
        }
    }

    async fn read_text(&self, session: &dyn PageSession, element: &ElementId) -> Option<String> {
        match session.read_text(element).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(error = %err, "reading element text failed");
                None
            }
        }
    }
}
