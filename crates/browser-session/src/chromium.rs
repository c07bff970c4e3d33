//! Chromiumoxide-backed implementation of the session port.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::BrowserOptions;
use crate::error::SessionError;
use crate::session::{ElementId, PageSession, SessionFactory};

/// How often `wait_for_clickable` re-queries the page.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Launches one fresh headless Chromium per `open` call.
pub struct ChromiumFactory {
    options: BrowserOptions,
}

impl ChromiumFactory {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl SessionFactory for ChromiumFactory {
    async fn open(&self) -> Result<Box<dyn PageSession>, SessionError> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.options.window_width, self.options.window_height)
            .args(self.options.chrome_args());
        if !self.options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &self.options.executable {
            builder = builder.chrome_executable(executable.clone());
        }
        let config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| SessionError::Launch(err.to_string()))?;

        // The handler stream must be polled for the browser connection
        // to make progress; it ends when the browser goes away.
        let driver = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(error = %err, "cdp handler stopped");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| SessionError::Launch(err.to_string()))?;

        debug!("chromium session opened");
        Ok(Box::new(ChromiumSession {
            browser: Mutex::new(browser),
            page,
            elements: DashMap::new(),
            driver,
        }))
    }
}

/// One live page in a dedicated browser process.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    page: Page,
    elements: DashMap<ElementId, Arc<Element>>,
    driver: JoinHandle<()>,
}

impl ChromiumSession {
    fn register(&self, element: Element) -> ElementId {
        let id = ElementId::new();
        self.elements.insert(id.clone(), Arc::new(element));
        id
    }

    fn resolve(&self, id: &ElementId) -> Result<Arc<Element>, SessionError> {
        self.elements
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SessionError::StaleHandle(id.to_string()))
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.page
            .goto(url)
            .await
            .map_err(|err| SessionError::Navigation(err.to_string()))?;
        // Best effort; some entry flows keep loading subresources long
        // after the document is usable.
        if let Err(err) = self.page.wait_for_navigation().await {
            debug!(error = %err, url, "navigation wait ended early");
        }
        Ok(())
    }

    async fn wait_for_clickable(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<Option<ElementId>, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(locator).await {
                // Bring it into the viewport so a follow-up click lands.
                if let Err(err) = element.scroll_into_view().await {
                    debug!(error = %err, locator, "scroll into view failed");
                }
                return Ok(Some(self.register(element)));
            }
            if Instant::now() >= deadline {
                debug!(locator, ?timeout, "element did not appear");
                return Ok(None);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn find(&self, locator: &str) -> Result<Option<ElementId>, SessionError> {
        // "No such element" comes back as an error from the engine;
        // treat any lookup failure as absence.
        match self.page.find_element(locator).await {
            Ok(element) => Ok(Some(self.register(element))),
            Err(_) => Ok(None),
        }
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<ElementId>, SessionError> {
        match self.page.find_elements(locator).await {
            Ok(elements) => Ok(elements
                .into_iter()
                .map(|element| self.register(element))
                .collect()),
            Err(_) => Ok(Vec::new()),
        }
    }

    async fn click(&self, element: &ElementId) -> Result<(), SessionError> {
        let element = self.resolve(element)?;
        element
            .click()
            .await
            .map_err(|err| SessionError::CdpIo(err.to_string()))?;
        Ok(())
    }

    async fn type_text(&self, element: &ElementId, text: &str) -> Result<(), SessionError> {
        let element = self.resolve(element)?;
        element
            .click()
            .await
            .map_err(|err| SessionError::CdpIo(err.to_string()))?;
        element
            .type_str(text)
            .await
            .map_err(|err| SessionError::CdpIo(err.to_string()))?;
        Ok(())
    }

    async fn read_text(&self, element: &ElementId) -> Result<String, SessionError> {
        let element = self.resolve(element)?;
        let text = element
            .inner_text()
            .await
            .map_err(|err| SessionError::CdpIo(err.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.elements.clear();
        let mut browser = self.browser.lock().await;
        if let Err(err) = browser.close().await {
            warn!(error = %err, "browser close failed");
        }
        let _ = browser.wait().await;
        self.driver.abort();
        debug!("chromium session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_are_unique() {
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[test]
    fn factory_holds_options() {
        let factory = ChromiumFactory::new(BrowserOptions {
            headless: false,
            ..BrowserOptions::default()
        });
        assert!(!factory.options.headless);
    }
}
