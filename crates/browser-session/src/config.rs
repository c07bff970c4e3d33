//! Browser launch options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Launch options for the Chromium-backed session.
///
/// The default flag set mirrors what the target carrier page requires
/// in practice: geolocation and notification prompts must be disabled
/// (the page asks for location permission), images are skipped for
/// speed, and the `AutomationControlled` blink feature is turned off so
/// the page does not change behavior under automation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Explicit browser binary; discovered on $PATH when unset.
    pub executable: Option<PathBuf>,
    pub window_width: u32,
    pub window_height: u32,
    pub load_images: bool,
    /// Extra flags appended verbatim after the built-in set.
    pub extra_args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            window_width: 1920,
            window_height: 1080,
            load_images: false,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserOptions {
    /// Command-line flags handed to the browser process.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            "--disable-notifications".to_string(),
            "--disable-geolocation".to_string(),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-infobars".to_string(),
            "--disable-extensions".to_string(),
            "--log-level=3".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
        ];
        if !self.load_images {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_disable_automation_detection_and_images() {
        let args = BrowserOptions::default().chrome_args();
        assert!(args.contains(&"--disable-blink-features=AutomationControlled".to_string()));
        assert!(args.contains(&"--blink-settings=imagesEnabled=false".to_string()));
        assert!(args.contains(&"--disable-geolocation".to_string()));
    }

    #[test]
    fn extra_args_are_appended() {
        let options = BrowserOptions {
            extra_args: vec!["--proxy-server=localhost:9999".to_string()],
            ..BrowserOptions::default()
        };
        let args = options.chrome_args();
        assert_eq!(args.last().unwrap(), "--proxy-server=localhost:9999");
    }

    #[test]
    fn image_loading_can_be_enabled() {
        let options = BrowserOptions {
            load_images: true,
            ..BrowserOptions::default()
        };
        assert!(!options
            .chrome_args()
            .contains(&"--blink-settings=imagesEnabled=false".to_string()));
    }
}
