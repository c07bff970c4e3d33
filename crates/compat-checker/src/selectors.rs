//! Page-specific selectors for the carrier's BYOD compatibility form.
//!
//! These are the only coupling to the target page's structure. The
//! checker treats them as opaque strings; when the page changes, this
//! is the file to update.

/// ZIP prompt shown by some entry flows before the device form.
pub const ZIP_INPUT: &str = "input[placeholder='ZIP code']";
pub const ZIP_CONTINUE: &str = "button#entry-modal-continue-cta";

/// The device identifier form.
pub const IMEI_INPUT: &str = "input[placeholder='IMEI*']";
pub const CHECK_BUTTON: &str = "button#checkCompatibility";

/// Inline results panel and its error states.
pub const RESULTS_BLOCK: &str = "div.byod-device-sim-block.row";
pub const INLINE_ERROR: &str = "p#errorMessage0";
pub const ERROR_BANNER: &str = "span.error-red-text";

/// Success-panel fields.
pub const DEVICE_NAME: &str = "div.device-name";
pub const COMPAT_MESSAGE: &str = "span.compatibility-message.full-compatible-message";
/// Rows whose text reads "Label: value".
pub const DEVICE_INFO_ROWS: &str = "div:has(> span.device-info)";

/// Modal dialog the page raises instead of the inline panel.
pub const DIALOG: &str = "div.ui-dialog[style*='display: block']";
pub const DIALOG_BODY: &str = "div.ui-dialog[style*='display: block'] #pdialog-bodytext > div:first-of-type p";
pub const DIALOG_HEADER: &str = "h3[id*='pdialog-headertext']";
/// Header text that marks the dialog as a non-compatibility verdict.
pub const INCOMPATIBLE_HEADER_MARKER: &str = "Not Compatible";
