/// UI module exports
pub mod components;
pub mod overlay;
pub mod page;

// Stable element ids rendered by the overlay
pub const ROOT_ID: &str = "hubSummarizerRoot";
pub const SUMMARIZE_BUTTON_ID: &str = "summarizeBtn";
pub const SUMMARIZE_SPINNER_ID: &str = "summarizeBtnSpinner";
pub const SUMMARIZE_LABEL_ID: &str = "summarizeBtnLabel";
pub const POPUP_ID: &str = "summaryPopup";
pub const RELOAD_BUTTON_ID: &str = "reloadBtn";
pub const MINIMIZE_BUTTON_ID: &str = "minimizeBtn";
pub const POPUP_CONTENT_ID: &str = "popupContent";
pub const POPUP_SPINNER_ID: &str = "popupSpinner";
pub const SUMMARY_TEXT_ID: &str = "summaryText";
pub const DOWNLOAD_BUTTON_ID: &str = "downloadBtn";
pub const MINI_BAR_ID: &str = "miniBar";
