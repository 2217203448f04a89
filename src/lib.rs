/// Hub Summarizer - Chrome Extension that summarizes Learning Hub documents
/// Built with Rust + WASM + Yew

pub mod config;
pub mod error;
pub mod extraction;
pub mod locator;
pub mod navigation;
pub mod state;
pub mod ui;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::config::SummarizerConfig;
use crate::locator::ResourceLocator;
use crate::navigation::{ChromeHost, NavigationWatcher};
use crate::ui::page::{BrowserPage, install_into};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Service worker entry: watch tab navigations
#[wasm_bindgen]
pub fn start_background(options: JsValue) -> Result<(), JsValue> {
    let config = SummarizerConfig::from_js(options.clone()).map_err(to_js_error)?;
    let watcher = Rc::new(NavigationWatcher::new(
        ChromeHost::new(options),
        ResourceLocator::new(config.locator),
    ));
    watcher.start();

    log::info!("Service worker initialized");
    Ok(())
}

// Page entry: install the summary overlay, once per page context
#[wasm_bindgen]
pub fn install_summarizer(download_url: String, options: JsValue) -> Result<bool, JsValue> {
    let config = SummarizerConfig::from_js(options).map_err(to_js_error)?;
    let page = BrowserPage::current().map_err(to_js_error)?;

    install_into(&page, &download_url, config).map_err(|e| {
        log::error!("Error injecting summarizer: {}", e);
        to_js_error(e)
    })
}

// Re-export locator functions for JavaScript access
#[wasm_bindgen]
pub fn matches_resource_page(url: Option<String>) -> bool {
    url.map(|url| ResourceLocator::default().classify(&url))
        .unwrap_or(false)
}

#[wasm_bindgen]
pub fn resource_download_url(url: &str) -> Option<String> {
    ResourceLocator::default().download_url_for(url)
}

fn to_js_error(e: error::SummarizerError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
