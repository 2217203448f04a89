/// Navigation watcher: reacts to completed tab loads and installs the controller
use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::error::SummarizerError;
use crate::locator::ResourceLocator;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    fn onTabUpdated(callback: &js_sys::Function);

    fn onTabActivated(callback: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn getTabUrl(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn injectSummarizer(tab_id: i32, args: &js_sys::Array) -> Result<(), JsValue>;
}

/// A tab update as delivered by the browser host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub tab_id: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl NavigationEvent {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// Not a completed load, or no URL
    Ignored,
    NotMatched,
    InvalidReference,
    Installed { download_url: String },
}

/// Browser capabilities the watcher depends on
#[allow(async_fn_in_trait)]
pub trait NavigationHost {
    fn on_navigation_complete(&self, handler: Box<dyn Fn(NavigationEvent)>);

    fn on_tab_activated(&self, handler: Box<dyn Fn(i32)>);

    async fn tab_url(&self, tab_id: i32) -> Result<Option<String>, SummarizerError>;

    /// Run the page-side controller in the tab with the given download URL
    async fn install_controller(&self, tab_id: i32, download_url: &str) -> Result<(), SummarizerError>;
}

pub struct NavigationWatcher<H> {
    host: H,
    locator: ResourceLocator,
}

impl<H: NavigationHost + 'static> NavigationWatcher<H> {
    pub fn new(host: H, locator: ResourceLocator) -> NavigationWatcher<H> {
        NavigationWatcher { host, locator }
    }

    /// Subscribe to host events; handlers run as local tasks
    pub fn start(self: Rc<Self>) {
        let watcher = Rc::clone(&self);
        self.host.on_navigation_complete(Box::new(move |event| {
            let watcher = Rc::clone(&watcher);
            spawn_local(async move {
                if let Err(e) = watcher.handle_navigation(&event).await {
                    log::error!("{}", e);
                }
            });
        }));

        let watcher = Rc::clone(&self);
        self.host.on_tab_activated(Box::new(move |tab_id| {
            let watcher = Rc::clone(&watcher);
            spawn_local(async move {
                watcher.handle_activation(tab_id).await;
            });
        }));
    }

    pub async fn handle_navigation(
        &self,
        event: &NavigationEvent,
    ) -> Result<NavigationOutcome, SummarizerError> {
        let url = match (&event.url, event.is_complete()) {
            (Some(url), true) => url,
            _ => return Ok(NavigationOutcome::Ignored),
        };

        log::info!("Tab {} updated: {}", event.tab_id, url);

        if !self.locator.classify(url) {
            log::debug!("URL doesn't match pattern, skipping");
            return Ok(NavigationOutcome::NotMatched);
        }

        let reference = match self.locator.extract_reference(url) {
            Ok(reference) => reference,
            Err(e) => {
                log::warn!("Failed to extract ids: {}", e);
                return Ok(NavigationOutcome::InvalidReference);
            }
        };

        let download_url = self.locator.download_url(&reference);
        self.host
            .install_controller(event.tab_id, &download_url)
            .await?;

        log::info!("Controller injected into tab {}", event.tab_id);
        Ok(NavigationOutcome::Installed { download_url })
    }

    /// Report whether a newly activated tab is a resource page; never installs
    pub async fn handle_activation(&self, tab_id: i32) -> bool {
        match self.host.tab_url(tab_id).await {
            Ok(Some(url)) if self.locator.classify(&url) => {
                log::info!("Activated tab matches pattern: {}", url);
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::error!("Error checking activated tab: {}", e);
                false
            }
        }
    }
}

/// `NavigationHost` backed by the chrome.tabs and chrome.scripting APIs
///
/// `options` is the object the worker was started with; it is handed on to
/// every page controller so both sides share one configuration.
pub struct ChromeHost {
    options: JsValue,
}

impl ChromeHost {
    pub fn new(options: JsValue) -> ChromeHost {
        ChromeHost { options }
    }

    /// Arguments for the page-side `install_summarizer(download_url, options)`
    pub fn injection_args(&self, download_url: &str) -> js_sys::Array {
        let options = if self.options.is_undefined() {
            JsValue::NULL
        } else {
            self.options.clone()
        };

        js_sys::Array::of2(&JsValue::from_str(download_url), &options)
    }
}

impl NavigationHost for ChromeHost {
    fn on_navigation_complete(&self, handler: Box<dyn Fn(NavigationEvent)>) {
        let callback = Closure::wrap(Box::new(move |event_js: JsValue| {
            match serde_wasm_bindgen::from_value::<NavigationEvent>(event_js) {
                Ok(event) => handler(event),
                Err(e) => log::error!("Failed to parse tab update: {:?}", e),
            }
        }) as Box<dyn Fn(JsValue)>);

        onTabUpdated(callback.as_ref().unchecked_ref());
        // Listener lives as long as the service worker
        callback.forget();
    }

    fn on_tab_activated(&self, handler: Box<dyn Fn(i32)>) {
        let callback = Closure::wrap(handler);
        onTabActivated(callback.as_ref().unchecked_ref());
        callback.forget();
    }

    async fn tab_url(&self, tab_id: i32) -> Result<Option<String>, SummarizerError> {
        let url = getTabUrl(tab_id).await.map_err(|e| SummarizerError::Install {
            tab_id,
            reason: format!("Failed to get tab: {:?}", e),
        })?;

        Ok(url.as_string())
    }

    async fn install_controller(&self, tab_id: i32, download_url: &str) -> Result<(), SummarizerError> {
        injectSummarizer(tab_id, &self.injection_args(download_url))
            .await
            .map_err(|e| SummarizerError::Install {
                tab_id,
                reason: format!("{:?}", e),
            })
    }
}
