/// Installation of the overlay into the current page context

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url, Window};
use yew::AttrValue;

use crate::config::SummarizerConfig;
use crate::error::SummarizerError;
use crate::ui::ROOT_ID;
use crate::ui::overlay::{SummaryOverlay, SummaryOverlayProps};

/// Window property marking a page context that already has a controller
const INJECTED_FLAG: &str = "hubSummarizerInjected";

/// How long a saved file's object URL outlives the click that downloads it
const REVOKE_DELAY_MS: i32 = 10_000;

/// The page-side capabilities installation needs
pub trait PageContext {
    fn is_marked(&self) -> bool;

    fn mark(&self) -> Result<(), SummarizerError>;

    fn mount(&self, download_url: &str, config: Rc<SummarizerConfig>) -> Result<(), SummarizerError>;
}

/// Install the controller once per page context
///
/// Returns `Ok(false)` when a controller is already present.
pub fn install_into<P: PageContext>(
    page: &P,
    download_url: &str,
    config: SummarizerConfig,
) -> Result<bool, SummarizerError> {
    if page.is_marked() {
        log::info!("Hub Summarizer already injected, skipping");
        return Ok(false);
    }

    page.mark()?;
    page.mount(download_url, Rc::new(config))?;

    log::info!("Hub Summarizer installed for {}", download_url);
    Ok(true)
}

pub struct BrowserPage {
    window: Window,
    document: Document,
}

impl BrowserPage {
    pub fn current() -> Result<BrowserPage, SummarizerError> {
        let window = web_sys::window()
            .ok_or_else(|| SummarizerError::Page("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| SummarizerError::Page("no document".to_string()))?;

        Ok(BrowserPage { window, document })
    }
}

impl PageContext for BrowserPage {
    fn is_marked(&self) -> bool {
        js_sys::Reflect::get(&self.window, &JsValue::from_str(INJECTED_FLAG))
            .map(|value| value.is_truthy())
            .unwrap_or(false)
    }

    fn mark(&self) -> Result<(), SummarizerError> {
        js_sys::Reflect::set(&self.window, &JsValue::from_str(INJECTED_FLAG), &JsValue::TRUE)
            .map_err(js_error)?;
        Ok(())
    }

    fn mount(&self, download_url: &str, config: Rc<SummarizerConfig>) -> Result<(), SummarizerError> {
        if self.document.get_element_by_id(ROOT_ID).is_some() {
            return Ok(());
        }

        for sheet in &config.ui.stylesheets {
            load_stylesheet(&self.document, &sheet.id, &sheet.href)?;
        }

        let body = self
            .document
            .body()
            .ok_or_else(|| SummarizerError::Page("document has no body".to_string()))?;
        let root = self.document.create_element("div").map_err(js_error)?;
        root.set_id(ROOT_ID);
        body.append_child(&root).map_err(js_error)?;

        let props = SummaryOverlayProps {
            download_url: AttrValue::from(download_url.to_string()),
            config,
        };
        yew::Renderer::<SummaryOverlay>::with_root_and_props(root, props).render();

        Ok(())
    }
}

/// Append a stylesheet link unless one with the same id exists
pub fn load_stylesheet(document: &Document, id: &str, href: &str) -> Result<bool, SummarizerError> {
    if document.get_element_by_id(id).is_some() {
        return Ok(false);
    }

    let link = document.create_element("link").map_err(js_error)?;
    link.set_id(id);
    link.set_attribute("rel", "stylesheet").map_err(js_error)?;
    link.set_attribute("href", href).map_err(js_error)?;

    let head = document
        .head()
        .ok_or_else(|| SummarizerError::Page("document has no head".to_string()))?;
    head.append_child(&link).map_err(js_error)?;

    Ok(true)
}

/// Offer `text` to the user as a UTF-8 text file download
///
/// Returns the blob's object URL, which stays valid until the revoke timer fires.
pub fn save_text_file(text: &str, file_name: &str) -> Result<String, SummarizerError> {
    let window = web_sys::window().ok_or_else(|| SummarizerError::Page("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| SummarizerError::Page("no document".to_string()))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let options = BlobPropertyBag::new();
    options.set_type("text/plain;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_error)?;

    let object_url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;
    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| SummarizerError::Page("created element is not an anchor".to_string()))?;
    link.set_href(&object_url);
    link.set_download(file_name);
    link.click();

    // Revoking in the same turn as the click can cancel the download
    let revoked_url = object_url.clone();
    let revoke = Closure::once_into_js(move || {
        if let Err(e) = Url::revoke_object_url(&revoked_url) {
            log::warn!("Failed to revoke {}: {:?}", revoked_url, e);
        }
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), REVOKE_DELAY_MS)
        .map_err(js_error)?;

    Ok(object_url)
}

fn js_error(e: JsValue) -> SummarizerError {
    SummarizerError::Page(format!("{:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakePage {
        marked: Cell<bool>,
        mounts: RefCell<Vec<String>>,
        fail_mount: bool,
    }

    impl PageContext for FakePage {
        fn is_marked(&self) -> bool {
            self.marked.get()
        }

        fn mark(&self) -> Result<(), SummarizerError> {
            self.marked.set(true);
            Ok(())
        }

        fn mount(&self, download_url: &str, _config: Rc<SummarizerConfig>) -> Result<(), SummarizerError> {
            if self.fail_mount {
                return Err(SummarizerError::Page("document has no body".to_string()));
            }
            self.mounts.borrow_mut().push(download_url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_install_is_idempotent() {
        let page = FakePage::default();
        let url = "https://learn.bcit.ca/d2l/le/content/1/topics/files/download/2/DirectFileTopicDownload";

        assert_eq!(install_into(&page, url, SummarizerConfig::default()), Ok(true));
        assert_eq!(install_into(&page, url, SummarizerConfig::default()), Ok(false));
        assert_eq!(page.mounts.borrow().len(), 1);
    }

    #[test]
    fn test_install_failure_reported() {
        let page = FakePage {
            fail_mount: true,
            ..FakePage::default()
        };

        assert!(matches!(
            install_into(&page, "https://example.com/doc", SummarizerConfig::default()),
            Err(SummarizerError::Page(_))
        ));
        assert!(page.mounts.borrow().is_empty());
    }
}
