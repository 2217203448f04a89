#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use hub_summarizer::config::{ExtractionConfig, SummarizerConfig};
use hub_summarizer::extraction::ExtractionClient;
use hub_summarizer::navigation::ChromeHost;
use hub_summarizer::ui::overlay::{SummaryOverlay, SummaryOverlayProps};
use hub_summarizer::ui::page::{BrowserPage, install_into, load_stylesheet, save_text_file};
use hub_summarizer::ui::{
    MINI_BAR_ID, MINIMIZE_BUTTON_ID, POPUP_ID, POPUP_SPINNER_ID, ROOT_ID, SUMMARIZE_BUTTON_ID,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement, Response};
use yew::AttrValue;

wasm_bindgen_test_configure!(run_in_browser);

const DOWNLOAD_URL: &str =
    "https://learn.bcit.ca/d2l/le/content/1/topics/files/download/2/DirectFileTopicDownload";

/// Nothing listens here, so requests fail quickly
const UNREACHABLE_URL: &str = "http://127.0.0.1:1/doc";

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn count(selector: &str) -> u32 {
    document().query_selector_all(selector).unwrap().length()
}

fn count_in(root: &Element, selector: &str) -> u32 {
    root.query_selector_all(selector).unwrap().length()
}

fn click_in(root: &Element, selector: &str) {
    let element: HtmlElement = root
        .query_selector(selector)
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    element.click();
}

async fn next_render() {
    // Let yew flush its scheduler; only microtasks run, so network replies
    // cannot land in between
    for _ in 0..10 {
        let promise = js_sys::Promise::resolve(&JsValue::NULL);
        JsFuture::from(promise).await.unwrap();
    }
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

/// Render an overlay into its own root so tests do not see each other's DOM
fn mount_overlay(download_url: &str) -> Element {
    let document = document();
    let root = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&root).unwrap();

    let props = SummaryOverlayProps {
        download_url: AttrValue::from(download_url.to_string()),
        config: Rc::new(SummarizerConfig::default()),
    };
    yew::Renderer::<SummaryOverlay>::with_root_and_props(root.clone(), props).render();

    root
}

fn id(name: &str) -> String {
    format!("#{}", name)
}

#[wasm_bindgen_test]
async fn test_install_once_and_surfaces_exclusive() {
    let page = BrowserPage::current().unwrap();

    assert_eq!(install_into(&page, DOWNLOAD_URL, SummarizerConfig::default()), Ok(true));
    assert_eq!(install_into(&page, DOWNLOAD_URL, SummarizerConfig::default()), Ok(false));
    next_render().await;

    let root = document().get_element_by_id(ROOT_ID).unwrap();
    assert_eq!(count(&id(ROOT_ID)), 1);
    assert_eq!(count_in(&root, &id(SUMMARIZE_BUTTON_ID)), 1);
    assert_eq!(count_in(&root, &id(POPUP_ID)), 0);
    assert_eq!(count_in(&root, &id(MINI_BAR_ID)), 0);

    // The button opens the popup even while the install-time fetch runs
    click_in(&root, &id(SUMMARIZE_BUTTON_ID));
    next_render().await;

    let surfaces = format!("#{}, #{}, #{}", SUMMARIZE_BUTTON_ID, POPUP_ID, MINI_BAR_ID);
    assert_eq!(count_in(&root, &surfaces), 1);
    assert_eq!(count_in(&root, &id(POPUP_ID)), 1);
}

#[wasm_bindgen_test]
async fn test_popup_shows_spinner_while_loading() {
    let root = mount_overlay(DOWNLOAD_URL);
    next_render().await;

    let button = root.query_selector(&id(SUMMARIZE_BUTTON_ID)).unwrap().unwrap();
    assert!(!button.has_attribute("disabled"));

    click_in(&root, &id(SUMMARIZE_BUTTON_ID));
    next_render().await;

    assert_eq!(count_in(&root, &id(POPUP_ID)), 1);
    assert_eq!(count_in(&root, &id(POPUP_SPINNER_ID)), 1);
    assert_eq!(count_in(&root, &id(SUMMARIZE_BUTTON_ID)), 0);
}

#[wasm_bindgen_test]
async fn test_minimize_then_expand_matches_fresh_popup() {
    let root = mount_overlay(DOWNLOAD_URL);
    next_render().await;

    click_in(&root, &id(SUMMARIZE_BUTTON_ID));
    next_render().await;
    let fresh_popup = root.query_selector(&id(POPUP_ID)).unwrap().unwrap().outer_html();

    click_in(&root, &id(MINIMIZE_BUTTON_ID));
    next_render().await;

    assert_eq!(count_in(&root, &id(MINI_BAR_ID)), 1);
    assert_eq!(count_in(&root, &id(POPUP_ID)), 0);

    click_in(&root, &format!("#{} .btn-outline-primary", MINI_BAR_ID));
    next_render().await;

    assert_eq!(count_in(&root, &id(POPUP_ID)), 1);
    assert_eq!(count_in(&root, &id(MINI_BAR_ID)), 0);
    assert_eq!(
        root.query_selector(&id(POPUP_ID)).unwrap().unwrap().outer_html(),
        fresh_popup
    );
}

#[wasm_bindgen_test]
async fn test_failed_extraction_shows_error_alert() {
    let root = mount_overlay(UNREACHABLE_URL);
    next_render().await;

    click_in(&root, &id(SUMMARIZE_BUTTON_ID));
    next_render().await;

    for _ in 0..50 {
        if count_in(&root, ".alert-danger") > 0 {
            break;
        }
        sleep(100).await;
    }

    assert_eq!(count_in(&root, ".alert-danger"), 1);
    assert_eq!(count_in(&root, &id(POPUP_SPINNER_ID)), 0);
}

#[wasm_bindgen_test]
async fn test_spawned_extraction_reports_in_order() {
    let client = ExtractionClient::new(ExtractionConfig {
        endpoint: "http://127.0.0.1:1/buffer-to-text".to_string(),
        ..ExtractionConfig::default()
    });
    let events = Rc::new(RefCell::new(Vec::new()));

    let loading_events = Rc::clone(&events);
    let result_events = Rc::clone(&events);
    client.spawn_fetch_and_extract(
        UNREACHABLE_URL.to_string(),
        move |loading| loading_events.borrow_mut().push(format!("loading={}", loading)),
        move |outcome| {
            let entry = if outcome.is_ok() { "ok" } else { "error" };
            result_events.borrow_mut().push(entry.to_string());
        },
    );

    assert_eq!(*events.borrow(), vec!["loading=true"]);

    for _ in 0..50 {
        if events.borrow().len() == 3 {
            break;
        }
        sleep(100).await;
    }

    assert_eq!(*events.borrow(), vec!["loading=true", "loading=false", "error"]);
}

#[wasm_bindgen_test]
fn test_injection_args_forward_options() {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("ui"), &js_sys::Object::new()).unwrap();

    let args = ChromeHost::new(options.clone().into()).injection_args(DOWNLOAD_URL);
    assert_eq!(args.length(), 2);
    assert_eq!(args.get(0).as_string().as_deref(), Some(DOWNLOAD_URL));
    assert_eq!(args.get(1), JsValue::from(options));

    let args = ChromeHost::new(JsValue::UNDEFINED).injection_args(DOWNLOAD_URL);
    assert!(args.get(1).is_null());
}

#[wasm_bindgen_test]
async fn test_saved_file_url_outlives_click() {
    let object_url = save_text_file("Hello", "summary.txt").unwrap();

    let response: Response = JsFuture::from(web_sys::window().unwrap().fetch_with_str(&object_url))
        .await
        .unwrap()
        .dyn_into()
        .unwrap();
    let text = JsFuture::from(response.text().unwrap()).await.unwrap();

    assert_eq!(text.as_string().as_deref(), Some("Hello"));
}

#[wasm_bindgen_test]
fn test_stylesheet_loaded_once() {
    let document = document();

    assert_eq!(load_stylesheet(&document, "test-css", "https://example.com/a.css"), Ok(true));
    assert_eq!(load_stylesheet(&document, "test-css", "https://example.com/a.css"), Ok(false));
    assert_eq!(count("#test-css"), 1);
}
