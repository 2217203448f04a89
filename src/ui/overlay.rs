/// Floating summary overlay injected into the content viewer page

use std::rc::Rc;

use yew::prelude::*;

use crate::config::SummarizerConfig;
use crate::error::SummarizerError;
use crate::extraction::{ExtractionClient, ExtractionTracker};
use crate::state::{ControllerAction, ControllerState, Surface};
use crate::ui::components::{label_style, ErrorAlert, IconButton, Spinner};
use crate::ui::page::save_text_file;
use crate::ui::*;

#[derive(Properties, PartialEq)]
pub struct SummaryOverlayProps {
    pub download_url: AttrValue,
    pub config: Rc<SummarizerConfig>,
}

impl Reducible for ControllerState {
    type Action = ControllerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[function_component(SummaryOverlay)]
pub fn summary_overlay(props: &SummaryOverlayProps) -> Html {
    let state = use_reducer(ControllerState::installed);
    let tracker = use_memo((), |_| ExtractionTracker::default());
    let client = {
        let extraction = props.config.extraction.clone();
        use_memo((), move |_| ExtractionClient::new(extraction))
    };

    // Pre-fetch as soon as the controller is installed
    {
        let client = client.clone();
        let tracker = tracker.clone();
        let dispatcher = state.dispatcher();
        let download_url = props.download_url.to_string();

        use_effect_with((), move |_| {
            start_extraction(&client, &tracker, dispatcher, download_url, None);
            || ()
        });
    }

    let on_open = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(ControllerAction::OpenPopup))
    };

    let on_minimize = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(ControllerAction::Minimize))
    };

    let on_expand = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| dispatcher.dispatch(ControllerAction::Expand))
    };

    let on_reload = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: MouseEvent| {
            dispatcher.dispatch(ControllerAction::Reload(local_time()));
        })
    };

    let on_summarize_again = {
        let client = client.clone();
        let tracker = tracker.clone();
        let dispatcher = state.dispatcher();
        let download_url = props.download_url.to_string();

        Callback::from(move |_: MouseEvent| {
            dispatcher.dispatch(ControllerAction::SummarizeAgain);
            start_extraction(&client, &tracker, dispatcher.clone(), download_url.clone(), None);
        })
    };

    // Refetch, then save the text of that same extraction
    let on_download = {
        let client = client.clone();
        let tracker = tracker.clone();
        let dispatcher = state.dispatcher();
        let download_url = props.download_url.to_string();
        let file_name = props.config.ui.summary_file_name.clone();

        Callback::from(move |_: MouseEvent| {
            start_extraction(
                &client,
                &tracker,
                dispatcher.clone(),
                download_url.clone(),
                Some(file_name.clone()),
            );
        })
    };

    let ui = &props.config.ui;
    let loading = state.loading;

    match state.surface {
        Surface::Idle => html! {},
        Surface::Button => html! {
            <button
                id={SUMMARIZE_BUTTON_ID}
                class="btn btn-primary d-flex align-items-center gap-2"
                style={floating_style(&ui.bottom, &ui.right, 1000)}
                onclick={on_open}
            >
                if loading {
                    <Spinner id={SUMMARIZE_SPINNER_ID} small={true} />
                }
                <i class="bi bi-lightning-charge-fill"></i>
                <span id={SUMMARIZE_LABEL_ID} style={label_style(loading)}>{"Summarize"}</span>
            </button>
        },
        Surface::Popup => {
            let content = match &state.notice {
                Some(notice) => html! { <p>{notice.clone()}</p> },
                None => html! {
                    <>
                        if loading {
                            <div id={POPUP_SPINNER_ID} class="d-flex justify-content-center my-3">
                                <Spinner />
                            </div>
                        }
                        if let Some(error) = state.error.clone() {
                            <ErrorAlert message={error} />
                        }
                        <p id={SUMMARY_TEXT_ID} style="white-space: pre-wrap;">{state.summary_text.clone()}</p>
                    </>
                },
            };

            html! {
                <div
                    id={POPUP_ID}
                    class="shadow-lg bg-white border rounded"
                    style="position: fixed; z-index: 2000; top: 10px; right: 10px; width: 33vw; height: calc(100vh - 60px);"
                >
                    <div class="d-flex justify-content-between align-items-center border-bottom p-2 bg-light">
                        <div class="d-flex align-items-center gap-2">
                            <i class="bi bi-file-earmark-text"></i>
                            <strong>{"Summary"}</strong>
                        </div>
                        <div class="d-flex gap-2">
                            <IconButton id={RELOAD_BUTTON_ID} class="btn btn-sm btn-outline-secondary" onclick={on_reload}>
                                <i class="bi bi-arrow-clockwise"></i>
                            </IconButton>
                            <IconButton id={MINIMIZE_BUTTON_ID} class="btn btn-sm btn-outline-secondary" onclick={on_minimize}>
                                <i class="bi bi-dash"></i>
                            </IconButton>
                        </div>
                    </div>
                    <div id={POPUP_CONTENT_ID} class="p-3" style="height: calc(100% - 90px); overflow-y: auto;">
                        {content}
                    </div>
                    <div class="border-top p-2 text-end" style="position: absolute; bottom: 0; width: 100%;">
                        <IconButton id={DOWNLOAD_BUTTON_ID} class="btn btn-success" onclick={on_download}>
                            <i class="bi bi-download"></i>{" Download"}
                        </IconButton>
                    </div>
                </div>
            }
        }
        Surface::MiniBar => html! {
            <div id={MINI_BAR_ID} class="btn-group shadow" style={floating_style(&ui.bottom, &ui.right, 1500)}>
                <IconButton class="btn btn-primary" disabled={loading} onclick={on_summarize_again}>
                    if loading {
                        <Spinner small={true} class="miniSummarizeSpinner" />
                    }
                    <span class="miniSummarizeLabel" style={label_style(loading)}>{" Summarize"}</span>
                </IconButton>
                <IconButton class="btn btn-outline-primary" onclick={on_expand}>
                    <i class="bi bi-arrows-angle-expand"></i>
                </IconButton>
            </div>
        },
    }
}

/// Start an extraction under a fresh generation
///
/// With `save_as`, the extracted text is also saved as a file, but only if
/// no newer extraction has started in the meantime.
fn start_extraction(
    client: &ExtractionClient,
    tracker: &Rc<ExtractionTracker>,
    dispatcher: UseReducerDispatcher<ControllerState>,
    download_url: String,
    save_as: Option<String>,
) {
    let generation = tracker.begin();
    let tracker = Rc::clone(tracker);
    let loading_dispatcher = dispatcher.clone();

    client.spawn_fetch_and_extract(
        download_url,
        move |loading| {
            loading_dispatcher.dispatch(ControllerAction::LoadingChanged { generation, loading });
        },
        move |outcome| {
            if let Some((file_name, text)) =
                pending_download(save_as.as_deref(), &outcome, &tracker, generation)
            {
                if let Err(e) = save_text_file(text, file_name) {
                    log::error!("Failed to save {}: {}", file_name, e);
                }
            }

            dispatcher.dispatch(ControllerAction::ExtractionFinished {
                generation,
                outcome: outcome.map_err(|e| e.to_string()),
            });
        },
    );
}

/// File name and text to save for a settled extraction, if any
///
/// Only a successful extraction that is still the latest one is saved.
fn pending_download<'a>(
    save_as: Option<&'a str>,
    outcome: &'a Result<String, SummarizerError>,
    tracker: &ExtractionTracker,
    generation: u64,
) -> Option<(&'a str, &'a str)> {
    match (save_as, outcome) {
        (Some(file_name), Ok(text)) if tracker.is_current(generation) => {
            Some((file_name, text.as_str()))
        }
        _ => None,
    }
}

fn floating_style(bottom: &str, right: &str, z_index: u32) -> String {
    format!(
        "position: fixed; bottom: {}; right: {}; z-index: {};",
        bottom, right, z_index
    )
}

fn local_time() -> String {
    String::from(js_sys::Date::new_0().to_locale_time_string("default"))
}
