/// Controller state machine for the injected summary UI
///
/// Exactly one surface is mounted at a time, so the button, popup and
/// mini-bar can never coexist. Transitions that do not apply to the
/// current surface are no-ops.

/// The UI surface currently mounted in the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    #[default]
    Idle,
    Button,
    Popup,
    MiniBar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerAction {
    /// Summarize button clicked
    OpenPopup,
    Minimize,
    Expand,
    /// Mini-bar summarize clicked; an extraction is started alongside
    SummarizeAgain,
    /// Popup reload clicked, carrying the local time to show
    Reload(String),
    Close,
    ShowButton,
    LoadingChanged { generation: u64, loading: bool },
    ExtractionFinished {
        generation: u64,
        outcome: Result<String, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    pub surface: Surface,
    pub has_summarized: bool,
    pub summary_text: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Placeholder that replaces the popup content after a reload
    pub notice: Option<String>,
    pub generation: u64,
}

impl ControllerState {
    /// State right after installation: the summarize button is shown
    pub fn installed() -> ControllerState {
        let mut state = ControllerState::default();
        state.apply(ControllerAction::ShowButton);
        state
    }

    pub fn is_minimized(&self) -> bool {
        self.surface == Surface::MiniBar
    }

    pub fn is_expanded(&self) -> bool {
        self.surface == Surface::Popup
    }

    pub fn apply(&mut self, action: ControllerAction) {
        match action {
            ControllerAction::OpenPopup => {
                if matches!(self.surface, Surface::Button | Surface::Idle) {
                    self.open_popup();
                }
            }
            ControllerAction::Minimize => {
                if self.surface == Surface::Popup {
                    self.has_summarized = false;
                    self.surface = Surface::MiniBar;
                }
            }
            ControllerAction::Expand => {
                if self.surface == Surface::MiniBar {
                    self.open_popup();
                }
            }
            ControllerAction::SummarizeAgain => {
                if self.surface == Surface::MiniBar {
                    self.has_summarized = true;
                    self.open_popup();
                }
            }
            ControllerAction::Reload(time) => {
                if self.surface == Surface::Popup {
                    self.notice = Some(format!("Reloaded at {}.", time));
                }
            }
            ControllerAction::Close => {
                if self.surface == Surface::Popup {
                    self.has_summarized = false;
                    self.surface = Surface::Idle;
                }
            }
            ControllerAction::ShowButton => {
                if self.surface == Surface::Idle && !self.has_summarized {
                    self.surface = Surface::Button;
                }
            }
            ControllerAction::LoadingChanged { generation, loading } => {
                if loading {
                    if generation >= self.generation {
                        self.generation = generation;
                        self.loading = true;
                        self.error = None;
                    }
                } else if generation == self.generation {
                    self.loading = false;
                }
            }
            ControllerAction::ExtractionFinished { generation, outcome } => {
                if generation != self.generation {
                    log::debug!("Discarding result of superseded extraction {}", generation);
                    return;
                }

                self.loading = false;
                match outcome {
                    Ok(text) => {
                        self.has_summarized = true;
                        self.summary_text = text;
                        self.error = None;
                    }
                    Err(message) => {
                        self.error = Some(message);
                    }
                }
            }
        }
    }

    fn open_popup(&mut self) {
        self.notice = None;
        self.surface = Surface::Popup;
    }
}
