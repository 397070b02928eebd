//! Application state for the pricing calculator.
//!
//! All changes go through [`AppState::update`]; callers perform side effects
//! (storage, rendering) themselves and report the outcome back as an
//! [`Action`].

use chrono::{DateTime, Utc};
use pricing_core::{
    HistoryList, ParsePolicy, PricingEngine, PricingForm, PricingMode, PricingRecord, Theme,
};
use tracing::debug;

/// Which panel is in front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Calculator,
    History,
}

/// Outcome of the last action, shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Switch pricing mode. Clears the form when the mode changes.
    SelectMode(PricingMode),
    /// Replace the form contents.
    EditForm(PricingForm),
    /// Parse the form and price it, stamping the record with `at`.
    Calculate { at: DateTime<Utc> },
    /// History as read from storage.
    HistoryLoaded(HistoryList),
    /// History after the current record was persisted.
    Saved(HistoryList),
    ShowHistory,
    ShowCalculator,
    ThemeChanged(Theme),
    ResetForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub panel: Panel,
    pub theme: Theme,
    pub policy: ParsePolicy,
    pub form: PricingForm,
    /// Record produced by the last successful calculation.
    pub current: Option<PricingRecord>,
    pub history: HistoryList,
    pub status: Option<Status>,
    engine: PricingEngine,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ParsePolicy::default())
    }
}

impl AppState {
    pub fn new(policy: ParsePolicy) -> Self {
        Self {
            panel: Panel::default(),
            theme: Theme::default(),
            policy,
            form: PricingForm::default(),
            current: None,
            history: Vec::new(),
            status: None,
            engine: PricingEngine::new(),
        }
    }

    pub fn mode(&self) -> PricingMode {
        self.form.mode()
    }

    pub fn update(
        &mut self,
        action: Action,
    ) {
        debug!(?action, "state update");
        match action {
            Action::SelectMode(mode) => {
                if mode != self.mode() {
                    self.form = PricingForm::empty(mode);
                    self.current = None;
                    self.status = None;
                }
            }
            Action::EditForm(form) => {
                self.form = form;
            }
            Action::Calculate { at } => {
                let result = self
                    .form
                    .parse(self.policy)
                    .map_err(|error| error.to_string())
                    .and_then(|input| {
                        self.engine
                            .compute_at(&input, at)
                            .map_err(|error| error.to_string())
                    });
                match result {
                    Ok(record) => {
                        self.current = Some(record);
                        self.status = Some(Status::Info("Price calculated".to_string()));
                    }
                    Err(message) => {
                        self.current = None;
                        self.status = Some(Status::Error(message));
                    }
                }
            }
            Action::HistoryLoaded(history) => {
                self.history = history;
            }
            Action::Saved(history) => {
                self.history = history;
                self.status = Some(Status::Info("Calculation saved to history".to_string()));
            }
            Action::ShowHistory => self.panel = Panel::History,
            Action::ShowCalculator => self.panel = Panel::Calculator,
            Action::ThemeChanged(theme) => self.theme = theme,
            Action::ResetForm => {
                self.form = PricingForm::empty(self.mode());
                self.current = None;
                self.status = None;
            }
        }
    }
}
