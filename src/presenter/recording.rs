//! In-memory presenter that records what would be shown
//!
//! Useful for headless embedding and tests: the rendered state can be
//! inspected, and clicks or checkbox changes can be injected.

use super::{DialogView, Presenter, UiEvent};
use crate::modal::{ModalError, ModalResult, Outcome};
use crate::options::DialogConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

#[derive(Debug, Default)]
struct RecordedDialog {
    config: Option<DialogConfig>,
    enabled: HashMap<Outcome, bool>,
    labels: HashMap<Outcome, String>,
    label_updates: usize,
    renders: usize,
    attached: bool,
    events: Option<mpsc::UnboundedSender<UiEvent>>,
}

#[derive(Debug, Clone)]
pub struct RecordingPresenter {
    surface_available: bool,
    state: Arc<Mutex<RecordedDialog>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self {
            surface_available: true,
            state: Arc::default(),
        }
    }

    /// A presenter whose surface is missing; every render fails
    pub fn unavailable() -> Self {
        Self {
            surface_available: false,
            ..Self::new()
        }
    }

    fn state(&self) -> MutexGuard<'_, RecordedDialog> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, event: UiEvent) -> bool {
        let state = self.state();
        match (&state.events, state.attached) {
            (Some(sender), true) => sender.send(event).is_ok(),
            _ => false,
        }
    }

    /// Simulate activating a control. Returns false when nothing is rendered.
    pub fn click(&self, control: Outcome) -> bool {
        self.send(UiEvent::Clicked(control))
    }

    /// Simulate ticking or unticking the confirmation checkbox
    pub fn toggle_confirmation(&self, checked: bool) -> bool {
        self.send(UiEvent::ConfirmationToggled(checked))
    }

    /// Configuration of the most recent render
    pub fn config(&self) -> Option<DialogConfig> {
        self.state().config.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.state().attached
    }

    pub fn is_enabled(&self, control: Outcome) -> bool {
        self.state().enabled.get(&control).copied().unwrap_or(false)
    }

    /// Currently visible text of a control
    pub fn label(&self, control: Outcome) -> Option<String> {
        self.state().labels.get(&control).cloned()
    }

    /// Number of label changes since the last render
    pub fn label_updates(&self) -> usize {
        self.state().label_updates
    }

    pub fn renders(&self) -> usize {
        self.state().renders
    }
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for RecordingPresenter {
    fn render(
        &self,
        config: &DialogConfig,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> ModalResult<Box<dyn DialogView>> {
        if !self.surface_available {
            return Err(ModalError::NoSurface("recording surface disabled".to_string()));
        }

        let mut state = self.state();
        state.renders += 1;
        state.label_updates = 0;
        state.attached = true;
        state.events = Some(events);
        state.enabled = config.buttons.iter().map(|control| (control, true)).collect();
        state.labels = config
            .buttons
            .iter()
            .map(|control| (control, config.label(control).to_string()))
            .collect();
        state.config = Some(config.clone());

        Ok(Box::new(RecordingView {
            state: self.state.clone(),
        }))
    }
}

struct RecordingView {
    state: Arc<Mutex<RecordedDialog>>,
}

impl RecordingView {
    fn state(&self) -> MutexGuard<'_, RecordedDialog> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DialogView for RecordingView {
    fn set_enabled(&mut self, control: Outcome, enabled: bool) {
        self.state().enabled.insert(control, enabled);
    }

    fn set_label(&mut self, control: Outcome, label: &str) {
        let mut state = self.state();
        state.labels.insert(control, label.to_string());
        state.label_updates += 1;
    }

    fn detach(&mut self) {
        let mut state = self.state();
        state.attached = false;
        state.events = None;
    }
}
