//! Rendering boundary between the controller and a concrete UI
//!
//! A [`Presenter`] turns a [`DialogConfig`] into something visible and
//! reports user interaction back as [`UiEvent`]s. The controller then
//! drives the rendered dialog through its [`DialogView`].

pub mod recording;
pub mod terminal;

pub use recording::RecordingPresenter;
pub use terminal::TerminalPresenter;

use crate::modal::{ModalResult, Outcome};
use crate::options::DialogConfig;
use tokio::sync::mpsc;

/// Interaction reported by a rendered dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A control was activated
    Clicked(Outcome),
    /// The confirmation checkbox changed state
    ConfirmationToggled(bool),
}

/// Handle to a dialog that is currently rendered
pub trait DialogView: Send {
    fn set_enabled(&mut self, control: Outcome, enabled: bool);

    fn set_label(&mut self, control: Outcome, label: &str);

    /// Remove the dialog from the surface. Called once, on close.
    fn detach(&mut self);
}

/// Renders dialogs.
///
/// `render` must fail with [`crate::ModalError::NoSurface`] when there is
/// nothing to render on.
pub trait Presenter: Send + Sync {
    fn render(
        &self,
        config: &DialogConfig,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> ModalResult<Box<dyn DialogView>>;
}
