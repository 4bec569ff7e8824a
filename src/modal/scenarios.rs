//! Preset dialogs for common situations
//!
//! Each wrapper only pre-fills [`ShowOptions`] with a [`Scenario`]; explicit
//! options, including `language`, still win.

use super::controller::ModalController;
use super::types::{ModalResult, Outcome};
use crate::options::{Scenario, ShowOptions};

impl ModalController {
    /// Plain yes/no confirmation without a checkbox
    pub async fn show_confirmation(&self, options: ShowOptions) -> ModalResult<Outcome> {
        self.show(options.with_scenario(Scenario::Confirmation)).await
    }

    /// Irreversible action, gated behind the confirmation checkbox
    pub async fn show_dangerous_action(&self, options: ShowOptions) -> ModalResult<Outcome> {
        self.show(options.with_scenario(Scenario::DangerousAction)).await
    }

    /// Work attempted outside permitted hours; offers a settings button
    pub async fn show_working_time_violation(&self, options: ShowOptions) -> ModalResult<Outcome> {
        self.show(options.with_scenario(Scenario::WorkingTimeViolation))
            .await
    }

    /// The user must explicitly accept responsibility before continuing
    pub async fn show_confirmation_with_responsibility(
        &self,
        options: ShowOptions,
    ) -> ModalResult<Outcome> {
        self.show(options.with_scenario(Scenario::Responsibility)).await
    }
}
