//! Modal warning dialogs that resolve with the user's choice
//!
//! A [`ModalController`] owns at most one open dialog. Each call to
//! [`ModalController::show`] resolves its options into a [`DialogConfig`],
//! renders it through a [`presenter::Presenter`], and settles exactly once
//! with an [`Outcome`]: a button click, an auto-dismiss timeout, or a
//! programmatic [`ModalController::close`].

pub mod config;
pub mod locale;
pub mod modal;
pub mod options;
pub mod presenter;
pub mod sound;

pub use modal::{
    ControllerOptions, ModalController, ModalControllerBuilder, ModalError, ModalResult, Outcome,
    PendingDialog,
};
pub use options::{DialogConfig, GlobalSettings, IconKind, Scenario, ShowOptions, Theme, ThemeSetting};
