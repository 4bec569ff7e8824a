//! Dialog lifecycle: opening, gating, countdown and resolution
//!
//! The [`ModalController`] owns one dialog at a time. Each dialog moves
//! `Idle -> Open -> Idle` and settles its [`PendingDialog`] exactly once.

mod controller;
mod countdown;
mod scenarios;
mod types;

pub use controller::{ControllerOptions, ModalController, ModalControllerBuilder, PendingDialog};
pub use types::*;
