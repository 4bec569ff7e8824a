//! Auto-dismiss countdown
//!
//! Two tasks per armed dialog: a 1-second tick that relabels the cancel
//! control and closes at zero, and a one-shot deadline that closes
//! regardless of tick drift. Whichever fires first resolves the dialog;
//! closing aborts both.

use super::controller::{Inner, ModalController};
use crate::locale::LocaleResolver;
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);

pub(crate) struct Countdown {
    remaining: u32,
    original_label: String,
    language: String,
    tick: JoinHandle<()>,
    deadline: JoinHandle<()>,
}

impl Countdown {
    pub(crate) fn arm(
        controller: Weak<Inner>,
        generation: u64,
        seconds: u32,
        original_label: String,
        language: String,
    ) -> Self {
        let tick_controller = controller.clone();
        let tick = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(controller) = ModalController::upgrade(&tick_controller) else {
                    break;
                };
                if !controller.on_tick(generation) {
                    break;
                }
            }
        });

        let deadline = tokio::spawn(async move {
            sleep(Duration::from_secs(u64::from(seconds))).await;
            if let Some(controller) = ModalController::upgrade(&controller) {
                controller.on_deadline(generation);
            }
        });

        Self {
            remaining: seconds,
            original_label,
            language,
            tick,
            deadline,
        }
    }

    /// Count one second down and return what is left
    pub(crate) fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Cancel label with the countdown, always built from the original text
    pub(crate) fn label(&self, locales: &LocaleResolver) -> String {
        let seconds = self.remaining.to_string();
        locales.format(
            &self.language,
            "timeout.countdown",
            &[("label", self.original_label.as_str()), ("seconds", seconds.as_str())],
        )
    }

    pub(crate) fn disarm(self) {
        self.tick.abort();
        self.deadline.abort();
    }
}
