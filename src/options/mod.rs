//! Dialog options and their resolution into a final configuration
//!
//! Callers describe a dialog with [`ShowOptions`], where every field is
//! optional. The [`OptionResolver`] fills the gaps from deprecated aliases,
//! the controller's [`GlobalSettings`] and hardcoded defaults, producing an
//! immutable [`DialogConfig`].

mod appearance;
mod legacy;
mod resolver;

pub use appearance::{ColorSchemeProbe, FixedColorScheme, TerminalColorScheme};
pub use resolver::OptionResolver;

use crate::locale::FALLBACK_LANGUAGE;
use crate::modal::{ModalError, Outcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Sound played when a dialog opens, unless overridden
pub const DEFAULT_SOUND_PATH: &str = "sounds/warning.wav";

/// Theme preference as configured; `Auto` follows the system color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    Dark,
    #[default]
    Light,
    Auto,
}

impl FromStr for ThemeSetting {
    type Err = ModalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeSetting::Dark),
            "light" => Ok(ThemeSetting::Light),
            "auto" => Ok(ThemeSetting::Auto),
            _ => Err(ModalError::InvalidTheme(s.to_string())),
        }
    }
}

impl fmt::Display for ThemeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeSetting::Dark => "dark",
            ThemeSetting::Light => "light",
            ThemeSetting::Auto => "auto",
        })
    }
}

/// Theme of a resolved dialog. Never `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Warning,
    Danger,
    Info,
    Success,
    #[default]
    Question,
}

impl FromStr for IconKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warning" => Ok(IconKind::Warning),
            "danger" => Ok(IconKind::Danger),
            "info" => Ok(IconKind::Info),
            "success" => Ok(IconKind::Success),
            "question" => Ok(IconKind::Question),
            other => Err(format!("unknown icon '{}'", other)),
        }
    }
}

/// A set of dialog controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSet {
    bits: u8,
}

impl ButtonSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, control: Outcome, present: bool) -> Self {
        self.set(control, present);
        self
    }

    pub fn set(&mut self, control: Outcome, present: bool) {
        if present {
            self.bits |= control.bit();
        } else {
            self.bits &= !control.bit();
        }
    }

    pub fn contains(&self, control: Outcome) -> bool {
        self.bits & control.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Controls in layout order
    pub fn iter(&self) -> impl Iterator<Item = Outcome> + '_ {
        Outcome::ALL.into_iter().filter(|control| self.contains(*control))
    }
}

impl FromIterator<Outcome> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ButtonSet::empty(), |set, control| set.with(control, true))
    }
}

/// Preset families of dialogs, each with its own defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    #[default]
    Generic,
    Confirmation,
    DangerousAction,
    WorkingTimeViolation,
    Responsibility,
}

impl Scenario {
    pub fn icon(&self) -> IconKind {
        match self {
            Scenario::Generic | Scenario::Confirmation => IconKind::Question,
            Scenario::DangerousAction => IconKind::Danger,
            Scenario::WorkingTimeViolation | Scenario::Responsibility => IconKind::Warning,
        }
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            Scenario::Generic => "titles.default",
            Scenario::Confirmation => "titles.confirmation",
            Scenario::DangerousAction => "titles.danger",
            Scenario::WorkingTimeViolation => "titles.working_time",
            Scenario::Responsibility => "titles.responsibility",
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            Scenario::Generic | Scenario::Confirmation => "defaults.message",
            Scenario::DangerousAction => "messages.danger",
            Scenario::WorkingTimeViolation => "messages.working_time",
            Scenario::Responsibility => "messages.responsibility",
        }
    }

    pub fn confirmation_key(&self) -> &'static str {
        match self {
            Scenario::Responsibility => "messages.responsibility_confirmation",
            _ => "defaults.confirmation",
        }
    }

    pub fn confirm_label_key(&self) -> &'static str {
        match self {
            Scenario::DangerousAction => Outcome::Danger.label_key(),
            _ => Outcome::Continue.label_key(),
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, Scenario::Confirmation)
    }

    pub fn shows_settings(&self) -> bool {
        matches!(self, Scenario::WorkingTimeViolation)
    }
}

/// Per-call dialog options. Unset fields fall back to global settings and
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowOptions {
    pub title: Option<String>,
    pub message: Option<String>,
    pub show_continue: Option<bool>,
    pub show_cancel: Option<bool>,
    pub show_settings: Option<bool>,
    pub show_help: Option<bool>,
    pub show_danger: Option<bool>,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
    pub icon: Option<IconKind>,
    pub require_confirmation: Option<bool>,
    pub confirmation_text: Option<String>,
    pub initially_disabled: Option<bool>,
    pub sound: Option<bool>,
    pub sound_path: Option<PathBuf>,
    pub language: Option<String>,
    pub theme: Option<ThemeSetting>,
    /// Seconds until auto-dismiss; zero or negative disables it
    pub timeout: Option<i64>,
    pub scenario: Option<Scenario>,

    /// Deprecated: use `theme`
    pub dark_theme: Option<bool>,
    /// Deprecated: use `timeout`
    pub auto_dismiss_timeout: Option<bool>,
    /// Deprecated: use `timeout`
    pub auto_dismiss_timeout_seconds: Option<i64>,
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_theme(mut self, theme: ThemeSetting) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_timeout(mut self, seconds: i64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn with_icon(mut self, icon: IconKind) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn require_confirmation(mut self, required: bool) -> Self {
        self.require_confirmation = Some(required);
        self
    }

    pub fn initially_disabled(mut self, disabled: bool) -> Self {
        self.initially_disabled = Some(disabled);
        self
    }

    /// Show or hide a single control
    pub fn with_button(mut self, control: Outcome, shown: bool) -> Self {
        let slot = match control {
            Outcome::Continue => &mut self.show_continue,
            Outcome::Cancel => &mut self.show_cancel,
            Outcome::Settings => &mut self.show_settings,
            Outcome::Help => &mut self.show_help,
            Outcome::Danger => &mut self.show_danger,
        };
        *slot = Some(shown);
        self
    }

    pub fn with_sound(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound = Some(true);
        self.sound_path = Some(path.into());
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }
}

/// Controller-wide defaults, the second-to-last fallback tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub language: String,
    pub theme: ThemeSetting,
    pub timeout: Option<u32>,
    pub sound_path: PathBuf,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            language: FALLBACK_LANGUAGE.to_string(),
            theme: ThemeSetting::Light,
            timeout: None,
            sound_path: PathBuf::from(DEFAULT_SOUND_PATH),
        }
    }
}

/// Fully resolved parameters of one dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    pub title: String,
    pub message: String,
    pub buttons: ButtonSet,
    pub confirm_label: String,
    pub cancel_label: String,
    pub settings_label: String,
    pub help_label: String,
    pub danger_label: String,
    pub icon: IconKind,
    pub require_confirmation: bool,
    pub confirmation_text: String,
    pub initially_disabled: bool,
    pub sound: bool,
    pub sound_path: PathBuf,
    pub language: String,
    pub theme: Theme,
    /// `None` when auto-dismiss is disabled, otherwise a positive number of seconds
    pub timeout: Option<u32>,
}

impl DialogConfig {
    /// Visible text of a control
    pub fn label(&self, control: Outcome) -> &str {
        match control {
            Outcome::Continue => &self.confirm_label,
            Outcome::Cancel => &self.cancel_label,
            Outcome::Settings => &self.settings_label,
            Outcome::Help => &self.help_label,
            Outcome::Danger => &self.danger_label,
        }
    }
}

/// Zero and negative timeouts disable auto-dismiss
pub fn normalize_timeout(seconds: i64) -> Option<u32> {
    if seconds > 0 {
        Some(u32::try_from(seconds).unwrap_or(u32::MAX))
    } else {
        None
    }
}
