//! Merges per-call options, global settings and defaults
//!
//! Priority per field, highest first:
//! 1. explicit value in [`ShowOptions`]
//! 2. deprecated aliases (`dark_theme`, `auto_dismiss_timeout[_seconds]`)
//! 3. [`GlobalSettings`]
//! 4. hardcoded defaults

use super::legacy::LegacyAliases;
use super::{
    normalize_timeout, ButtonSet, ColorSchemeProbe, DialogConfig, GlobalSettings, ShowOptions,
    Theme, ThemeSetting,
};
use crate::locale::{normalize_language, LocaleResolver};
use crate::modal::Outcome;

pub struct OptionResolver<'a> {
    locales: &'a LocaleResolver,
    color_scheme: &'a dyn ColorSchemeProbe,
}

impl<'a> OptionResolver<'a> {
    pub fn new(locales: &'a LocaleResolver, color_scheme: &'a dyn ColorSchemeProbe) -> Self {
        Self {
            locales,
            color_scheme,
        }
    }

    /// Language used for every text lookup of this call
    pub fn effective_language(options: &ShowOptions, settings: &GlobalSettings) -> String {
        options
            .language
            .as_deref()
            .map(normalize_language)
            .unwrap_or_else(|| settings.language.clone())
    }

    pub fn resolve(&self, options: &ShowOptions, settings: &GlobalSettings) -> DialogConfig {
        let legacy = LegacyAliases::from_options(options);
        let language = Self::effective_language(options, settings);
        let scenario = options.scenario.unwrap_or_default();
        let text = |explicit: &Option<String>, key: &str| {
            explicit
                .clone()
                .unwrap_or_else(|| self.locales.resolve(&language, key))
        };

        // Explicit option, then deprecated alias, then global setting
        let theme_setting = options.theme.or(legacy.theme).unwrap_or(settings.theme);
        let timeout = match options.timeout.or(legacy.timeout) {
            Some(seconds) => normalize_timeout(seconds),
            None => settings.timeout,
        };

        // Continue and cancel are shown unless hidden; settings depends on the scenario
        let buttons = ButtonSet::empty()
            .with(Outcome::Continue, options.show_continue.unwrap_or(true))
            .with(Outcome::Cancel, options.show_cancel.unwrap_or(true))
            .with(
                Outcome::Settings,
                options.show_settings.unwrap_or(scenario.shows_settings()),
            )
            .with(Outcome::Help, options.show_help.unwrap_or(false))
            .with(Outcome::Danger, options.show_danger.unwrap_or(false));

        DialogConfig {
            title: text(&options.title, scenario.title_key()),
            message: text(&options.message, scenario.message_key()),
            buttons,
            confirm_label: text(&options.confirm_label, scenario.confirm_label_key()),
            cancel_label: text(&options.cancel_label, Outcome::Cancel.label_key()),
            // These labels have no per-call override
            settings_label: self.locales.resolve(&language, Outcome::Settings.label_key()),
            help_label: self.locales.resolve(&language, Outcome::Help.label_key()),
            danger_label: self.locales.resolve(&language, Outcome::Danger.label_key()),
            icon: options.icon.unwrap_or(scenario.icon()),
            require_confirmation: options
                .require_confirmation
                .unwrap_or(scenario.requires_confirmation()),
            confirmation_text: text(&options.confirmation_text, scenario.confirmation_key()),
            initially_disabled: options.initially_disabled.unwrap_or(false),
            sound: options.sound.unwrap_or(false),
            sound_path: options
                .sound_path
                .clone()
                .unwrap_or_else(|| settings.sound_path.clone()),
            theme: self.resolve_theme(theme_setting),
            timeout,
            language,
        }
    }

    /// `auto` asks the color-scheme probe on every resolution
    fn resolve_theme(&self, setting: ThemeSetting) -> Theme {
        match setting {
            ThemeSetting::Dark => Theme::Dark,
            ThemeSetting::Light => Theme::Light,
            ThemeSetting::Auto if self.color_scheme.prefers_dark() => Theme::Dark,
            ThemeSetting::Auto => Theme::Light,
        }
    }
}
