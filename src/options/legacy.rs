//! Deprecated option aliases still honored for older callers.
//!
//! Only consulted when the corresponding primary field is unset. Removing
//! this module (and its call in the resolver) drops alias support without
//! touching anything else.

use super::{ShowOptions, ThemeSetting};

/// Seconds used when `auto_dismiss_timeout` is set without a duration
pub const LEGACY_TIMEOUT_SECONDS: i64 = 15;

/// Values recovered from deprecated fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LegacyAliases {
    pub theme: Option<ThemeSetting>,
    pub timeout: Option<i64>,
}

impl LegacyAliases {
    pub fn from_options(options: &ShowOptions) -> Self {
        let theme = match (options.theme, options.dark_theme) {
            (None, Some(true)) => Some(ThemeSetting::Dark),
            (None, Some(false)) => Some(ThemeSetting::Light),
            _ => None,
        };

        let timeout = match (options.timeout, options.auto_dismiss_timeout) {
            (None, Some(true)) => Some(
                options
                    .auto_dismiss_timeout_seconds
                    .unwrap_or(LEGACY_TIMEOUT_SECONDS),
            ),
            _ => None,
        };

        Self { theme, timeout }
    }
}
