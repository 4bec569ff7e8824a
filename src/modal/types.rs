//! Core modal types: outcomes and errors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The action a dialog resolved with. Every dialog resolves with exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Continue,
    Cancel,
    Settings,
    Help,
    Danger,
}

impl Outcome {
    /// Every outcome, in the order controls are laid out
    pub const ALL: [Outcome; 5] = [
        Outcome::Continue,
        Outcome::Danger,
        Outcome::Settings,
        Outcome::Help,
        Outcome::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Continue => "continue",
            Outcome::Cancel => "cancel",
            Outcome::Settings => "settings",
            Outcome::Help => "help",
            Outcome::Danger => "danger",
        }
    }

    /// Locale key of the control's default label
    pub fn label_key(&self) -> &'static str {
        match self {
            Outcome::Continue => "buttons.continue",
            Outcome::Cancel => "buttons.cancel",
            Outcome::Settings => "buttons.settings",
            Outcome::Help => "buttons.help",
            Outcome::Danger => "buttons.danger",
        }
    }

    pub(crate) fn bit(&self) -> u8 {
        match self {
            Outcome::Continue => 1,
            Outcome::Cancel => 1 << 1,
            Outcome::Settings => 1 << 2,
            Outcome::Help => 1 << 3,
            Outcome::Danger => 1 << 4,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Outcome::Continue),
            "cancel" => Ok(Outcome::Cancel),
            "settings" => Ok(Outcome::Settings),
            "help" => Ok(Outcome::Help),
            "danger" => Ok(Outcome::Danger),
            other => Err(format!("unknown outcome '{}'", other)),
        }
    }
}

/// Result type for modal operations
pub type ModalResult<T> = std::result::Result<T, ModalError>;

/// Modal-specific error types
#[derive(Debug, thiserror::Error)]
pub enum ModalError {
    #[error("Invalid theme '{0}': expected dark, light or auto")]
    InvalidTheme(String),

    #[error("No rendering surface available: {0}")]
    NoSurface(String),

    #[error("A dialog is already open on this controller")]
    AlreadyOpen,

    #[error("Presenter error: {0}")]
    Presenter(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_parse_and_display() {
        for outcome in Outcome::ALL {
            assert_eq!(outcome.as_str().parse::<Outcome>(), Ok(outcome));
            assert_eq!(outcome.to_string(), outcome.as_str());
        }
        assert_eq!(" Danger ".parse::<Outcome>(), Ok(Outcome::Danger));
        assert!("none".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_outcome_bits_are_distinct() {
        let combined = Outcome::ALL.iter().fold(0u8, |acc, o| {
            assert_eq!(acc & o.bit(), 0);
            acc | o.bit()
        });
        assert_eq!(combined.count_ones(), 5);
    }
}
