//! System color-scheme detection for the `auto` theme

/// Reports whether the environment prefers a dark color scheme
pub trait ColorSchemeProbe: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

impl<F> ColorSchemeProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn prefers_dark(&self) -> bool {
        self()
    }
}

/// Always answers the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub bool);

impl ColorSchemeProbe for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

/// Reads the terminal's `COLORFGBG` convention (`"<fg>;<bg>"`).
///
/// Background colors 0-6 and 8 are the dark half of the ANSI palette.
/// Without the variable the terminal is assumed to be light.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalColorScheme;

impl TerminalColorScheme {
    fn parse(colorfgbg: &str) -> Option<bool> {
        let background: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
        Some(matches!(background, 0..=6 | 8))
    }
}

impl ColorSchemeProbe for TerminalColorScheme {
    fn prefers_dark(&self) -> bool {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_parsing() {
        assert_eq!(TerminalColorScheme::parse("15;0"), Some(true));
        assert_eq!(TerminalColorScheme::parse("0;15"), Some(false));
        assert_eq!(TerminalColorScheme::parse("15;default;8"), Some(true));
        assert_eq!(TerminalColorScheme::parse("garbage"), None);
    }

    #[test]
    fn test_closures_are_probes() {
        let probe = || true;
        assert!(probe.prefers_dark());
        assert!(!FixedColorScheme(false).prefers_dark());
    }
}
