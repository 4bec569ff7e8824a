//! Where locale tables come from

use super::LocaleTable;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

const EN: &str = include_str!("data/en.json");
const TR: &str = include_str!("data/tr.json");
const DE: &str = include_str!("data/de.json");

/// Provides the string table for a language code
#[async_trait]
pub trait LocaleSource: Send + Sync {
    async fn fetch(&self, language: &str) -> Result<LocaleTable>;
}

/// Tables compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLocales;

impl BuiltinLocales {
    /// Languages with a compiled-in table
    pub const LANGUAGES: [&'static str; 3] = ["en", "tr", "de"];

    fn raw(language: &str) -> Option<&'static str> {
        match language {
            "en" => Some(EN),
            "tr" => Some(TR),
            "de" => Some(DE),
            _ => None,
        }
    }

    /// The English table, which every resolver is seeded with
    pub fn english() -> LocaleTable {
        LocaleTable::from_json(EN).expect("built-in English locale is valid JSON")
    }
}

#[async_trait]
impl LocaleSource for BuiltinLocales {
    async fn fetch(&self, language: &str) -> Result<LocaleTable> {
        let raw = Self::raw(language)
            .ok_or_else(|| anyhow!("No built-in locale for '{}'", language))?;
        LocaleTable::from_json(raw)
            .with_context(|| format!("Built-in locale '{}' is malformed", language))
    }
}

/// Reads `<dir>/<language>.json`, falling back to the built-in tables
#[derive(Debug, Clone)]
pub struct DirectoryLocales {
    dir: PathBuf,
}

impl DirectoryLocales {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl LocaleSource for DirectoryLocales {
    async fn fetch(&self, language: &str) -> Result<LocaleTable> {
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!("Invalid language code '{}'", language);
        }

        let path = self.dir.join(format!("{}.json", language));
        if !path.exists() {
            return BuiltinLocales.fetch(language).await;
        }

        debug!("Loading locale from: {}", path.display());
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        LocaleTable::from_json(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATEGORIES: [&str; 5] = ["defaults", "buttons", "titles", "messages", "timeout"];

    #[tokio::test]
    async fn test_builtin_tables_parse_and_cover_every_english_key() {
        let english = BuiltinLocales::english();
        let keys = [
            "defaults.title",
            "defaults.message",
            "defaults.confirmation",
            "buttons.continue",
            "buttons.cancel",
            "buttons.settings",
            "buttons.help",
            "buttons.danger",
            "titles.default",
            "titles.confirmation",
            "titles.danger",
            "titles.working_time",
            "titles.responsibility",
            "messages.danger",
            "messages.working_time",
            "messages.responsibility",
            "messages.responsibility_confirmation",
            "timeout.countdown",
        ];

        for language in BuiltinLocales::LANGUAGES {
            let table = BuiltinLocales.fetch(language).await.unwrap();
            for key in keys {
                assert!(table.get(key).is_some(), "{} lacks {}", language, key);
                assert!(english.get(key).is_some());
            }
            for category in CATEGORIES {
                assert!(table.get(category).is_none(), "{} is a group", category);
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_builtin_language_fails() {
        assert!(BuiltinLocales.fetch("xx").await.is_err());
    }

    #[tokio::test]
    async fn test_directory_source_prefers_files_and_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("fr.json"),
            r#"{"buttons": {"cancel": "Annuler"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("es.json"), "not json").unwrap();

        let source = DirectoryLocales::new(dir.path());

        let fr = source.fetch("fr").await.unwrap();
        assert_eq!(fr.get("buttons.cancel"), Some("Annuler"));

        let tr = source.fetch("tr").await.unwrap();
        assert_eq!(tr.get("buttons.cancel"), Some("İptal"));

        assert!(source.fetch("es").await.is_err());
        assert!(source.fetch("../etc").await.is_err());
    }

    #[tokio::test]
    async fn test_directory_english_file_wins_over_builtin() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"buttons": {"cancel": "Abort"}}"#)
            .unwrap();

        let resolver = crate::locale::LocaleResolver::new(std::sync::Arc::new(
            DirectoryLocales::new(dir.path()),
        ));
        resolver.load_language("en").await;

        assert_eq!(resolver.resolve("en", "buttons.cancel"), "Abort");
        assert_eq!(resolver.resolve("en", "buttons.help"), "Help");
    }
}
