use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use modalgate::config::Settings;
use modalgate::locale::{
    normalize_language, BuiltinLocales, DirectoryLocales, LocaleResolver, LocaleSource,
};

/// Print the string a dialog would show for a locale key
#[derive(Args, Debug)]
pub struct LookupCommand {
    /// Language code, e.g. `tr` or `de-AT`
    pub lang: String,

    /// Dotted key, e.g. `buttons.continue`
    pub key: String,
}

impl LookupCommand {
    pub async fn execute(&self, settings: &Settings) -> Result<()> {
        println!("{}", self.resolve(settings).await);
        Ok(())
    }

    async fn resolve(&self, settings: &Settings) -> String {
        let source: Arc<dyn LocaleSource> = match &settings.locale_dir {
            Some(dir) => Arc::new(DirectoryLocales::new(dir.clone())),
            None => Arc::new(BuiltinLocales),
        };
        let language = normalize_language(&self.lang);
        let locales = LocaleResolver::new(source);
        locales.load_with_fallback(&language).await;
        locales.resolve(&language, &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(lang: &str, key: &str) -> LookupCommand {
        LookupCommand {
            lang: lang.to_string(),
            key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_builtin_lookup_with_fallback() {
        let settings = Settings::default();
        assert_eq!(lookup("tr-TR", "buttons.cancel").resolve(&settings).await, "İptal");
        assert_eq!(lookup("xx", "buttons.cancel").resolve(&settings).await, "Cancel");
        assert_eq!(lookup("de", "no.such.key").resolve(&settings).await, "no.such.key");
    }

    #[tokio::test]
    async fn test_lookup_reads_locale_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fr.json"), r#"{"buttons": {"cancel": "Annuler"}}"#)
            .unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"buttons": {"help": "Docs"}}"#).unwrap();
        let settings = Settings {
            locale_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(lookup("fr", "buttons.cancel").resolve(&settings).await, "Annuler");
        assert_eq!(lookup("en", "buttons.help").resolve(&settings).await, "Docs");
        assert_eq!(lookup("fr", "buttons.help").resolve(&settings).await, "Docs");
        assert_eq!(lookup("en", "buttons.cancel").resolve(&settings).await, "Cancel");
    }
}
