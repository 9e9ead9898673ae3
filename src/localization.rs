//! Localized UI strings
//!
//! One JSON table per language. The `Localizer` is built once by the menu
//! and shared through a `LocaleContext`, which also tracks the active
//! language.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;

use crate::error::{Result, SettingsError};
use crate::ordinal::ordinal_enum;
use crate::persistence::store;

ordinal_enum! {
    /// Supported UI languages
    pub enum Language {
        Russian = 0,
        English = 1,
        Chinese = 2,
    }
}

impl Language {
    /// ISO 639-1 code, also the locale file stem
    pub fn code(&self) -> &'static str {
        match self {
            Language::Russian => "ru",
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "ru" | "russian" => Some(Language::Russian),
            "en" | "english" => Some(Language::English),
            "zh" | "cn" | "chinese" => Some(Language::Chinese),
            _ => None,
        }
    }
}

/// Contents of one locale file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Locale {
    pub id: Language,
    pub code: String,
    /// Language name as shown in its own language
    pub title: String,
    pub values: HashMap<String, String>,
}

/// String tables for every loaded language
#[derive(Debug, Default)]
pub struct Localizer {
    locales: BTreeMap<Language, Locale>,
}

impl Localizer {
    /// Load locale files; any unreadable file fails the whole load
    pub fn load<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut locales = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let locale: Locale =
                store::load(path).map_err(|source| SettingsError::load_failed(path, source))?;
            log::info!(
                "Loaded locale {} ({} strings) from {}",
                locale.code,
                locale.values.len(),
                path.display()
            );
            locales.push(locale);
        }
        Ok(Self::from_locales(locales))
    }

    pub fn from_locales(locales: impl IntoIterator<Item = Locale>) -> Self {
        let mut map = BTreeMap::new();
        for locale in locales {
            if let Some(previous) = map.insert(locale.id, locale) {
                log::warn!("Locale {} loaded twice, keeping the later one", previous.code);
            }
        }
        Self { locales: map }
    }

    /// Languages with a string table, in ordinal order
    pub fn languages(&self) -> Vec<Language> {
        self.locales.keys().copied().collect()
    }

    pub fn title(&self, language: Language) -> Option<&str> {
        self.locales.get(&language).map(|l| l.title.as_str())
    }

    pub fn get(&self, language: Language, key: &str) -> Result<&str> {
        self.locales
            .get(&language)
            .and_then(|locale| locale.values.get(key))
            .map(String::as_str)
            .ok_or_else(|| SettingsError::MissingTranslation {
                language,
                key: key.to_string(),
            })
    }
}

/// Localizer plus the active language, cloned into every configurator
#[derive(Debug, Clone)]
pub struct LocaleContext {
    localizer: Arc<Localizer>,
    active: Arc<Mutex<Language>>,
}

impl LocaleContext {
    pub fn new(localizer: Arc<Localizer>, language: Language) -> Self {
        Self {
            localizer,
            active: Arc::new(Mutex::new(language)),
        }
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn language(&self) -> Language {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_language(&self, language: Language) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = language;
    }

    /// Text for `key` in the active language, or a `#key` placeholder
    pub fn text(&self, key: &str) -> String {
        match self.localizer.get(self.language(), key) {
            Ok(text) => text.to_string(),
            Err(err) => {
                log::warn!("{}", err);
                format!("#{}", key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(id: Language, pairs: &[(&str, &str)]) -> Locale {
        Locale {
            id,
            code: id.code().to_string(),
            title: format!("{:?}", id),
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_lookup_and_missing_key() {
        let localizer = Localizer::from_locales([locale(Language::English, &[("sound", "Sound")])]);
        assert_eq!(localizer.get(Language::English, "sound").unwrap(), "Sound");

        let err = localizer.get(Language::English, "fx_volume").unwrap_err();
        assert!(matches!(err, SettingsError::MissingTranslation { .. }));

        let err = localizer.get(Language::Chinese, "sound").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::MissingTranslation {
                language: Language::Chinese,
                ..
            }
        ));
    }

    #[test]
    fn test_context_follows_active_language() {
        let localizer = Arc::new(Localizer::from_locales([
            locale(Language::English, &[("settings", "Settings")]),
            locale(Language::Russian, &[("settings", "Настройки")]),
        ]));
        let ctx = LocaleContext::new(localizer, Language::English);
        let shared = ctx.clone();

        assert_eq!(ctx.text("settings"), "Settings");
        shared.set_language(Language::Russian);
        assert_eq!(ctx.text("settings"), "Настройки");
        assert_eq!(ctx.text("nope"), "#nope");
    }

    #[test]
    fn test_locale_file_format() {
        let json = r#"{"Id": 2, "Code": "zh", "Title": "中文", "Values": {"sound": "声音"}}"#;
        let parsed: Locale = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, Language::Chinese);
        assert_eq!(parsed.values["sound"], "声音");
    }

    #[test]
    fn test_language_codes() {
        for language in Language::ALL {
            assert_eq!(Language::from_code(language.code()), Some(*language));
        }
        assert_eq!(Language::from_code("fr"), None);
    }
}
