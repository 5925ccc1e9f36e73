//! Lokalisering: aktivt språk och uppslag med engelska som reserv
//!
//! `Localizer` är ett explicit kontextvärde. Det skapas vid start, synkas mot
//! inställningarna när de laddas och ändras endast via inställningsflödet.

pub mod catalog;

pub use catalog::Catalog;

use crate::models::Language;

/// Aktivt språk plus ordböcker
#[derive(Debug, Clone, Copy)]
pub struct Localizer {
    language: Language,
    catalog: &'static Catalog,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Language::En)
    }
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self::with_catalog(language, Catalog::builtin())
    }

    pub fn with_catalog(language: Language, catalog: &'static Catalog) -> Self {
        Self { language, catalog }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Översätt en nyckel som "settings.language"
    ///
    /// Saknas nyckeln i aktivt språk används engelska, saknas den även där
    /// returneras nyckeln oförändrad.
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        self.catalog
            .lookup(self.language, key)
            .or_else(|| self.catalog.lookup(Language::En, key))
            .unwrap_or(key)
    }

    /// Översätt och ersätt `{namn}`-platshållare
    pub fn translate_with(&self, key: &str, values: &[(&str, String)]) -> String {
        values
            .iter()
            .fold(self.translate(key).to_string(), |text, (name, value)| {
                text.replacen(&format!("{{{}}}", name), value, 1)
            })
    }
}
