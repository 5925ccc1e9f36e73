//! Översättningsordböcker, inbäddade som JSON

use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::Language;

const EN: &str = include_str!("../../resources/translations/en.json");
const DE: &str = include_str!("../../resources/translations/de.json");
const HU: &str = include_str!("../../resources/translations/hu.json");

/// Nästlade strängträd per språk
#[derive(Debug, Default)]
pub struct Catalog {
    languages: HashMap<Language, Value>,
}

impl Catalog {
    /// Bygg en katalog från JSON-text per språk
    ///
    /// Ett språk vars JSON inte går att tolka blir tomt (och faller därmed
    /// tillbaka på engelska vid uppslag).
    pub fn from_sources(sources: &[(Language, &str)]) -> Self {
        let mut languages = HashMap::new();

        for (language, source) in sources {
            match serde_json::from_str::<Value>(source) {
                Ok(tree) => {
                    languages.insert(*language, tree);
                }
                Err(e) => {
                    tracing::warn!("Kunde inte läsa översättningar för {}: {}", language, e);
                }
            }
        }

        Self { languages }
    }

    /// De medföljande ordböckerna
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::from_sources(&[(Language::En, EN), (Language::De, DE), (Language::Hu, HU)])
        })
    }

    /// Slå upp en punktseparerad nyckel i ett språk
    pub fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        let root = self.languages.get(&language)?;
        key.split('.')
            .try_fold(root, |node, segment| node.get(segment))?
            .as_str()
    }
}
