//! Typad lagring av personlistan och inställningarna
//!
//! Båda posterna sparas som JSON under fasta nycklar och skrivs alltid om i
//! sin helhet. Läsningar misslyckas aldrig: saknade eller trasiga poster
//! ersätts med tom lista respektive standardinställningar.

use tracing::{info, warn};

use crate::db::KeyValueStore;
use crate::models::{AppSettings, Person};
use crate::utils::{AppError, AppResult};

pub const PEOPLE_KEY: &str = "@krampus:people";
pub const SETTINGS_KEY: &str = "@krampus:settings";

pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Hämta personlistan (tom om den saknas eller inte går att läsa)
    pub fn load_people(&self) -> Vec<Person> {
        let data = match self.store.get(PEOPLE_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Kunde inte läsa personlistan: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(people) => people,
            Err(e) => {
                warn!("Personlistan är trasig, använder tom lista: {}", e);
                Vec::new()
            }
        }
    }

    /// Spara hela personlistan
    pub fn save_people(&self, people: &[Person]) -> AppResult<()> {
        let data = serde_json::to_string(people)?;
        self.store.set(PEOPLE_KEY, &data).map_err(|e| {
            warn!("Kunde inte spara personlistan: {}", e);
            into_storage_error(e)
        })
    }

    /// Hämta inställningar
    ///
    /// Finns ingen giltig post sparas standardinställningarna först, så att
    /// nästa läsning ger samma värde.
    pub fn load_settings(&self) -> AppSettings {
        let data = match self.store.get(SETTINGS_KEY) {
            Ok(data) => data,
            Err(e) => {
                warn!("Kunde inte läsa inställningar, använder standard: {}", e);
                return AppSettings::default();
            }
        };

        if let Some(data) = data {
            match serde_json::from_str(&data) {
                Ok(settings) => return settings,
                Err(e) => warn!("Inställningarna är trasiga, återställer standard: {}", e),
            }
        }

        let defaults = AppSettings::default();
        match self.save_settings(&defaults) {
            Ok(()) => info!("Skapade standardinställningar"),
            Err(e) => warn!("Kunde inte spara standardinställningar: {}", e),
        }
        defaults
    }

    /// Spara inställningar
    pub fn save_settings(&self, settings: &AppSettings) -> AppResult<()> {
        let data = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &data).map_err(|e| {
            warn!("Kunde inte spara inställningar: {}", e);
            into_storage_error(e)
        })
    }
}

fn into_storage_error(err: AppError) -> AppError {
    match err {
        AppError::Storage(_) => err,
        other => AppError::storage(other.to_string()),
    }
}
