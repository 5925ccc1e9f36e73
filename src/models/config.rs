use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::PermissionStatus;
use crate::utils::path::{get_config_path, get_database_path};

/// Körningskonfiguration (config.toml), skild från appinställningarna i databasen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Egen databassökväg, annars plattformens datakatalog
    pub database_path: Option<PathBuf>,
    /// error, warn, info, debug eller trace
    pub log_level: String,
    /// Svar från den lokala notifieringsvärden vid behörighetsfrågor
    pub notification_permission: PermissionStatus,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: "warn".to_string(),
            notification_permission: PermissionStatus::Granted,
        }
    }
}

impl AppConfig {
    /// Ladda från standardsökvägen
    pub fn load() -> Self {
        Self::load_from(&get_config_path())
    }

    /// Ladda från en given fil, defaults om filen saknas eller är ogiltig
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ogiltig konfiguration i {:?}, använder standardvärden: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(get_database_path)
    }

    /// Loggnivå, WARN om värdet inte går att tolka
    pub fn tracing_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.trim()).unwrap_or(tracing::Level::WARN)
    }
}
