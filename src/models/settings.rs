use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::AppError;

/// Valuta för belopp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "HUF")]
    Huf,
}

impl Currency {
    pub fn all() -> &'static [Currency] {
        &[Self::Usd, Self::Eur, Self::Huf]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Huf => "HUF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Okänd valuta: {}", s)))
    }
}

/// Visningsspråk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "de")]
    De,
    #[serde(rename = "hu")]
    Hu,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Self::En, Self::De, Self::Hu]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Hu => "hu",
        }
    }

    /// Språkets namn på språket självt
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::De => "Deutsch",
            Self::Hu => "Magyar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Okänt språk: {}", s)))
    }
}

/// Standardvärde för prisgräns på nya personer
pub const DEFAULT_PRICE_LIMIT: f64 = 50.0;

/// Appinställningar (singleton, sparas under en fast nyckel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Total budget, 0 = ingen gräns
    pub global_budget_limit: f64,
    pub default_price_limit: f64,
    pub notifications_enabled: bool,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            global_budget_limit: 0.0,
            default_price_limit: DEFAULT_PRICE_LIMIT,
            notifications_enabled: false,
            currency: Currency::default(),
            language: Language::default(),
        }
    }
}

impl AppSettings {
    pub fn has_budget_limit(&self) -> bool {
        self.global_budget_limit > 0.0
    }

    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        if !self.default_price_limit.is_finite() || self.default_price_limit <= 0.0 {
            return Err(SettingsValidationError::NonPositiveDefaultPrice);
        }

        if !self.global_budget_limit.is_finite() || self.global_budget_limit < 0.0 {
            return Err(SettingsValidationError::NegativeBudget);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsValidationError {
    #[error("Standardpriset måste vara större än noll")]
    NonPositiveDefaultPrice,
    #[error("Budgeten får inte vara negativ")]
    NegativeBudget,
}

impl SettingsValidationError {
    /// Översättningsnyckel för felmeddelandet
    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::NonPositiveDefaultPrice => "settings.errorPrice",
            Self::NegativeBudget => "settings.errorBudget",
        }
    }
}
