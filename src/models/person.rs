use serde::{Deserialize, Serialize};

/// En person på julklappslistan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub present_type: String,
    /// Specifik present, tom sträng om ingen är vald än
    #[serde(default)]
    pub present_name: String,
    pub price_limit: f64,
    #[serde(default)]
    pub is_bought: bool,
    /// Faktiskt pris, finns endast när presenten är köpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_price: Option<f64>,
}

/// Köpstatus för en persons present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Unbought,
    Bought,
}

/// Formulärdata för att skapa eller redigera en person
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonDraft {
    pub name: String,
    pub present_type: String,
    pub present_name: String,
    pub price_limit: f64,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, present_type: impl Into<String>, price_limit: f64) -> Self {
        Self {
            name: name.into(),
            present_type: present_type.into(),
            present_name: String::new(),
            price_limit,
        }
    }

    pub fn with_present_name(mut self, present_name: impl Into<String>) -> Self {
        self.present_name = present_name.into();
        self
    }

    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.name.trim().is_empty() {
            return Err(PersonValidationError::MissingName);
        }

        if self.present_type.trim().is_empty() {
            return Err(PersonValidationError::MissingPresentType);
        }

        if !self.price_limit.is_finite() || self.price_limit <= 0.0 {
            return Err(PersonValidationError::NonPositivePriceLimit);
        }

        Ok(())
    }
}

impl Person {
    /// Skapa en ny person med genererat id
    pub fn create(draft: &PersonDraft) -> Result<Self, PersonValidationError> {
        draft.validate()?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name.trim().to_string(),
            present_type: draft.present_type.trim().to_string(),
            present_name: draft.present_name.trim().to_string(),
            price_limit: draft.price_limit,
            is_bought: false,
            actual_price: None,
        })
    }

    /// Uppdatera uppgifter från formulär (köpstatus lämnas orörd)
    pub fn apply_draft(&mut self, draft: &PersonDraft) -> Result<(), PersonValidationError> {
        draft.validate()?;

        self.name = draft.name.trim().to_string();
        self.present_type = draft.present_type.trim().to_string();
        self.present_name = draft.present_name.trim().to_string();
        self.price_limit = draft.price_limit;
        Ok(())
    }

    pub fn status(&self) -> PurchaseStatus {
        if self.is_bought {
            PurchaseStatus::Bought
        } else {
            PurchaseStatus::Unbought
        }
    }

    /// Unbought -> Bought
    pub fn check(&mut self, price: f64) -> Result<(), PurchaseTransitionError> {
        if self.is_bought {
            return Err(PurchaseTransitionError::AlreadyBought);
        }
        self.is_bought = true;
        self.actual_price = Some(price);
        Ok(())
    }

    /// Bought -> Unbought, faktiskt pris nollställs
    pub fn uncheck(&mut self) -> Result<(), PurchaseTransitionError> {
        if !self.is_bought {
            return Err(PurchaseTransitionError::NotBought);
        }
        self.is_bought = false;
        self.actual_price = None;
        Ok(())
    }

    /// Bought -> Bought med nytt pris
    pub fn edit_price(&mut self, price: f64) -> Result<(), PurchaseTransitionError> {
        if !self.is_bought {
            return Err(PurchaseTransitionError::NotBought);
        }
        self.actual_price = Some(price);
        Ok(())
    }

    /// Presentnamn om det finns, annars kategorin
    pub fn present_display(&self) -> &str {
        if self.present_name.is_empty() {
            &self.present_type
        } else {
            &self.present_name
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersonValidationError {
    #[error("Namn krävs")]
    MissingName,
    #[error("Presenttyp krävs")]
    MissingPresentType,
    #[error("Prisgränsen måste vara större än noll")]
    NonPositivePriceLimit,
}

impl PersonValidationError {
    /// Översättningsnyckel för felmeddelandet
    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::MissingName => "people.errorName",
            Self::MissingPresentType => "people.errorType",
            Self::NonPositivePriceLimit => "people.errorPrice",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseTransitionError {
    #[error("Presenten är redan köpt")]
    AlreadyBought,
    #[error("Presenten är inte köpt")]
    NotBought,
}

impl PurchaseTransitionError {
    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::AlreadyBought => "people.errorAlreadyBought",
            Self::NotBought => "people.errorNotBought",
        }
    }
}
