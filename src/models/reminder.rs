use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::AppError;

/// Typ-markering i påminnelsernas data
pub const REMINDER_KIND: &str = "present_reminder";

/// Behörighet att visa notifieringar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

impl FromStr for PermissionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(AppError::validation(format!("Okänd behörighet: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderData {
    #[serde(rename = "type")]
    pub kind: String,
    pub day: u32,
}

/// Innehåll i en påminnelse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
    pub data: ReminderData,
}

impl ReminderPayload {
    pub fn new(title: String, body: String, day: u32) -> Self {
        Self {
            title,
            body,
            data: ReminderData {
                kind: REMINDER_KIND.to_string(),
                day,
            },
        }
    }
}

/// En schemalagd påminnelse som värdtjänsten håller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub id: Option<i64>,
    pub trigger_at: NaiveDateTime,
    pub payload: ReminderPayload,
}
