//! Krampus - julklappslista med budget och påminnelser
//!
//! Personer, presentidéer och köpstatus sparas lokalt i SQLite. Varje
//! ändring bygger om decembers påminnelser utifrån sparat tillstånd.

pub mod db;
pub mod i18n;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports
pub use db::Database;
pub use i18n::Localizer;
pub use models::*;
pub use services::GiftService;
pub use utils::{AppError, AppResult};
