pub mod config;
pub mod person;
pub mod reminder;
pub mod settings;

pub use config::*;
pub use person::*;
pub use reminder::*;
pub use settings::*;
