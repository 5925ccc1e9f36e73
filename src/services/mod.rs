//! Tjänster för Krampus
//!
//! Innehåller affärslogik som inte hör hemma i CLI eller databas.

pub mod coordinator;
pub mod dashboard;
pub mod reminders;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Applied, GiftService};
pub use dashboard::{sorted_for_display, DashboardStats, Progress};
pub use reminders::{
    Clock, FixedClock, LocalNotifier, NotificationHost, ReminderScheduler, ScheduleOutcome,
    SystemClock,
};
pub use storage::{Storage, PEOPLE_KEY, SETTINGS_KEY};
