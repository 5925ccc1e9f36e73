//! Påminnelser i december
//!
//! Varje omschemaläggning avbryter först alla befintliga påminnelser och
//! bygger sedan om hela omgången från lagrat tillstånd, så det finns aldrig
//! mer än en aktiv omgång.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::{KeyValueStore, NotificationRepository};
use crate::i18n::Localizer;
use crate::models::{PermissionStatus, ReminderPayload, ScheduledReminder};
use crate::services::dashboard::Progress;
use crate::services::storage::Storage;
use crate::utils::AppResult;

/// Dagar i december som får en påminnelse
pub const REMINDER_DAYS: [u32; 7] = [1, 10, 15, 20, 22, 23, 24];

/// Klockslag för påminnelserna (lokal tid)
pub const REMINDER_HOUR: u32 = 9;

const DECEMBER: u32 = 12;

/// Plattformens notifieringstjänst
pub trait NotificationHost {
    fn get_permission(&self) -> AppResult<PermissionStatus>;
    fn request_permission(&self) -> AppResult<PermissionStatus>;
    fn cancel_all(&self) -> AppResult<()>;
    fn schedule_at(&self, trigger_at: NaiveDateTime, payload: &ReminderPayload) -> AppResult<()>;
}

/// Källa för "nu" (lokal väggklocka)
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Fast tidpunkt, för tester och `--now`
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Resultat av en omschemaläggning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    /// Antal påminnelser som lades in
    Scheduled(usize),
    /// Alla påminnelser avbröts (notifieringar avstängda)
    Cancelled,
    PermissionDenied,
    /// Värden svarade med fel, inget schemalades
    Failed,
}

/// Påminnelsetider för december, utifrån "nu"
///
/// Dagar som redan passerats tas inte med.
pub fn reminder_instants(now: NaiveDateTime) -> Vec<(u32, NaiveDateTime)> {
    let year = now.year();
    let days: Vec<u32> = if now.month() == DECEMBER {
        REMINDER_DAYS
            .iter()
            .copied()
            .filter(|day| *day >= now.day())
            .collect()
    } else {
        REMINDER_DAYS.to_vec()
    };

    days.into_iter()
        .filter_map(|day| {
            let trigger = NaiveDate::from_ymd_opt(year, DECEMBER, day)?.and_hms_opt(REMINDER_HOUR, 0, 0)?;
            (trigger >= now).then_some((day, trigger))
        })
        .collect()
}

/// Schemaläggare som läser aktuellt tillstånd ur lagringen vid varje körning
pub struct ReminderScheduler<'a, S, N: ?Sized, C: ?Sized> {
    storage: &'a Storage<S>,
    host: &'a N,
    clock: &'a C,
}

impl<'a, S, N, C> ReminderScheduler<'a, S, N, C>
where
    S: KeyValueStore,
    N: NotificationHost + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(storage: &'a Storage<S>, host: &'a N, clock: &'a C) -> Self {
        Self {
            storage,
            host,
            clock,
        }
    }

    /// Avbryt alla påminnelser och lägg in decembers påminnelser på nytt
    pub fn schedule_all(&self) -> ScheduleOutcome {
        if !self.ensure_permission() {
            warn!("Notifieringar är inte tillåtna, inga påminnelser schemaläggs");
            return ScheduleOutcome::PermissionDenied;
        }

        if let Err(e) = self.host.cancel_all() {
            warn!("Kunde inte avbryta tidigare påminnelser: {}", e);
            return ScheduleOutcome::Failed;
        }

        let now = self.clock.now();
        let mut scheduled = 0;

        for (day, trigger_at) in reminder_instants(now) {
            if trigger_at < now {
                continue;
            }

            let settings = self.storage.load_settings();
            if !settings.notifications_enabled {
                debug!("Notifieringar avstängda, hoppar över {} december", day);
                continue;
            }

            let people = self.storage.load_people();
            let progress = Progress::from_people(&people);
            let payload = build_payload(&Localizer::new(settings.language), &progress, day);

            match self.host.schedule_at(trigger_at, &payload) {
                Ok(()) => {
                    debug!("Påminnelse schemalagd {}", trigger_at);
                    scheduled += 1;
                }
                Err(e) => warn!("Kunde inte schemalägga påminnelse för {} december: {}", day, e),
            }
        }

        info!("Schemalade {} påminnelser", scheduled);
        ScheduleOutcome::Scheduled(scheduled)
    }

    /// Bygg om påminnelserna, eller avbryt dem om notifieringar är avstängda
    pub fn update_all(&self) -> ScheduleOutcome {
        if !self.storage.load_settings().notifications_enabled {
            return self.cancel_all();
        }

        self.schedule_all()
    }

    pub fn cancel_all(&self) -> ScheduleOutcome {
        match self.host.cancel_all() {
            Ok(()) => {
                info!("Alla påminnelser avbrutna");
                ScheduleOutcome::Cancelled
            }
            Err(e) => {
                warn!("Kunde inte avbryta påminnelser: {}", e);
                ScheduleOutcome::Failed
            }
        }
    }

    fn ensure_permission(&self) -> bool {
        match self.host.get_permission() {
            Ok(status) if status.is_granted() => return true,
            Ok(_) => {}
            Err(e) => warn!("Kunde inte läsa notifieringsbehörighet: {}", e),
        }

        match self.host.request_permission() {
            Ok(status) => status.is_granted(),
            Err(e) => {
                warn!("Kunde inte begära notifieringsbehörighet: {}", e);
                false
            }
        }
    }
}

fn build_payload(localizer: &Localizer, progress: &Progress, day: u32) -> ReminderPayload {
    let title = localizer.translate("notifications.reminderTitle").to_string();
    let body = localizer.translate_with(
        "notifications.reminderMessage",
        &[
            ("progress", progress.percent.to_string()),
            ("bought", progress.bought.to_string()),
            ("total", progress.total.to_string()),
        ],
    );

    ReminderPayload::new(title, body, day)
}

/// Lokal notifieringsvärd: påminnelser sparas i databasen
///
/// Behörighetsfrågor besvaras enligt konfigurationen.
pub struct LocalNotifier {
    repo: NotificationRepository,
    permission: PermissionStatus,
}

impl LocalNotifier {
    pub fn new(repo: NotificationRepository, permission: PermissionStatus) -> Self {
        Self { repo, permission }
    }

    /// Väntande påminnelser i tidsordning
    ///
    /// Påminnelser vars tid har passerat räknas som levererade och tas bort.
    pub fn pending(&self, now: NaiveDateTime) -> AppResult<Vec<ScheduledReminder>> {
        let fired = self.repo.delete_fired(now)?;
        if fired > 0 {
            debug!("{} påminnelser har redan levererats", fired);
        }
        self.repo.find_all()
    }
}

impl NotificationHost for LocalNotifier {
    fn get_permission(&self) -> AppResult<PermissionStatus> {
        Ok(self.permission)
    }

    fn request_permission(&self) -> AppResult<PermissionStatus> {
        info!("Notifieringsbehörighet begärd: {}", self.permission);
        Ok(self.permission)
    }

    fn cancel_all(&self) -> AppResult<()> {
        let removed = self.repo.delete_all()?;
        debug!("Tog bort {} påminnelser", removed);
        Ok(())
    }

    fn schedule_at(&self, trigger_at: NaiveDateTime, payload: &ReminderPayload) -> AppResult<()> {
        self.repo.insert(trigger_at, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, KvRepository};
    use crate::models::{AppSettings, Language, Person, PersonDraft, REMINDER_KIND};
    use crate::services::testing::RecordingHost;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn storage_with(enabled: bool, people: &[Person]) -> Storage<KvRepository> {
        let storage = Storage::new(Database::open_in_memory().unwrap().kv());
        storage
            .save_settings(&AppSettings {
                notifications_enabled: enabled,
                ..Default::default()
            })
            .unwrap();
        storage.save_people(people).unwrap();
        storage
    }

    fn person(name: &str, bought: bool) -> Person {
        let mut p = Person::create(&PersonDraft::new(name, "Bok", 20.0)).unwrap();
        if bought {
            p.check(10.0).unwrap();
        }
        p
    }

    #[test]
    fn test_instants_before_december() {
        let instants = reminder_instants(at(2025, 10, 18, 12, 0));
        let days: Vec<u32> = instants.iter().map(|(d, _)| *d).collect();
        assert_eq!(days, REMINDER_DAYS.to_vec());
        assert_eq!(instants[0].1, at(2025, 12, 1, 9, 0));
        assert_eq!(instants[6].1, at(2025, 12, 24, 9, 0));
    }

    #[test]
    fn test_instants_in_december() {
        // 1 december kl 10 har redan passerats
        let days: Vec<u32> = reminder_instants(at(2025, 12, 1, 10, 0))
            .iter()
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(days, vec![10, 15, 20, 22, 23, 24]);

        // Dagens påminnelse kl 9 ligger fortfarande framåt
        let days: Vec<u32> = reminder_instants(at(2025, 12, 15, 8, 0))
            .iter()
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(days, vec![15, 20, 22, 23, 24]);

        assert!(reminder_instants(at(2025, 12, 25, 0, 0)).is_empty());
    }

    #[test]
    fn test_schedule_all_before_december() {
        let storage = storage_with(true, &[person("A", true), person("B", false), person("C", false)]);
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 10, 18, 12, 0));

        let outcome = ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::Scheduled(7));
        assert_eq!(host.scheduled_days(), REMINDER_DAYS.to_vec());

        let scheduled = host.scheduled.borrow();
        let (trigger, payload) = &scheduled[0];
        assert_eq!(*trigger, at(2025, 12, 1, 9, 0));
        assert_eq!(payload.data.kind, REMINDER_KIND);
        assert_eq!(payload.title, "Christmas present reminder");
        assert_eq!(
            payload.body,
            "You have bought 1 of 3 presents (33%). Keep going!"
        );
    }

    #[test]
    fn test_schedule_twice_never_accumulates() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 11, 1, 8, 0));
        let scheduler = ReminderScheduler::new(&storage, &host, &clock);

        scheduler.schedule_all();
        scheduler.schedule_all();

        assert_eq!(host.count(), 7);
        assert_eq!(host.cancel_calls.get(), 2);
    }

    #[test]
    fn test_past_first_of_december_skipped() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 12, 1, 9, 30));

        let outcome = ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::Scheduled(6));
        assert_eq!(host.scheduled_days(), vec![10, 15, 20, 22, 23, 24]);
    }

    #[test]
    fn test_empty_people_gives_zero_progress() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 12, 23, 12, 0));

        ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        let scheduled = host.scheduled.borrow();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(
            scheduled[0].1.body,
            "You have bought 0 of 0 presents (0%). Keep going!"
        );
    }

    #[test]
    fn test_permission_denied_schedules_nothing() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::denied();
        let clock = FixedClock(at(2025, 10, 1, 0, 0));

        let outcome = ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::PermissionDenied);
        assert_eq!(host.count(), 0);
        assert_eq!(host.permission_requests.get(), 1);
        assert_eq!(host.cancel_calls.get(), 0);
    }

    #[test]
    fn test_permission_requested_when_not_yet_granted() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::granted();
        host.permission.set(PermissionStatus::Denied);
        let clock = FixedClock(at(2025, 10, 1, 0, 0));

        let outcome = ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::Scheduled(7));
        assert_eq!(host.permission_requests.get(), 1);
    }

    #[test]
    fn test_disabled_settings_skip_every_day() {
        let storage = storage_with(false, &[]);
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 10, 1, 0, 0));
        let scheduler = ReminderScheduler::new(&storage, &host, &clock);

        assert_eq!(scheduler.schedule_all(), ScheduleOutcome::Scheduled(0));
        assert_eq!(scheduler.update_all(), ScheduleOutcome::Cancelled);
        assert_eq!(host.count(), 0);
    }

    #[test]
    fn test_update_all_rebuilds_with_current_progress() {
        let storage = storage_with(true, &[person("A", false), person("B", false)]);
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 12, 22, 10, 0));
        let scheduler = ReminderScheduler::new(&storage, &host, &clock);

        scheduler.update_all();
        assert!(host.scheduled.borrow()[0].1.body.contains("(0%)"));

        storage
            .save_people(&[person("A", true), person("B", false)])
            .unwrap();
        assert_eq!(scheduler.update_all(), ScheduleOutcome::Scheduled(2));
        assert_eq!(host.count(), 2);
        assert!(host.scheduled.borrow()[0].1.body.contains("(50%)"));
    }

    #[test]
    fn test_text_follows_stored_language() {
        let storage = storage_with(true, &[]);
        storage
            .save_settings(&AppSettings {
                notifications_enabled: true,
                language: Language::De,
                ..Default::default()
            })
            .unwrap();
        let host = RecordingHost::granted();
        let clock = FixedClock(at(2025, 12, 24, 0, 0));

        ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        let scheduled = host.scheduled.borrow();
        assert_eq!(scheduled[0].1.title, "Weihnachtsgeschenk-Erinnerung");
    }

    #[test]
    fn test_failed_day_does_not_stop_batch() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::granted();
        host.fail_day.set(Some(15));
        let clock = FixedClock(at(2025, 10, 1, 0, 0));

        let outcome = ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::Scheduled(6));
        assert!(!host.scheduled_days().contains(&15));
    }

    #[test]
    fn test_failed_cancel_schedules_nothing() {
        let storage = storage_with(true, &[]);
        let host = RecordingHost::granted();
        host.fail_cancel.set(true);
        let clock = FixedClock(at(2025, 10, 1, 0, 0));

        let outcome = ReminderScheduler::new(&storage, &host, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::Failed);
        assert_eq!(host.count(), 0);
    }

    #[test]
    fn test_local_notifier_persists_batch() {
        let db = Database::open_in_memory().unwrap();
        let storage = Storage::new(db.kv());
        storage
            .save_settings(&AppSettings {
                notifications_enabled: true,
                ..Default::default()
            })
            .unwrap();
        let notifier = LocalNotifier::new(db.notifications(), PermissionStatus::Granted);
        let clock = FixedClock(at(2025, 12, 20, 12, 0));
        let scheduler = ReminderScheduler::new(&storage, &notifier, &clock);

        scheduler.schedule_all();
        scheduler.schedule_all();

        let pending = notifier.pending(clock.now()).unwrap();
        let days: Vec<u32> = pending.iter().map(|r| r.payload.data.day).collect();
        assert_eq!(days, vec![22, 23, 24]);
        assert_eq!(pending[0].trigger_at, at(2025, 12, 22, 9, 0));
    }

    #[test]
    fn test_local_notifier_denied() {
        let db = Database::open_in_memory().unwrap();
        let storage = storage_with(true, &[]);
        let notifier = LocalNotifier::new(db.notifications(), PermissionStatus::Denied);
        let clock = FixedClock(at(2025, 10, 1, 0, 0));

        let outcome = ReminderScheduler::new(&storage, &notifier, &clock).schedule_all();

        assert_eq!(outcome, ScheduleOutcome::PermissionDenied);
        assert!(notifier.pending(clock.now()).unwrap().is_empty());
    }

    #[test]
    fn test_local_notifier_retires_fired_reminders() {
        let db = Database::open_in_memory().unwrap();
        let storage = Storage::new(db.kv());
        storage
            .save_settings(&AppSettings {
                notifications_enabled: true,
                ..Default::default()
            })
            .unwrap();
        let notifier = LocalNotifier::new(db.notifications(), PermissionStatus::Granted);
        let clock = FixedClock(at(2025, 11, 1, 8, 0));

        ReminderScheduler::new(&storage, &notifier, &clock).schedule_all();
        assert_eq!(notifier.pending(clock.now()).unwrap().len(), 7);

        let days: Vec<u32> = notifier
            .pending(at(2025, 12, 20, 12, 0))
            .unwrap()
            .iter()
            .map(|r| r.payload.data.day)
            .collect();
        assert_eq!(days, vec![22, 23, 24]);

        assert!(notifier.pending(at(2025, 12, 26, 12, 0)).unwrap().is_empty());
    }
}
