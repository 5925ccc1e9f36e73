//! Skrivflöden för personlistan och inställningarna
//!
//! Varje ändring går validera -> spara -> härledda effekter. Effekterna
//! (språkbyte, ombyggnad eller avbrytning av påminnelser) körs bara om
//! skrivningen lyckades.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::KeyValueStore;
use crate::i18n::Localizer;
use crate::models::{AppSettings, Currency, Language, Person, PersonDraft, DEFAULT_PRICE_LIMIT};
use crate::services::reminders::{Clock, NotificationHost, ReminderScheduler, ScheduleOutcome};
use crate::services::storage::Storage;
use crate::utils::currency::amount_or;
use crate::utils::{AppError, AppResult};

/// Resultat av en lyckad ändring
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Applied<T> {
    pub value: T,
    pub reminders: ScheduleOutcome,
}

pub struct GiftService<S, N, C> {
    storage: Storage<S>,
    host: N,
    clock: C,
    localizer: Localizer,
}

impl<S, N, C> GiftService<S, N, C>
where
    S: KeyValueStore,
    N: NotificationHost,
    C: Clock,
{
    pub fn new(store: S, host: N, clock: C) -> Self {
        Self {
            storage: Storage::new(store),
            host,
            clock,
            localizer: Localizer::default(),
        }
    }

    /// Initiering vid start: skapa standardinställningar vid behov och
    /// aktivera det sparade språket
    pub fn startup(&mut self) -> AppSettings {
        let settings = self.settings();
        info!(
            "Startar med språk {} och notifieringar {}",
            settings.language,
            if settings.notifications_enabled { "på" } else { "av" }
        );
        settings
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    pub fn host(&self) -> &N {
        &self.host
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn scheduler(&self) -> ReminderScheduler<'_, S, N, C> {
        ReminderScheduler::new(&self.storage, &self.host, &self.clock)
    }

    /// Hämta inställningar och synka aktivt språk
    pub fn settings(&mut self) -> AppSettings {
        let settings = self.storage.load_settings();
        self.localizer.set_language(settings.language);
        settings
    }

    pub fn people(&self) -> Vec<Person> {
        self.storage.load_people()
    }

    // ============================================================
    // Orkestrering
    // ============================================================

    /// Spara personlistan och bygg om påminnelserna
    pub fn apply_people_change(&mut self, people: &[Person]) -> AppResult<ScheduleOutcome> {
        self.storage.save_people(people)?;
        Ok(self.scheduler().update_all())
    }

    /// Validera och spara inställningar, byt språk och uppdatera påminnelser
    pub fn apply_settings_change(&mut self, settings: &AppSettings) -> AppResult<ScheduleOutcome> {
        settings.validate()?;
        self.storage.save_settings(settings)?;

        self.localizer.set_language(settings.language);

        let scheduler = self.scheduler();
        let outcome = if settings.notifications_enabled {
            scheduler.update_all()
        } else {
            scheduler.cancel_all()
        };
        Ok(outcome)
    }

    // ============================================================
    // Personer
    // ============================================================

    pub fn add_person(&mut self, draft: &PersonDraft) -> AppResult<Applied<Person>> {
        let person = Person::create(draft)?;

        let mut people = self.people();
        people.push(person.clone());
        let reminders = self.apply_people_change(&people)?;

        info!("Lade till {}", person.name);
        Ok(Applied {
            value: person,
            reminders,
        })
    }

    pub fn edit_person(&mut self, id: &str, draft: &PersonDraft) -> AppResult<Applied<Person>> {
        draft.validate()?;
        self.update_person(id, |person| Ok(person.apply_draft(draft)?))
    }

    pub fn delete_person(&mut self, id: &str) -> AppResult<Applied<Person>> {
        let mut people = self.people();
        let index = find_index(&people, id)?;
        let removed = people.remove(index);
        let reminders = self.apply_people_change(&people)?;

        info!("Tog bort {}", removed.name);
        Ok(Applied {
            value: removed,
            reminders,
        })
    }

    /// Markera som köpt; tom eller ogiltig prisinmatning ger 0
    pub fn mark_bought(&mut self, id: &str, price_input: &str) -> AppResult<Applied<Person>> {
        let price = amount_or(price_input, 0.0);
        self.update_person(id, |person| Ok(person.check(price)?))
    }

    pub fn unmark_bought(&mut self, id: &str) -> AppResult<Applied<Person>> {
        self.update_person(id, |person| Ok(person.uncheck()?))
    }

    /// Ändra faktiskt pris på en köpt present; tom eller ogiltig inmatning ger 0
    pub fn edit_actual_price(&mut self, id: &str, price_input: &str) -> AppResult<Applied<Person>> {
        let price = amount_or(price_input, 0.0);
        self.update_person(id, |person| Ok(person.edit_price(price)?))
    }

    fn update_person<F>(&mut self, id: &str, change: F) -> AppResult<Applied<Person>>
    where
        F: FnOnce(&mut Person) -> AppResult<()>,
    {
        let mut people = self.people();
        let index = find_index(&people, id)?;
        change(&mut people[index])?;

        let updated = people[index].clone();
        let reminders = self.apply_people_change(&people)?;

        Ok(Applied {
            value: updated,
            reminders,
        })
    }

    // ============================================================
    // Inställningar
    // ============================================================

    /// Spara budgetfälten från textinmatning
    ///
    /// Tom eller ogiltig total budget blir 0 (ingen gräns), tomt eller
    /// ogiltigt standardpris blir 50.
    pub fn save_budget(
        &mut self,
        global_input: &str,
        default_input: &str,
    ) -> AppResult<Applied<AppSettings>> {
        let global_budget_limit = amount_or(global_input, 0.0);
        let default_price_limit = amount_or(default_input, DEFAULT_PRICE_LIMIT);

        self.update_settings(|settings| {
            settings.global_budget_limit = global_budget_limit;
            settings.default_price_limit = default_price_limit;
        })
    }

    pub fn set_notifications(&mut self, enabled: bool) -> AppResult<Applied<AppSettings>> {
        self.update_settings(|settings| settings.notifications_enabled = enabled)
    }

    pub fn set_currency(&mut self, currency: Currency) -> AppResult<Applied<AppSettings>> {
        self.update_settings(|settings| settings.currency = currency)
    }

    pub fn set_language(&mut self, language: Language) -> AppResult<Applied<AppSettings>> {
        self.update_settings(|settings| settings.language = language)
    }

    fn update_settings<F>(&mut self, change: F) -> AppResult<Applied<AppSettings>>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut settings = self.storage.load_settings();
        change(&mut settings);

        let reminders = self.apply_settings_change(&settings).map_err(|e| {
            if !e.is_validation() {
                warn!("Inställningarna sparades inte: {}", e);
            }
            e
        })?;

        Ok(Applied {
            value: settings,
            reminders,
        })
    }
}

fn find_index(people: &[Person], id: &str) -> AppResult<usize> {
    people
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| AppError::not_found(format!("person {}", id)))
}
