//! Krampus - Entry Point
//!
//! Kommandoradsgränssnitt för julklappslistan.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use krampus::db::{Database, KvRepository};
use krampus::i18n::Localizer;
use krampus::models::{
    AppConfig, AppSettings, Currency, Language, Person, PersonDraft, PurchaseStatus,
};
use krampus::services::{
    sorted_for_display, Clock, DashboardStats, FixedClock, GiftService, LocalNotifier,
    ScheduleOutcome, SystemClock,
};
use krampus::utils::currency::{format_currency, parse_amount};
use krampus::utils::date::{format_datetime, parse_datetime};
use krampus::utils::path::display_path;
use krampus::AppError;

type Service = GiftService<KvRepository, LocalNotifier, Box<dyn Clock>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CurrencyArg {
    Usd,
    Eur,
    Huf,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Usd => Currency::Usd,
            CurrencyArg::Eur => Currency::Eur,
            CurrencyArg::Huf => Currency::Huf,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LanguageArg {
    En,
    De,
    Hu,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::De => Language::De,
            LanguageArg::Hu => Language::Hu,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "krampus", version, about = "Christmas present list with budget and reminders")]
struct Cli {
    /// Overrides the database path for this invocation.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Reads configuration from this file instead of the platform config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides "now" (YYYY-MM-DDTHH:MM[:SS]) for deterministic scheduling.
    #[arg(long, global = true)]
    now: Option<String>,

    #[arg(long, global = true, value_enum, default_value = "table")]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Progress, budget status and the list (unbought first).
    Dashboard,
    #[command(subcommand)]
    People(PeopleCommand),
    /// Marks a present as bought.
    Buy(BuyArgs),
    /// Marks a present as not bought and clears its price.
    Unbuy(IdArgs),
    /// Changes the actual price of a bought present.
    Price(PriceArgs),
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Reminders(RemindersCommand),
}

#[derive(Subcommand, Debug)]
enum PeopleCommand {
    List,
    Add(AddArgs),
    Edit(EditArgs),
    Delete(IdArgs),
}

#[derive(Args, Debug)]
struct AddArgs {
    name: String,

    /// Present category, e.g. "book"
    #[arg(long = "type")]
    present_type: String,

    /// Specific present (optional)
    #[arg(long)]
    present: Option<String>,

    /// Price limit, defaults to the default price limit in settings
    #[arg(long)]
    limit: Option<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long = "type")]
    present_type: Option<String>,

    #[arg(long)]
    present: Option<String>,

    #[arg(long)]
    limit: Option<String>,
}

#[derive(Args, Debug)]
struct IdArgs {
    id: String,
}

#[derive(Args, Debug)]
struct BuyArgs {
    id: String,

    /// Actual price; blank or unparseable counts as 0
    #[arg(long, default_value = "")]
    price: String,
}

#[derive(Args, Debug)]
struct PriceArgs {
    id: String,
    price: String,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    /// Global budget (blank = no limit) and default price limit (blank = 50).
    Budget(BudgetArgs),
    Notifications {
        #[arg(value_enum)]
        state: Toggle,
    },
    Currency {
        #[arg(value_enum)]
        currency: CurrencyArg,
    },
    Language {
        #[arg(value_enum)]
        language: LanguageArg,
    },
}

#[derive(Args, Debug)]
struct BudgetArgs {
    #[arg(long, default_value = "")]
    global: String,

    #[arg(long = "default", default_value = "")]
    default_price: String,
}

#[derive(Subcommand, Debug)]
enum RemindersCommand {
    /// Reminders currently held by the local notification host.
    List,
    /// Rebuilds reminders from the stored list and settings.
    Refresh,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initiera logging (stderr, stdout är reserverad för utdata)
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Startar Krampus v{}", env!("CARGO_PKG_VERSION"));

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    tracing::info!("Öppnar databas: {}", display_path(&db_path));

    let db = Database::open(&db_path)
        .with_context(|| format!("Kunde inte öppna databas {}", display_path(&db_path)))?;
    db.migrate().context("Migrering misslyckades")?;

    let clock: Box<dyn Clock> = match cli.now.as_deref() {
        Some(s) => Box::new(FixedClock(
            parse_datetime(s).ok_or_else(|| anyhow!("invalid --now value: {}", s))?,
        )),
        None => Box::new(SystemClock),
    };

    let notifier = LocalNotifier::new(db.notifications(), config.notification_permission);
    let mut service: Service = GiftService::new(db.kv(), notifier, clock);
    service.startup();

    let format = cli.format;
    match cli.command {
        Command::Dashboard => dashboard(&mut service, format),
        Command::People(cmd) => people(&mut service, cmd, format),
        Command::Buy(args) => {
            let result = service.mark_bought(&args.id, &args.price);
            let applied = localized(&service, result)?;
            print_person_change(&mut service, format, &applied.value, applied.reminders)
        }
        Command::Unbuy(args) => {
            let result = service.unmark_bought(&args.id);
            let applied = localized(&service, result)?;
            print_person_change(&mut service, format, &applied.value, applied.reminders)
        }
        Command::Price(args) => {
            let result = service.edit_actual_price(&args.id, &args.price);
            let applied = localized(&service, result)?;
            print_person_change(&mut service, format, &applied.value, applied.reminders)
        }
        Command::Settings(cmd) => settings(&mut service, cmd, format),
        Command::Reminders(cmd) => reminders(&service, cmd, format),
    }
}

/// Översätt valideringsfel till aktivt språk
fn localized<T>(service: &Service, result: Result<T, AppError>) -> Result<T> {
    result.map_err(|e| {
        let t = service.localizer();
        match &e {
            AppError::InvalidPerson(v) => anyhow!(t.translate(v.translation_key()).to_string()),
            AppError::InvalidSettings(v) => anyhow!(t.translate(v.translation_key()).to_string()),
            AppError::InvalidTransition(v) => {
                anyhow!(t.translate(v.translation_key()).to_string())
            }
            AppError::NotFound(_) => anyhow!("{}", t.translate("people.notFound")),
            _ => anyhow::Error::new(e),
        }
    })
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn dashboard(service: &mut Service, format: Format) -> Result<()> {
    let settings = service.settings();
    let people = service.people();
    let stats = DashboardStats::calculate(&people, &settings);
    let sorted = sorted_for_display(&people);

    if format == Format::Json {
        #[derive(Serialize)]
        struct DashboardJson<'a> {
            stats: &'a DashboardStats,
            people: &'a [&'a Person],
        }
        return emit_json(&DashboardJson {
            stats: &stats,
            people: &sorted,
        });
    }

    let t = service.localizer();
    println!("{}", t.translate("main.dashboard"));
    println!(
        "{}/{} {} - {}%",
        stats.progress.bought,
        stats.progress.total,
        t.translate("main.presentsBought"),
        stats.progress.percent
    );
    println!(
        "{} {}",
        t.translate("main.totalSpent"),
        format_currency(stats.total_spent, settings.currency)
    );

    if settings.has_budget_limit() {
        let marker = if stats.is_over_budget {
            format!("  {}", t.translate("main.overBudget"))
        } else {
            String::new()
        };
        println!(
            "{} {} / {}{}",
            t.translate("main.budgetStatus"),
            format_currency(stats.total_spent, settings.currency),
            format_currency(stats.global_limit, settings.currency),
            marker
        );
    }

    println!();
    if sorted.is_empty() {
        println!("{}", t.translate("main.emptyMessage"));
    }
    for person in sorted {
        println!("{}", dashboard_line(t, person, &settings));
    }

    Ok(())
}

fn dashboard_line(t: &Localizer, person: &Person, settings: &AppSettings) -> String {
    let check = if person.is_bought { "[x]" } else { "[ ]" };
    let label = if person.present_name.is_empty() {
        t.translate("main.category")
    } else {
        t.translate("main.present")
    };
    let present = format!("{} {}", label, person.present_display());

    let mut line = format!(
        "{} {} - {} | {} {}",
        check,
        person.name,
        present,
        t.translate("main.priceLimit"),
        format_currency(person.price_limit, settings.currency)
    );

    if let Some(price) = person.actual_price {
        line.push_str(&format!(
            " | {} {}",
            t.translate("main.actualPrice"),
            format_currency(price, settings.currency)
        ));
    }

    line
}

fn person_line(t: &Localizer, person: &Person, currency: Currency) -> String {
    let status = match person.status() {
        PurchaseStatus::Bought => t.translate("main.bought"),
        PurchaseStatus::Unbought => t.translate("main.notBought"),
    };

    let mut line = format!(
        "{}  {}  {} {} | {} {} | {}",
        person.id,
        person.name,
        t.translate("people.type"),
        person.present_type,
        t.translate("people.limit"),
        format_currency(person.price_limit, currency),
        status
    );

    if !person.present_name.is_empty() {
        line.push_str(&format!(" | {} {}", t.translate("people.present"), person.present_name));
    }

    line
}

fn people(service: &mut Service, cmd: PeopleCommand, format: Format) -> Result<()> {
    match cmd {
        PeopleCommand::List => {
            let settings = service.settings();
            let people = service.people();

            if format == Format::Json {
                return emit_json(&people);
            }

            let t = service.localizer();
            if people.is_empty() {
                println!("{}", t.translate("people.emptyMessage"));
            }
            for person in &people {
                println!("{}", person_line(t, person, settings.currency));
            }
            Ok(())
        }
        PeopleCommand::Add(args) => {
            let settings = service.settings();
            let price_limit = match args.limit.as_deref() {
                Some(input) => parse_amount(input).unwrap_or(0.0),
                None => settings.default_price_limit,
            };

            let mut draft = PersonDraft::new(args.name, args.present_type, price_limit);
            if let Some(present) = args.present {
                draft = draft.with_present_name(present);
            }

            let result = service.add_person(&draft);
            let applied = localized(service, result)?;
            print_person_change(service, format, &applied.value, applied.reminders)
        }
        PeopleCommand::Edit(args) => {
            let people = service.people();
            let current = people
                .iter()
                .find(|p| p.id == args.id)
                .ok_or_else(|| anyhow!("{}", service.localizer().translate("people.notFound")))?;

            let price_limit = match args.limit.as_deref() {
                Some(input) => parse_amount(input).unwrap_or(0.0),
                None => current.price_limit,
            };
            let draft = PersonDraft::new(
                args.name.unwrap_or_else(|| current.name.clone()),
                args.present_type
                    .unwrap_or_else(|| current.present_type.clone()),
                price_limit,
            )
            .with_present_name(args.present.unwrap_or_else(|| current.present_name.clone()));

            let result = service.edit_person(&args.id, &draft);
            let applied = localized(service, result)?;
            print_person_change(service, format, &applied.value, applied.reminders)
        }
        PeopleCommand::Delete(args) => {
            let result = service.delete_person(&args.id);
            let applied = localized(service, result)?;

            if format == Format::Json {
                return emit_json(&applied);
            }

            let t = service.localizer();
            println!("{}: {}", t.translate("people.deleted"), applied.value.name);
            print_outcome(t, applied.reminders);
            Ok(())
        }
    }
}

fn print_person_change(
    service: &mut Service,
    format: Format,
    person: &Person,
    reminders: ScheduleOutcome,
) -> Result<()> {
    if format == Format::Json {
        #[derive(Serialize)]
        struct ChangeJson<'a> {
            person: &'a Person,
            reminders: ScheduleOutcome,
        }
        return emit_json(&ChangeJson { person, reminders });
    }

    let currency = service.settings().currency;
    let t = service.localizer();
    println!("{}", person_line(t, person, currency));
    print_outcome(t, reminders);
    Ok(())
}

fn print_outcome(t: &Localizer, outcome: ScheduleOutcome) {
    match outcome {
        ScheduleOutcome::Scheduled(count) => {
            println!("{} {}", t.translate("notifications.scheduled"), count)
        }
        ScheduleOutcome::Cancelled => println!("{}", t.translate("notifications.cancelled")),
        ScheduleOutcome::PermissionDenied => {
            println!("{}", t.translate("notifications.permissionDenied"))
        }
        ScheduleOutcome::Failed => println!("{}", t.translate("notifications.failed")),
    }
}

fn settings(service: &mut Service, cmd: SettingsCommand, format: Format) -> Result<()> {
    let result = match cmd {
        SettingsCommand::Show => {
            let settings = service.settings();
            if format == Format::Json {
                return emit_json(&settings);
            }
            print_settings(service.localizer(), &settings);
            return Ok(());
        }
        SettingsCommand::Budget(args) => service.save_budget(&args.global, &args.default_price),
        SettingsCommand::Notifications { state } => service.set_notifications(state == Toggle::On),
        SettingsCommand::Currency { currency } => service.set_currency(currency.into()),
        SettingsCommand::Language { language } => service.set_language(language.into()),
    };

    let applied = localized(service, result)?;

    if format == Format::Json {
        return emit_json(&applied);
    }

    // Språket kan just ha bytts, så översätt efter sparningen
    let t = service.localizer();
    println!("{}", t.translate("settings.saveSuccess"));
    print_settings(t, &applied.value);
    print_outcome(t, applied.reminders);
    Ok(())
}

fn print_settings(t: &Localizer, settings: &AppSettings) {
    let budget = if settings.has_budget_limit() {
        format_currency(settings.global_budget_limit, settings.currency)
    } else {
        t.translate("settings.noLimit").to_string()
    };
    let notifications = if settings.notifications_enabled {
        t.translate("settings.enabled")
    } else {
        t.translate("settings.disabled")
    };

    println!("{}: {}", t.translate("settings.globalBudgetLimit"), budget);
    println!(
        "{}: {}",
        t.translate("settings.defaultPriceLimit"),
        format_currency(settings.default_price_limit, settings.currency)
    );
    println!("{}: {}", t.translate("settings.notifications"), notifications);
    println!("{}: {}", t.translate("settings.currency"), settings.currency);
    println!(
        "{}: {}",
        t.translate("settings.language"),
        settings.language.native_name()
    );
}

fn reminders(service: &Service, cmd: RemindersCommand, format: Format) -> Result<()> {
    match cmd {
        RemindersCommand::List => {
            let pending = service.host().pending(service.clock().now())?;

            if format == Format::Json {
                return emit_json(&pending);
            }

            let t = service.localizer();
            if pending.is_empty() {
                println!("{}", t.translate("notifications.empty"));
            }
            for reminder in &pending {
                println!(
                    "{}  {}: {}",
                    format_datetime(reminder.trigger_at),
                    reminder.payload.title,
                    reminder.payload.body
                );
            }
            Ok(())
        }
        RemindersCommand::Refresh => {
            let outcome = service.scheduler().update_all();

            if format == Format::Json {
                return emit_json(&outcome);
            }

            print_outcome(service.localizer(), outcome);
            Ok(())
        }
    }
}
