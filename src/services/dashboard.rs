//! Statistik för översikten: köpframsteg och budget

use serde::Serialize;

use crate::models::{AppSettings, Person};

/// Andel köpta presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub bought: usize,
    pub total: usize,
    /// Avrundad procent, 0 när listan är tom
    pub percent: u32,
}

impl Progress {
    pub fn from_people(people: &[Person]) -> Self {
        let total = people.len();
        let bought = people.iter().filter(|p| p.is_bought).count();

        let percent = if total == 0 {
            0
        } else {
            (100.0 * bought as f64 / total as f64).round() as u32
        };

        Self {
            bought,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub progress: Progress,
    pub total_spent: f64,
    /// 0 = ingen budget satt
    pub global_limit: f64,
    pub is_over_budget: bool,
}

impl DashboardStats {
    pub fn calculate(people: &[Person], settings: &AppSettings) -> Self {
        let total_spent: f64 = people
            .iter()
            .filter(|p| p.is_bought)
            .filter_map(|p| p.actual_price)
            .sum();

        let global_limit = settings.global_budget_limit;
        let is_over_budget = global_limit > 0.0 && total_spent > global_limit;

        Self {
            progress: Progress::from_people(people),
            total_spent,
            global_limit,
            is_over_budget,
        }
    }
}

/// Visningsordning: ej köpta först, annars oförändrad ordning
pub fn sorted_for_display(people: &[Person]) -> Vec<&Person> {
    let mut sorted: Vec<&Person> = people.iter().collect();
    sorted.sort_by_key(|p| p.is_bought);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonDraft;

    fn person(name: &str, price: Option<f64>) -> Person {
        let mut p = Person::create(&PersonDraft::new(name, "Bok", 20.0)).unwrap();
        if let Some(price) = price {
            p.check(price).unwrap();
        }
        p
    }

    #[test]
    fn test_progress_empty_list() {
        let progress = Progress::from_people(&[]);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.bought, 0);
        assert_eq!(progress.percent, 0);
    }

    #[test]
    fn test_progress_rounding() {
        let people = vec![person("A", Some(1.0)), person("B", None), person("C", None)];
        assert_eq!(Progress::from_people(&people).percent, 33);

        let people = vec![person("A", Some(1.0)), person("B", Some(1.0)), person("C", None)];
        assert_eq!(Progress::from_people(&people).percent, 67);

        let people = vec![person("A", Some(1.0)), person("B", None)];
        assert_eq!(Progress::from_people(&people).percent, 50);
    }

    #[test]
    fn test_budget_status() {
        let people = vec![person("A", Some(60.0)), person("B", Some(50.0)), person("C", None)];

        let mut settings = AppSettings::default();
        let stats = DashboardStats::calculate(&people, &settings);
        assert_eq!(stats.total_spent, 110.0);
        assert!(!stats.is_over_budget);

        settings.global_budget_limit = 100.0;
        let stats = DashboardStats::calculate(&people, &settings);
        assert!(stats.is_over_budget);

        settings.global_budget_limit = 110.0;
        let stats = DashboardStats::calculate(&people, &settings);
        assert!(!stats.is_over_budget);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let people = vec![person("A", Some(20.0))];
        let settings = AppSettings {
            global_budget_limit: 10.0,
            ..Default::default()
        };

        let json = serde_json::to_value(DashboardStats::calculate(&people, &settings)).unwrap();
        assert_eq!(json["totalSpent"], 20.0);
        assert_eq!(json["globalLimit"], 10.0);
        assert_eq!(json["isOverBudget"], true);
        assert_eq!(json["progress"]["percent"], 100);
    }

    #[test]
    fn test_sorted_for_display_unbought_first_stable() {
        let people = vec![
            person("A", Some(1.0)),
            person("B", None),
            person("C", Some(1.0)),
            person("D", None),
        ];
        let names: Vec<&str> = sorted_for_display(&people)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }
}
