//! Completion analytics over the habit collection.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HabitEngine;
use crate::clock::ReportRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletionRate {
    pub habit_id: Uuid,
    pub habit_name: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCompletionData {
    pub habit_id: Uuid,
    pub habit_name: String,
    pub completed_dates: BTreeSet<NaiveDate>,
}

/// Figures shown on the reports screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub rates: Vec<HabitCompletionRate>,
    pub overall_completion_rate: u32,
    pub longest_streak: u32,
    pub most_consistent_habit: Option<String>,
}

impl HabitEngine {
    /// completions / max(days since first completion, 1); 0 with no completions.
    pub fn completion_rates(&self, now: DateTime<Utc>) -> Vec<HabitCompletionRate> {
        let today = self.clock.day_of(now);
        self.habits
            .iter()
            .map(|habit| {
                let rate = match habit.first_completion() {
                    Some(first) => {
                        let days = (today - first).num_days().max(1);
                        habit.completed_dates.len() as f64 / days as f64
                    }
                    None => 0.0,
                };
                HabitCompletionRate {
                    habit_id: habit.id,
                    habit_name: habit.name.clone(),
                    rate,
                }
            })
            .collect()
    }

    /// Mean of the per-habit rates as a truncated percentage.
    pub fn overall_completion_rate(&self, now: DateTime<Utc>) -> u32 {
        let rates = self.completion_rates(now);
        if rates.is_empty() {
            return 0;
        }
        let total: f64 = rates.iter().map(|r| r.rate).sum();
        ((total / rates.len() as f64) * 100.0) as u32
    }

    /// Highest completion rate; the earliest habit wins ties.
    pub fn most_consistent_habit(&self, now: DateTime<Utc>) -> Option<String> {
        let mut best: Option<HabitCompletionRate> = None;
        for rate in self.completion_rates(now) {
            if best.as_ref().map_or(true, |b| rate.rate > b.rate) {
                best = Some(rate);
            }
        }
        best.map(|b| b.habit_name)
    }

    /// Per habit, the completion days that fall inside `range`.
    pub fn completion_data(&self, range: ReportRange, now: DateTime<Utc>) -> Vec<HabitCompletionData> {
        let cutoff = self.clock.range_start(range, now);
        self.habits
            .iter()
            .map(|habit| HabitCompletionData {
                habit_id: habit.id,
                habit_name: habit.name.clone(),
                completed_dates: habit.completed_dates.range(cutoff..).copied().collect(),
            })
            .collect()
    }

    pub fn summary(&self, streaks: &BTreeMap<Uuid, u32>, now: DateTime<Utc>) -> CompletionSummary {
        CompletionSummary {
            rates: self.completion_rates(now),
            overall_completion_rate: self.overall_completion_rate(now),
            longest_streak: longest_streak(streaks),
            most_consistent_habit: self.most_consistent_habit(now),
        }
    }
}

/// Largest value in the streak map; habits never completed have no entry.
pub fn longest_streak(streaks: &BTreeMap<Uuid, u32>) -> u32 {
    streaks.values().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DayClock;
    use crate::model::Habit;
    use chrono::{Duration, NaiveTime, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
    }

    fn habit_with(name: &str, days_ago: &[i64]) -> Habit {
        let today = now().date_naive();
        let mut habit = Habit::new(name, today - Duration::days(60));
        for d in days_ago {
            habit.toggle_completion(today - Duration::days(*d), NaiveTime::MIN);
        }
        habit
    }

    fn engine_with(habits: Vec<Habit>) -> HabitEngine {
        HabitEngine::with_habits(habits, DayClock::utc(), now())
    }

    #[test]
    fn never_completed_habit_rates_zero() {
        let engine = engine_with(vec![habit_with("Idle", &[])]);
        let rates = engine.completion_rates(now());
        assert_eq!(rates[0].rate, 0.0);
        assert_eq!(engine.overall_completion_rate(now()), 0);
    }

    #[test]
    fn rate_divides_by_days_since_first_completion() {
        // First completion 10 days ago, 5 completions.
        let engine = engine_with(vec![habit_with("Walk", &[10, 8, 6, 4, 2])]);
        let rates = engine.completion_rates(now());
        assert!((rates[0].rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn same_day_first_completion_uses_one_day() {
        let engine = engine_with(vec![habit_with("Walk", &[0])]);
        assert_eq!(engine.completion_rates(now())[0].rate, 1.0);
    }

    #[test]
    fn overall_rate_is_mean_percentage_truncated() {
        let engine = engine_with(vec![
            habit_with("Half", &[10, 8, 6, 4, 2]),
            habit_with("None", &[]),
            habit_with("Third", &[3, 1]),
        ]);
        // (0.5 + 0 + 0.6667) / 3 = 0.3889
        assert_eq!(engine.overall_completion_rate(now()), 38);
    }

    #[test]
    fn most_consistent_prefers_first_on_tie() {
        let engine = engine_with(vec![
            habit_with("A", &[0]),
            habit_with("B", &[0]),
            habit_with("C", &[4, 2]),
        ]);
        assert_eq!(engine.most_consistent_habit(now()).as_deref(), Some("A"));
        assert_eq!(engine_with(vec![]).most_consistent_habit(now()), None);
    }

    #[test]
    fn completion_data_filters_by_range() {
        let engine = engine_with(vec![habit_with("Walk", &[1, 6, 7, 8, 20, 40])]);
        let week = engine.completion_data(ReportRange::Week, now());
        assert_eq!(week[0].completed_dates.len(), 3);
        let month = engine.completion_data(ReportRange::Month, now());
        assert_eq!(month[0].completed_dates.len(), 5);
        let year = engine.completion_data(ReportRange::Year, now());
        assert_eq!(year[0].completed_dates.len(), 6);
    }

    #[test]
    fn longest_streak_over_map() {
        let mut streaks = BTreeMap::new();
        assert_eq!(longest_streak(&streaks), 0);
        streaks.insert(Uuid::new_v4(), 3);
        streaks.insert(Uuid::new_v4(), 9);
        assert_eq!(longest_streak(&streaks), 9);
    }
}
