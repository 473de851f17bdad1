//! Habit collection and daily completion state.
//!
//! The engine owns the habit list and the derived "today's habits" view.
//! Completing a habit yields a [`Completion`] which the gamification engine
//! turns into streaks, experience and achievements.

mod report;

pub use report::{longest_streak, CompletionSummary, HabitCompletionData, HabitCompletionRate};

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use uuid::Uuid;

use crate::clock::DayClock;
use crate::model::{Category, Habit, Rgba, TimeRange};

/// A habit newly completed for a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub habit_id: Uuid,
    pub habit_name: String,
    pub category: Category,
    pub day: NaiveDate,
    pub at: DateTime<Utc>,
}

pub struct HabitEngine {
    habits: Vec<Habit>,
    todays: Vec<Uuid>,
    clock: DayClock,
}

impl HabitEngine {
    pub fn new(clock: DayClock) -> Self {
        Self {
            habits: Vec::new(),
            todays: Vec::new(),
            clock,
        }
    }

    pub fn with_habits(habits: Vec<Habit>, clock: DayClock, now: DateTime<Utc>) -> Self {
        let mut engine = Self {
            habits,
            todays: Vec::new(),
            clock,
        };
        engine.refresh_today(now);
        engine
    }

    pub fn clock(&self) -> DayClock {
        self.clock
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == *id)
    }

    pub fn add_habit(&mut self, habit: Habit, now: DateTime<Utc>) {
        self.habits.push(habit);
        self.refresh_today(now);
    }

    /// Complete `id` for the current day.
    ///
    /// Returns `None` when the habit does not exist or is already completed
    /// today; completing twice on the same day is a no-op.
    pub fn toggle_habit(&mut self, id: &Uuid, now: DateTime<Utc>) -> Option<Completion> {
        let today = self.clock.day_of(now);
        let time = self.clock.time_of(now);
        let habit = self.habits.iter_mut().find(|h| h.id == *id)?;
        if habit.is_completed_on(today) {
            tracing::debug!(habit = %habit.name, %today, "already completed today");
            return None;
        }
        habit.toggle_completion(today, time);
        Some(Completion {
            habit_id: habit.id,
            habit_name: habit.name.clone(),
            category: habit.category,
            day: today,
            at: now,
        })
    }

    /// Remove a habit. Streaks and experience already earned are kept.
    pub fn delete_habit(&mut self, id: &Uuid, now: DateTime<Utc>) -> Option<Habit> {
        let pos = self.habits.iter().position(|h| h.id == *id)?;
        let removed = self.habits.remove(pos);
        self.refresh_today(now);
        Some(removed)
    }

    /// Recompute the habits scheduled on the weekday of `now`.
    pub fn refresh_today(&mut self, now: DateTime<Utc>) {
        let weekday = self.clock.weekday_of(now);
        self.todays = self
            .habits
            .iter()
            .filter(|h| h.is_scheduled_on(weekday))
            .map(|h| h.id)
            .collect();
        tracing::debug!(weekday, count = self.todays.len(), "today's habits recomputed");
    }

    pub fn todays_habits(&self) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|h| self.todays.contains(&h.id))
            .collect()
    }

    pub fn is_completed_today(&self, id: &Uuid, now: DateTime<Utc>) -> bool {
        let today = self.clock.day_of(now);
        self.get(id).is_some_and(|h| h.is_completed_on(today))
    }

    /// Number of habits completed on the day of `now`.
    pub fn completed_today(&self, now: DateTime<Utc>) -> usize {
        let today = self.clock.day_of(now);
        self.habits.iter().filter(|h| h.is_completed_on(today)).count()
    }

    /// Distinct days with a completion logged during `part` of the day.
    pub fn completion_days_in(&self, part: TimeRange) -> usize {
        self.habits
            .iter()
            .flat_map(|h| h.completion_times.iter())
            .filter(|(_, time)| TimeRange::of_hour(time.hour()) == part)
            .map(|(day, _)| *day)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Starter habits offered on an empty list.
pub fn sample_habits(start_date: NaiveDate) -> Vec<Habit> {
    let at = |h: u32| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);

    let mut meditation = Habit::new("Morning Meditation", start_date)
        .with_emoji("🧘")
        .with_category(Category::Mindfulness)
        .with_time_range(TimeRange::Morning)
        .with_goal("Daily", 1, "session");
    meditation.reminder.enabled = true;
    meditation.reminder.times = vec![at(8)];

    let mut walk = Habit::new("Evening Walk", start_date)
        .with_emoji("🚶")
        .with_category(Category::Fitness)
        .with_time_range(TimeRange::Evening)
        .with_goal("Daily", 30, "minutes");
    walk.color = Rgba::GREEN;
    walk.reminder.enabled = true;
    walk.reminder.times = vec![at(18)];

    let mut reading = Habit::new("Read a Book", start_date)
        .with_emoji("📚")
        .with_category(Category::Learning)
        .with_time_range(TimeRange::Evening)
        .with_goal("Daily", 20, "pages");
    reading.color = Rgba::ORANGE;
    reading.reminder.enabled = true;
    reading.reminder.times = vec![at(21)];

    vec![meditation, walk, reading]
}
