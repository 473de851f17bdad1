//! Habit definition and per-day completion state.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Life area a habit or recommendation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Health,
    Mindfulness,
    Productivity,
    Fitness,
    Learning,
    Social,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Health,
        Category::Mindfulness,
        Category::Productivity,
        Category::Fitness,
        Category::Learning,
        Category::Social,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Mindfulness => "Mindfulness",
            Category::Productivity => "Productivity",
            Category::Fitness => "Fitness",
            Category::Learning => "Learning",
            Category::Social => "Social",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Health => "heart.fill",
            Category::Mindfulness => "brain.head.profile",
            Category::Productivity => "clock.fill",
            Category::Fitness => "figure.run",
            Category::Learning => "book.fill",
            Category::Social => "person.2.fill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HabitType {
    Build,
    Quit,
    Maintain,
}

/// Part of the day something is meant to happen in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeRange {
    Anytime,
    Morning,
    Afternoon,
    Evening,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Anytime,
        TimeRange::Morning,
        TimeRange::Afternoon,
        TimeRange::Evening,
    ];

    /// Bucket a local hour (0-23): 05-11 morning, 12-16 afternoon, otherwise evening.
    pub fn of_hour(hour: u32) -> TimeRange {
        match hour {
            5..=11 => TimeRange::Morning,
            12..=16 => TimeRange::Afternoon,
            _ => TimeRange::Evening,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Bar,
    Line,
}

/// Display colour, each channel in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub opacity: f64,
}

impl Rgba {
    pub const BLUE: Rgba = Rgba {
        red: 0.0,
        green: 0.478,
        blue: 1.0,
        opacity: 1.0,
    };
    pub const GREEN: Rgba = Rgba {
        red: 0.204,
        green: 0.78,
        blue: 0.349,
        opacity: 1.0,
    };
    pub const ORANGE: Rgba = Rgba {
        red: 1.0,
        green: 0.584,
        blue: 0.0,
        opacity: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// e.g. "Daily", "Day-Long"
    pub period: String,
    pub value: u32,
    pub unit: String,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            period: "Day-Long".to_string(),
            value: 0,
            unit: String::new(),
        }
    }
}

/// Reminder metadata. Scheduling the notifications is the UI's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub enabled: bool,
    pub times: Vec<NaiveTime>,
    pub ringtone: String,
    pub message: Option<String>,
}

impl Default for Reminder {
    fn default() -> Self {
        Self {
            enabled: false,
            times: Vec::new(),
            ringtone: "Default".to_string(),
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
    pub color: Rgba,
    pub category: Category,
    pub group: Option<String>,
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    pub goal: Goal,
    /// Weekday numbers, 1 = Sunday .. 7 = Saturday.
    pub task_days: BTreeSet<u8>,
    pub time_range: TimeRange,
    pub reminder: Reminder,
    pub show_memo_after_completion: bool,
    pub chart_type: ChartType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub completed_dates: BTreeSet<NaiveDate>,
    /// Local wall-clock time of each completion, keyed by completion day.
    #[serde(default)]
    pub completion_times: BTreeMap<NaiveDate, NaiveTime>,
}

impl Habit {
    /// A daily "build" habit in the health category, scheduled every weekday.
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            emoji: "✅".to_string(),
            color: Rgba::BLUE,
            category: Category::Health,
            group: None,
            habit_type: HabitType::Build,
            goal: Goal::default(),
            task_days: (1..=7).collect(),
            time_range: TimeRange::Anytime,
            reminder: Reminder::default(),
            show_memo_after_completion: false,
            chart_type: ChartType::Bar,
            start_date,
            end_date: None,
            completed_dates: BTreeSet::new(),
            completion_times: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_task_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.task_days = days.into_iter().collect();
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    pub fn with_goal(mut self, period: &str, value: u32, unit: &str) -> Self {
        self.goal = Goal {
            period: period.to_string(),
            value,
            unit: unit.to_string(),
        };
        self
    }

    /// Check the fields a UI form can get wrong.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if let Some(day) = self.task_days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(ValidationError::InvalidWeekday(*day));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ValidationError::InvalidValue {
                    field: "endDate".to_string(),
                    message: format!("{end} is before start date {}", self.start_date),
                });
            }
        }
        Ok(())
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    pub fn is_scheduled_on(&self, weekday: u8) -> bool {
        self.task_days.contains(&weekday)
    }

    /// Mark `day` done if it is not, otherwise clear it. Returns the new state.
    pub fn toggle_completion(&mut self, day: NaiveDate, time: NaiveTime) -> bool {
        if self.completed_dates.remove(&day) {
            self.completion_times.remove(&day);
            false
        } else {
            self.completed_dates.insert(day);
            self.completion_times.insert(day, time);
            true
        }
    }

    pub fn first_completion(&self) -> Option<NaiveDate> {
        self.completed_dates.iter().next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn new_habit_has_no_completions() {
        let habit = Habit::new("Walk", day(1));
        assert!(habit.completed_dates.is_empty());
        assert!(!habit.is_completed_on(day(1)));
        assert_eq!(habit.task_days.len(), 7);
    }

    #[test]
    fn toggle_completion_inserts_then_removes() {
        let mut habit = Habit::new("Walk", day(1));
        assert!(habit.toggle_completion(day(3), noon()));
        assert!(habit.is_completed_on(day(3)));
        assert_eq!(habit.completion_times.get(&day(3)), Some(&noon()));

        assert!(!habit.toggle_completion(day(3), noon()));
        assert!(!habit.is_completed_on(day(3)));
        assert!(habit.completion_times.is_empty());
    }

    #[test]
    fn validate_rejects_blank_name_and_bad_weekday() {
        let habit = Habit::new("  ", day(1));
        assert!(matches!(habit.validate(), Err(ValidationError::EmptyField("name"))));

        let habit = Habit::new("Read", day(1)).with_task_days([0, 3]);
        assert!(matches!(habit.validate(), Err(ValidationError::InvalidWeekday(0))));

        let habit = Habit::new("Read", day(1)).with_task_days([1, 7]);
        assert!(habit.validate().is_ok());
    }

    #[test]
    fn validate_rejects_end_before_start() {
        let mut habit = Habit::new("Read", day(10));
        habit.end_date = Some(day(2));
        assert!(habit.validate().is_err());
    }

    #[test]
    fn serde_round_trip_keeps_sets() {
        let mut habit = Habit::new("Stretch", day(1))
            .with_category(Category::Fitness)
            .with_task_days([2, 4, 6])
            .with_goal("Daily", 15, "minutes");
        habit.toggle_completion(day(2), noon());
        habit.toggle_completion(day(4), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        habit.reminder.times.push(NaiveTime::from_hms_opt(8, 0, 0).unwrap());

        let json = serde_json::to_string(&habit).unwrap();
        assert!(json.contains("\"type\":\"build\""));
        assert!(json.contains("\"taskDays\":[2,4,6]"));
        let back: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, habit);
    }

    #[test]
    fn time_range_of_hour_buckets() {
        assert_eq!(TimeRange::of_hour(6), TimeRange::Morning);
        assert_eq!(TimeRange::of_hour(13), TimeRange::Afternoon);
        assert_eq!(TimeRange::of_hour(22), TimeRange::Evening);
        assert_eq!(TimeRange::of_hour(2), TimeRange::Evening);
    }
}
