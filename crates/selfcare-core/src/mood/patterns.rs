use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clock::DayClock;
use crate::model::{MoodActivity, MoodEntry};

/// Aggregates recomputed from the full entry log after every add.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPatterns {
    /// Weekday number (Sunday=1) -> mean valence. Weekdays without entries are absent.
    pub daily_averages: BTreeMap<u8, f64>,
    pub common_activities: BTreeMap<MoodActivity, usize>,
}

impl MoodPatterns {
    pub fn analyze(entries: &[MoodEntry], clock: &DayClock) -> Self {
        let mut sums: BTreeMap<u8, (i64, usize)> = BTreeMap::new();
        let mut common_activities = BTreeMap::new();

        for entry in entries {
            let slot = sums.entry(clock.weekday_of(entry.timestamp)).or_insert((0, 0));
            slot.0 += i64::from(entry.mood.valence());
            slot.1 += 1;
            for activity in &entry.activities {
                *common_activities.entry(*activity).or_insert(0) += 1;
            }
        }

        let daily_averages = sums
            .into_iter()
            .map(|(day, (sum, n))| (day, sum as f64 / n as f64))
            .collect();

        Self {
            daily_averages,
            common_activities,
        }
    }

    /// Weekday with the highest mean; the lowest weekday number wins ties.
    pub fn best_weekday(&self) -> Option<(u8, f64)> {
        let mut best: Option<(u8, f64)> = None;
        for (&day, &avg) in &self.daily_averages {
            if best.map_or(true, |(_, b)| avg > b) {
                best = Some((day, avg));
            }
        }
        best
    }

    pub fn worst_weekday(&self) -> Option<(u8, f64)> {
        let mut worst: Option<(u8, f64)> = None;
        for (&day, &avg) in &self.daily_averages {
            if worst.map_or(true, |(_, w)| avg < w) {
                worst = Some((day, avg));
            }
        }
        worst
    }

    /// Most frequent activity tag; declaration order wins ties.
    pub fn top_activity(&self) -> Option<(MoodActivity, usize)> {
        let mut top: Option<(MoodActivity, usize)> = None;
        for (&activity, &count) in &self.common_activities {
            if top.map_or(true, |(_, c)| count > c) {
                top = Some((activity, count));
            }
        }
        top
    }
}

pub fn weekday_name(number: u8) -> &'static str {
    match number {
        1 => "Sunday",
        2 => "Monday",
        3 => "Tuesday",
        4 => "Wednesday",
        5 => "Thursday",
        6 => "Friday",
        7 => "Saturday",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnergyLevel, Mood};
    use chrono::{TimeZone, Utc};

    fn entry(mood: Mood, day: u32, activities: &[MoodActivity]) -> MoodEntry {
        MoodEntry::new(
            mood,
            EnergyLevel::Medium,
            activities.iter().copied().collect(),
            "",
            Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn averages_group_by_weekday() {
        // 2024-06-02 and 2024-06-09 are Sundays, 2024-06-03 a Monday.
        let entries = vec![
            entry(Mood::Happy, 2, &[]),
            entry(Mood::Sad, 9, &[]),
            entry(Mood::Neutral, 3, &[]),
        ];
        let patterns = MoodPatterns::analyze(&entries, &DayClock::utc());
        assert_eq!(patterns.daily_averages.get(&1), Some(&3.0));
        assert_eq!(patterns.daily_averages.get(&2), Some(&3.0));
        assert!(patterns.daily_averages.get(&3).is_none());
    }

    #[test]
    fn activities_are_tallied() {
        let entries = vec![
            entry(Mood::Happy, 2, &[MoodActivity::Exercise, MoodActivity::Social]),
            entry(Mood::Happy, 3, &[MoodActivity::Exercise]),
        ];
        let patterns = MoodPatterns::analyze(&entries, &DayClock::utc());
        assert_eq!(patterns.common_activities[&MoodActivity::Exercise], 2);
        assert_eq!(patterns.top_activity(), Some((MoodActivity::Exercise, 2)));
    }

    #[test]
    fn best_and_worst_weekday() {
        let entries = vec![
            entry(Mood::Happy, 4, &[]),
            entry(Mood::Angry, 5, &[]),
            entry(Mood::Neutral, 6, &[]),
        ];
        let patterns = MoodPatterns::analyze(&entries, &DayClock::utc());
        assert_eq!(patterns.best_weekday().map(|b| b.0), Some(3));
        assert_eq!(patterns.worst_weekday().map(|w| w.0), Some(4));
        assert_eq!(weekday_name(3), "Tuesday");
    }
}
