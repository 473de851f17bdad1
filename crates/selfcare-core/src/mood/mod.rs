//! Mood log and the statistics derived from it.

mod patterns;

pub use patterns::{weekday_name, MoodPatterns};

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{DayClock, ReportRange};
use crate::events::{Event, Outbox};
use crate::model::{EnergyLevel, Mood, MoodActivity, MoodEntry};

const CONSISTENCY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightKind {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodInsight {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: InsightKind,
}

impl MoodInsight {
    fn new(title: impl Into<String>, description: impl Into<String>, kind: InsightKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            kind,
        }
    }
}

/// Figures shown on the mood analysis screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub entries: usize,
    pub average_mood: f64,
    pub best_mood_day: Option<DateTime<Utc>>,
    pub most_common_mood: Mood,
    pub tracking_consistency: u32,
    pub current_run: u32,
    pub patterns: MoodPatterns,
    pub insights: Vec<MoodInsight>,
}

pub struct MoodEngine {
    entries: Vec<MoodEntry>,
    patterns: MoodPatterns,
    clock: DayClock,
}

impl MoodEngine {
    pub fn new(entries: Vec<MoodEntry>, clock: DayClock) -> Self {
        let patterns = MoodPatterns::analyze(&entries, &clock);
        Self {
            entries,
            patterns,
            clock,
        }
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn patterns(&self) -> &MoodPatterns {
        &self.patterns
    }

    pub fn latest(&self) -> Option<&MoodEntry> {
        self.entries.last()
    }

    /// Append an entry stamped `now` and recompute the patterns.
    pub fn add_mood_entry(
        &mut self,
        mood: Mood,
        energy: EnergyLevel,
        activities: BTreeSet<MoodActivity>,
        notes: impl Into<String>,
        now: DateTime<Utc>,
        out: &mut Outbox,
    ) -> &MoodEntry {
        let entry = MoodEntry::new(mood, energy, activities, notes, now);
        out.push(Event::MoodLogged {
            entry_id: entry.id,
            mood,
            at: now,
        });
        self.entries.push(entry);
        self.patterns = MoodPatterns::analyze(&self.entries, &self.clock);
        tracing::debug!(entries = self.entries.len(), "mood patterns recomputed");
        &self.entries[self.entries.len() - 1]
    }

    /// Entries with a timestamp at or after `now` minus the range.
    pub fn entries_in(&self, range: ReportRange, now: DateTime<Utc>) -> Vec<&MoodEntry> {
        let cutoff = self.clock.range_cutoff(range, now);
        self.entries.iter().filter(|e| e.timestamp >= cutoff).collect()
    }

    pub fn daily_averages(&self) -> &BTreeMap<u8, f64> {
        &self.patterns.daily_averages
    }

    pub fn common_activities(&self) -> &BTreeMap<MoodActivity, usize> {
        &self.patterns.common_activities
    }

    /// Mean valence over all entries; 0 when empty.
    pub fn average_mood(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: i64 = self.entries.iter().map(|e| i64::from(e.mood.valence())).sum();
        sum as f64 / self.entries.len() as f64
    }

    /// Timestamp of the highest-valence entry; the earliest logged wins ties.
    pub fn best_mood_day(&self) -> Option<DateTime<Utc>> {
        let mut best: Option<&MoodEntry> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.mood.valence() > b.mood.valence()) {
                best = Some(entry);
            }
        }
        best.map(|e| e.timestamp)
    }

    /// Mode of the logged moods, ties by declaration order; neutral when empty.
    pub fn most_common_mood(&self) -> Mood {
        let mut counts: BTreeMap<Mood, usize> = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.mood).or_insert(0) += 1;
        }
        let mut top: Option<(Mood, usize)> = None;
        for (mood, count) in counts {
            if top.map_or(true, |(_, c)| count > c) {
                top = Some((mood, count));
            }
        }
        top.map_or(Mood::Neutral, |(mood, _)| mood)
    }

    /// Percentage of the last 7 days (today included) with an entry, truncated.
    pub fn tracking_consistency(&self, now: DateTime<Utc>) -> u32 {
        let today = self.clock.day_of(now);
        let first = today - Duration::days(CONSISTENCY_WINDOW_DAYS - 1);
        let days: BTreeSet<NaiveDate> = self
            .entries
            .iter()
            .map(|e| self.clock.day_of(e.timestamp))
            .filter(|d| *d >= first && *d <= today)
            .collect();
        (days.len() as f64 / CONSISTENCY_WINDOW_DAYS as f64 * 100.0) as u32
    }

    /// Consecutive days, ending today, with at least one entry.
    pub fn current_logging_run(&self, now: DateTime<Utc>) -> u32 {
        let days: BTreeSet<NaiveDate> = self
            .entries
            .iter()
            .map(|e| self.clock.day_of(e.timestamp))
            .collect();
        let mut day = self.clock.day_of(now);
        let mut run = 0;
        while days.contains(&day) {
            run += 1;
            day -= Duration::days(1);
        }
        run
    }

    pub fn summary(&self, now: DateTime<Utc>) -> MoodSummary {
        MoodSummary {
            entries: self.entries.len(),
            average_mood: self.average_mood(),
            best_mood_day: self.best_mood_day(),
            most_common_mood: self.most_common_mood(),
            tracking_consistency: self.tracking_consistency(now),
            current_run: self.current_logging_run(now),
            patterns: self.patterns.clone(),
            insights: self.insights(),
        }
    }

    pub fn insights(&self) -> Vec<MoodInsight> {
        let mut insights = Vec::new();
        let best = self.patterns.best_weekday();
        let worst = self.patterns.worst_weekday();

        if let Some((day, avg)) = best {
            insights.push(MoodInsight::new(
                "Best Day",
                format!("You tend to feel best on {} (average {avg:.1})", weekday_name(day)),
                InsightKind::Positive,
            ));
        }
        if let (Some((worst_day, avg)), Some((best_day, _))) = (worst, best) {
            if worst_day != best_day {
                insights.push(MoodInsight::new(
                    "Toughest Day",
                    format!("{} tends to be harder (average {avg:.1})", weekday_name(worst_day)),
                    InsightKind::Negative,
                ));
            }
        }
        if let Some((activity, count)) = self.patterns.top_activity() {
            insights.push(MoodInsight::new(
                "Most Frequent Activity",
                format!("{} appears in {count} of your entries", activity.label()),
                InsightKind::Neutral,
            ));
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 18, 0, 0).unwrap()
    }

    fn log(engine: &mut MoodEngine, mood: Mood, at: DateTime<Utc>) {
        let mut out = Outbox::default();
        engine.add_mood_entry(mood, EnergyLevel::Medium, BTreeSet::new(), "", at, &mut out);
    }

    fn engine() -> MoodEngine {
        MoodEngine::new(Vec::new(), DayClock::utc())
    }

    #[test]
    fn three_distinct_days_is_42_percent() {
        let mut engine = engine();
        log(&mut engine, Mood::Happy, now());
        log(&mut engine, Mood::Sad, now() - Duration::hours(2));
        log(&mut engine, Mood::Neutral, now() - Duration::days(2));
        log(&mut engine, Mood::Neutral, now() - Duration::days(5));
        log(&mut engine, Mood::Neutral, now() - Duration::days(9));
        assert_eq!(engine.tracking_consistency(now()), 42);
    }

    #[test]
    fn most_common_mood_breaks_ties_by_declaration_order() {
        let mut engine = engine();
        assert_eq!(engine.most_common_mood(), Mood::Neutral);
        log(&mut engine, Mood::Sad, now());
        log(&mut engine, Mood::Happy, now());
        log(&mut engine, Mood::Sad, now());
        log(&mut engine, Mood::Happy, now());
        assert_eq!(engine.most_common_mood(), Mood::Happy);
        log(&mut engine, Mood::Sad, now());
        assert_eq!(engine.most_common_mood(), Mood::Sad);
    }

    #[test]
    fn best_mood_day_is_first_maximum() {
        let mut engine = engine();
        assert!(engine.best_mood_day().is_none());
        let first = now() - Duration::days(3);
        log(&mut engine, Mood::Neutral, now() - Duration::days(4));
        log(&mut engine, Mood::Happy, first);
        log(&mut engine, Mood::Happy, now());
        assert_eq!(engine.best_mood_day(), Some(first));
    }

    #[test]
    fn average_mood_over_all_entries() {
        let mut engine = engine();
        assert_eq!(engine.average_mood(), 0.0);
        log(&mut engine, Mood::Happy, now());
        log(&mut engine, Mood::Anxious, now());
        assert_eq!(engine.average_mood(), 3.5);
    }

    #[test]
    fn entries_in_uses_inclusive_cutoff() {
        let mut engine = engine();
        let cutoff = now() - Duration::days(7);
        log(&mut engine, Mood::Happy, cutoff);
        log(&mut engine, Mood::Happy, cutoff - Duration::seconds(1));
        log(&mut engine, Mood::Happy, now() - Duration::days(20));
        assert_eq!(engine.entries_in(ReportRange::Week, now()).len(), 1);
        assert_eq!(engine.entries_in(ReportRange::Month, now()).len(), 3);
    }

    #[test]
    fn add_recomputes_patterns_and_emits_event() {
        let mut engine = engine();
        let mut out = Outbox::default();
        let activities = [MoodActivity::Reading].into_iter().collect();
        let id = engine
            .add_mood_entry(Mood::Happy, EnergyLevel::High, activities, "good book", now(), &mut out)
            .id;
        assert_eq!(engine.common_activities()[&MoodActivity::Reading], 1);
        assert_eq!(engine.daily_averages().len(), 1);
        assert!(matches!(
            out.pending(),
            [Event::MoodLogged { entry_id, mood: Mood::Happy, .. }] if *entry_id == id
        ));
    }

    #[test]
    fn logging_run_counts_back_from_today() {
        let mut engine = engine();
        assert_eq!(engine.current_logging_run(now()), 0);
        for back in [0, 1, 2, 4] {
            log(&mut engine, Mood::Neutral, now() - Duration::days(back));
        }
        assert_eq!(engine.current_logging_run(now()), 3);
    }

    #[test]
    fn insights_describe_patterns() {
        let mut engine = engine();
        assert!(engine.insights().is_empty());
        log(&mut engine, Mood::Happy, now());
        log(&mut engine, Mood::Sad, now() - Duration::days(1));
        let kinds: Vec<_> = engine.insights().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![InsightKind::Positive, InsightKind::Negative]);
    }
}
