//! Mood-activity correlation and time-of-day optimisation.
//!
//! Works from three logs: attempted activities, sent notifications (both
//! owned here) and the mood entries, which are read as a snapshot of the
//! mood engine's log.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::DayClock;
use crate::model::{ContentType, Mood, MoodEntry, NotificationType, UserPreferences};

/// Engagement above which an attempt counts as successful.
const SUCCESS_ENGAGEMENT: f64 = 0.7;
const DAILY_NOTIFICATION_LIMIT: usize = 5;
const RECOMMEND_THRESHOLD: f64 = 0.5;
const MOOD_CHANGE_MAGNITUDE: i32 = 2;
const MOOD_CHECK_PRIORITY: f64 = 0.8;
const PREFERRED_CONTENT_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionStatus {
    Completed,
    Skipped,
    PartiallyCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityHistory {
    pub id: Uuid,
    pub activity_name: String,
    pub timestamp: DateTime<Utc>,
    pub duration_minutes: u32,
    pub engagement_score: f64,
    pub completion_status: CompletionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationHistory {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub timestamp: DateTime<Utc>,
    pub was_opened: bool,
    pub response_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodChange {
    pub timestamp: DateTime<Utc>,
    /// Signed valence difference, current minus previous.
    pub magnitude: i32,
    pub previous_mood: Mood,
    pub current_mood: Mood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecommendation {
    pub activity: String,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub activity: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub priority: f64,
}

pub struct PersonalizationEngine {
    preferences: UserPreferences,
    activity_history: Vec<ActivityHistory>,
    notification_history: Vec<NotificationHistory>,
    clock: DayClock,
}

/// Most frequent value; the smallest value wins ties.
fn most_common(values: impl IntoIterator<Item = u32>) -> Option<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut top: Option<(u32, usize)> = None;
    for (value, count) in counts {
        if top.map_or(true, |(_, c)| count > c) {
            top = Some((value, count));
        }
    }
    top.map(|(value, _)| value)
}

impl PersonalizationEngine {
    pub fn new(
        preferences: UserPreferences,
        activity_history: Vec<ActivityHistory>,
        notification_history: Vec<NotificationHistory>,
        clock: DayClock,
    ) -> Self {
        Self {
            preferences,
            activity_history,
            notification_history,
            clock,
        }
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut UserPreferences {
        &mut self.preferences
    }

    pub fn activity_history(&self) -> &[ActivityHistory] {
        &self.activity_history
    }

    pub fn notification_history(&self) -> &[NotificationHistory] {
        &self.notification_history
    }

    pub fn record_activity(
        &mut self,
        activity_name: impl Into<String>,
        duration_minutes: u32,
        engagement_score: f64,
        completion_status: CompletionStatus,
        now: DateTime<Utc>,
    ) -> &ActivityHistory {
        self.activity_history.push(ActivityHistory {
            id: Uuid::new_v4(),
            activity_name: activity_name.into(),
            timestamp: now,
            duration_minutes,
            engagement_score: engagement_score.clamp(0.0, 1.0),
            completion_status,
        });
        &self.activity_history[self.activity_history.len() - 1]
    }

    pub fn record_notification(
        &mut self,
        notification_type: NotificationType,
        was_opened: bool,
        response_seconds: Option<u32>,
        now: DateTime<Utc>,
    ) {
        self.notification_history.push(NotificationHistory {
            id: Uuid::new_v4(),
            notification_type,
            timestamp: now,
            was_opened,
            response_seconds,
        });
    }

    pub fn update_activity_engagement(&mut self, activity_name: &str, engagement: f64) {
        self.preferences
            .activity_engagement
            .insert(activity_name.to_string(), engagement.clamp(0.0, 1.0));
    }

    fn attempts<'a>(&'a self, activity: &'a str) -> impl Iterator<Item = &'a ActivityHistory> + 'a {
        self.activity_history
            .iter()
            .filter(move |a| a.activity_name == activity)
    }

    /// Local hour at which `activity` most often went well.
    pub fn optimal_hour_for_activity(&self, activity: &str) -> Option<u32> {
        most_common(
            self.attempts(activity)
                .filter(|a| a.engagement_score > SUCCESS_ENGAGEMENT)
                .map(|a| self.clock.hour_of(a.timestamp)),
        )
    }

    /// Local hour at which notifications of `kind` were most often opened.
    pub fn optimal_notification_hour(&self, kind: NotificationType) -> Option<u32> {
        most_common(
            self.notification_history
                .iter()
                .filter(|n| n.notification_type == kind && n.was_opened)
                .map(|n| self.clock.hour_of(n.timestamp)),
        )
    }

    fn recent_moods<'a>(&self, moods: &'a [MoodEntry], now: DateTime<Utc>) -> Vec<&'a MoodEntry> {
        let week_ago = now - Duration::days(7);
        let mut recent: Vec<&MoodEntry> = moods.iter().filter(|m| m.timestamp >= week_ago).collect();
        recent.sort_by_key(|m| m.timestamp);
        recent
    }

    /// Mean valence over the trailing week. Leaves the baseline untouched
    /// (and returns `None`) when nothing was logged in that window.
    pub fn update_mood_baseline(&mut self, moods: &[MoodEntry], now: DateTime<Utc>) -> Option<f64> {
        let recent = self.recent_moods(moods, now);
        if recent.is_empty() {
            return None;
        }
        let sum: i64 = recent.iter().map(|m| i64::from(m.mood.valence())).sum();
        let baseline = sum as f64 / recent.len() as f64;
        self.preferences.mood_baseline = baseline;
        Some(baseline)
    }

    /// Swings of at least two valence points between consecutive entries
    /// of the trailing week.
    pub fn detect_mood_changes(&self, moods: &[MoodEntry], now: DateTime<Utc>) -> Vec<MoodChange> {
        self.recent_moods(moods, now)
            .windows(2)
            .filter_map(|pair| {
                let (previous, current) = (pair[0], pair[1]);
                let magnitude = current.mood.valence() - previous.mood.valence();
                (magnitude.abs() >= MOOD_CHANGE_MAGNITUDE).then(|| MoodChange {
                    timestamp: current.timestamp,
                    magnitude,
                    previous_mood: previous.mood,
                    current_mood: current.mood,
                })
            })
            .collect()
    }

    /// False when notifications are off, `at` falls in quiet hours, or the
    /// daily limit was already reached on that day.
    pub fn should_send_notification(&self, at: DateTime<Utc>) -> bool {
        let prefs = &self.preferences.notifications;
        if !prefs.enabled || prefs.quiet_hours.contains(self.clock.hour_of(at)) {
            return false;
        }
        let sent = self
            .notification_history
            .iter()
            .filter(|n| self.clock.same_day(n.timestamp, at))
            .count();
        sent < DAILY_NOTIFICATION_LIMIT
    }

    fn success_rate(&self, activity: &str) -> f64 {
        let (total, good) = self.attempts(activity).fold((0usize, 0usize), |(t, g), a| {
            (t + 1, g + usize::from(a.engagement_score > SUCCESS_ENGAGEMENT))
        });
        if total == 0 {
            return 0.0;
        }
        good as f64 / total as f64
    }

    /// How much moods logged later on the same day as an attempt improved
    /// on `current`, normalised to `[0, 1]`. 0 without such entries.
    fn mood_match(&self, activity: &str, current: Mood, moods: &[MoodEntry]) -> f64 {
        let later: Vec<i32> = moods
            .iter()
            .filter(|entry| {
                self.attempts(activity).any(|a| {
                    self.clock.same_day(a.timestamp, entry.timestamp) && a.timestamp < entry.timestamp
                })
            })
            .map(|entry| entry.mood.valence() - current.valence())
            .collect();
        if later.is_empty() {
            return 0.0;
        }
        let mean = later.iter().sum::<i32>() as f64 / later.len() as f64;
        (mean + 4.0) / 8.0
    }

    fn reason(success_rate: f64, time_match: bool, mood_match: f64) -> String {
        let mut reasons = Vec::new();
        if success_rate > 0.7 {
            reasons.push("You've had great success with this activity");
        } else if success_rate > 0.4 {
            reasons.push("You've had moderate success with this activity");
        }
        if time_match {
            reasons.push("This is your optimal time for this activity");
        }
        if mood_match > 0.7 {
            reasons.push("This activity has improved your mood in the past");
        }
        reasons.join(", ")
    }

    /// Score every activity seen so far and keep the promising ones.
    ///
    /// `score = 0.4 * success + 0.3 * time match + 0.3 * mood match`
    pub fn activity_recommendations(
        &self,
        moods: &[MoodEntry],
        now: DateTime<Utc>,
    ) -> Vec<ActivityRecommendation> {
        let current = self
            .recent_moods(moods, now)
            .last()
            .map_or(Mood::Neutral, |m| m.mood);
        let hour = self.clock.hour_of(now);

        let mut names: Vec<&str> = Vec::new();
        for attempt in &self.activity_history {
            if !names.contains(&attempt.activity_name.as_str()) {
                names.push(&attempt.activity_name);
            }
        }

        let mut recommendations: Vec<ActivityRecommendation> = names
            .into_iter()
            .filter_map(|name| {
                let success = self.success_rate(name);
                let time_match = self.optimal_hour_for_activity(name) == Some(hour);
                let mood_match = self.mood_match(name, current, moods);
                let time_score = if time_match { 0.3 } else { 0.0 };
                let score = success * 0.4 + time_score + mood_match * 0.3;
                (score > RECOMMEND_THRESHOLD).then(|| ActivityRecommendation {
                    activity: name.to_string(),
                    score,
                    reason: Self::reason(success, time_match, mood_match),
                })
            })
            .collect();
        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        recommendations
    }

    fn at_hour_today(&self, hour: u32, now: DateTime<Utc>) -> DateTime<Utc> {
        self.clock.start_of(self.clock.day_of(now)) + Duration::hours(i64::from(hour))
    }

    /// Reminders for recommended activities at their best hour, plus a mood
    /// check at the hour such checks are usually opened.
    pub fn notification_schedule(
        &self,
        moods: &[MoodEntry],
        now: DateTime<Utc>,
    ) -> Vec<ScheduledNotification> {
        let mut schedule: Vec<ScheduledNotification> = self
            .activity_recommendations(moods, now)
            .into_iter()
            .filter_map(|rec| {
                let hour = self.optimal_hour_for_activity(&rec.activity)?;
                let time = self.at_hour_today(hour, now);
                self.should_send_notification(time).then(|| ScheduledNotification {
                    activity: rec.activity,
                    time,
                    notification_type: NotificationType::ActivityReminder,
                    priority: rec.score,
                })
            })
            .collect();

        if let Some(hour) = self.optimal_notification_hour(NotificationType::MoodCheck) {
            let time = self.at_hour_today(hour, now);
            if self.should_send_notification(time) {
                schedule.push(ScheduledNotification {
                    activity: "Mood Check".to_string(),
                    time,
                    notification_type: NotificationType::MoodCheck,
                    priority: MOOD_CHECK_PRIORITY,
                });
            }
        }

        schedule.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        schedule
    }

    /// Content format to offer for `activity`.
    pub fn adapted_content(&self, activity: &str) -> ContentType {
        let successful: Vec<&ActivityHistory> = self
            .attempts(activity)
            .filter(|a| a.engagement_score > SUCCESS_ENGAGEMENT)
            .collect();
        let base = if successful.is_empty() {
            0.0
        } else {
            let completed = successful
                .iter()
                .filter(|a| a.completion_status == CompletionStatus::Completed)
                .count();
            completed as f64 / successful.len() as f64
        };

        let preferred = &self.preferences.learning.preferred_content_types;
        let mut best: Option<(ContentType, f64)> = None;
        for content in ContentType::ALL {
            let bonus = if preferred.contains(&content) {
                PREFERRED_CONTENT_BONUS
            } else {
                0.0
            };
            let score = base + bonus;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((content, score));
            }
        }
        best.map_or(ContentType::Video, |(content, _)| content)
    }

    /// Share of sent notifications that were opened.
    pub fn notification_response_rate(&self) -> f64 {
        if self.notification_history.is_empty() {
            return 0.0;
        }
        let opened = self.notification_history.iter().filter(|n| n.was_opened).count();
        opened as f64 / self.notification_history.len() as f64
    }
}
