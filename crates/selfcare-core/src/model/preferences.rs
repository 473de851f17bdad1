//! Personalization preferences, stored under `userPreferences`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::habit::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    ActivityReminder,
    MoodCheck,
    ProgressUpdate,
    ChallengeReminder,
}

/// Quiet window in local hours. `start > end` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl QuietHours {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub enabled: bool,
    pub quiet_hours: QuietHours,
    pub preferred_types: BTreeSet<NotificationType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Video,
    Audio,
    Text,
    Interactive,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Video,
        ContentType::Audio,
        ContentType::Text,
        ContentType::Interactive,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    Reading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPreferences {
    pub preferred_content_types: BTreeSet<ContentType>,
    pub difficulty: DifficultyLevel,
    pub style: LearningStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub preferred_activity_times: BTreeMap<TimeRange, Vec<NaiveTime>>,
    /// activity name -> engagement 0.0-1.0
    #[serde(default)]
    pub activity_engagement: BTreeMap<String, f64>,
    #[serde(default)]
    pub mood_baseline: f64,
    pub notifications: NotificationPreferences,
    pub learning: LearningPreferences,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            preferred_activity_times: BTreeMap::new(),
            activity_engagement: BTreeMap::new(),
            mood_baseline: 0.0,
            notifications: NotificationPreferences {
                enabled: true,
                quiet_hours: QuietHours {
                    start_hour: 22,
                    end_hour: 7,
                },
                preferred_types: [NotificationType::ActivityReminder, NotificationType::MoodCheck]
                    .into_iter()
                    .collect(),
            },
            learning: LearningPreferences {
                preferred_content_types: [ContentType::Video, ContentType::Interactive]
                    .into_iter()
                    .collect(),
                difficulty: DifficultyLevel::Beginner,
                style: LearningStyle::Visual,
            },
        }
    }
}
