use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-reported affect. Declaration order is the tie-break order for
/// "most common mood".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Anxious,
    Angry,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Neutral, Mood::Sad, Mood::Anxious, Mood::Angry];

    /// Valence on a 1-5 scale.
    pub fn valence(&self) -> i32 {
        match self {
            Mood::Happy => 5,
            Mood::Neutral => 3,
            Mood::Sad => 1,
            Mood::Anxious => 2,
            Mood::Angry => 1,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Neutral => "😐",
            Mood::Sad => "😢",
            Mood::Anxious => "😰",
            Mood::Angry => "😠",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Angry => "Angry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl Default for EnergyLevel {
    fn default() -> Self {
        EnergyLevel::Medium
    }
}

/// Activity tag attached to a mood entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoodActivity {
    Exercise,
    Meditation,
    Social,
    Work,
    Sleep,
    Reading,
    Creative,
}

impl MoodActivity {
    pub fn label(&self) -> &'static str {
        match self {
            MoodActivity::Exercise => "Exercise",
            MoodActivity::Meditation => "Meditation",
            MoodActivity::Social => "Social",
            MoodActivity::Work => "Work",
            MoodActivity::Sleep => "Sleep",
            MoodActivity::Reading => "Reading",
            MoodActivity::Creative => "Creative",
        }
    }
}

/// One mood log entry. Append-only: never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub mood: Mood,
    pub energy: EnergyLevel,
    pub activities: BTreeSet<MoodActivity>,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(
        mood: Mood,
        energy: EnergyLevel,
        activities: BTreeSet<MoodActivity>,
        notes: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mood,
            energy,
            activities,
            notes: notes.into(),
            timestamp,
        }
    }
}
