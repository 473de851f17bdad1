use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::habit::{Category, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationType {
    Activity,
    Challenge,
    Article,
    Meditation,
    Exercise,
    Journaling,
}

impl RecommendationType {
    pub fn icon(&self) -> &'static str {
        match self {
            RecommendationType::Activity => "sparkles",
            RecommendationType::Challenge => "trophy.fill",
            RecommendationType::Article => "doc.text.fill",
            RecommendationType::Meditation => "brain.head.profile",
            RecommendationType::Exercise => "figure.run",
            RecommendationType::Journaling => "pencil.line",
        }
    }
}

/// Ordered low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub is_helpful: bool,
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub rec_type: RecommendationType,
    pub category: Category,
    pub time_range: TimeRange,
    pub duration_minutes: u32,
    pub priority: Priority,
    /// Most recent feedback only.
    pub feedback: Option<Feedback>,
    pub last_suggested: DateTime<Utc>,
    /// 0.0 - 1.0
    pub engagement_score: f64,
}

impl Recommendation {
    /// Medium priority, neutral 0.5 engagement.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        rec_type: RecommendationType,
        category: Category,
        time_range: TimeRange,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            rec_type,
            category,
            time_range,
            duration_minutes,
            priority: Priority::Medium,
            feedback: None,
            last_suggested: now,
            engagement_score: 0.5,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_engagement(mut self, score: f64) -> Self {
        self.engagement_score = score.clamp(0.0, 1.0);
        self
    }
}
