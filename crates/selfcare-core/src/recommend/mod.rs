//! Recommendation catalog, ranking and engagement tracking.
//!
//! Ranking is a stable sort on `(priority desc, engagement desc)`, so
//! priority always dominates. Engagement is today's interaction count for a
//! recommendation divided by a fixed ceiling, clamped to `[0, 1]`.

mod personalization;

pub use personalization::{
    ActivityHistory, ActivityRecommendation, CompletionStatus, MoodChange, NotificationHistory,
    PersonalizationEngine, ScheduledNotification,
};

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::clock::DayClock;
use crate::events::{Event, Outbox};
use crate::model::{
    Category, Feedback, Mood, MoodActivity, Priority, Recommendation, RecommendationType, TimeRange,
};

/// Timestamps of today's feedback interactions, per recommendation.
///
/// Earlier days are pruned on every feedback, and a day holds at most
/// `ceiling` entries.
pub type EngagementHistory = BTreeMap<Uuid, Vec<DateTime<Utc>>>;

pub struct RecommendationEngine {
    recommendations: Vec<Recommendation>,
    engagement_history: EngagementHistory,
    ceiling: u32,
    clock: DayClock,
}

impl RecommendationEngine {
    pub fn new(
        recommendations: Vec<Recommendation>,
        engagement_history: EngagementHistory,
        ceiling: u32,
        clock: DayClock,
    ) -> Self {
        Self {
            recommendations,
            engagement_history,
            ceiling: ceiling.max(1),
            clock,
        }
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn engagement_history(&self) -> &EngagementHistory {
        &self.engagement_history
    }

    pub fn get(&self, id: &Uuid) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.id == *id)
    }

    pub fn add_recommendation(&mut self, recommendation: Recommendation) {
        self.recommendations.push(recommendation);
    }

    /// Insert the built-in catalog when nothing is stored yet.
    /// Returns whether anything was added.
    pub fn seed_catalog(&mut self, now: DateTime<Utc>) -> bool {
        if !self.recommendations.is_empty() {
            return false;
        }
        self.recommendations.extend(default_catalog(now));
        tracing::debug!(count = self.recommendations.len(), "seeded recommendation catalog");
        true
    }

    /// Top `limit` recommendations for `time_range`, stamping `last_suggested`.
    pub fn personalized(
        &mut self,
        time_range: TimeRange,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let mut matching: Vec<&mut Recommendation> = self
            .recommendations
            .iter_mut()
            .filter(|r| r.time_range == time_range)
            .collect();
        matching.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.engagement_score.total_cmp(&a.engagement_score))
        });
        matching
            .into_iter()
            .take(limit)
            .map(|r| {
                r.last_suggested = now;
                r.clone()
            })
            .collect()
    }

    /// Record feedback and recompute the engagement score.
    ///
    /// Returns the new score, or `None` for an unknown id.
    pub fn update_feedback(
        &mut self,
        id: &Uuid,
        is_helpful: bool,
        comment: Option<String>,
        now: DateTime<Utc>,
        out: &mut Outbox,
    ) -> Option<f64> {
        let clock = self.clock;
        let cap = self.ceiling as usize;
        let recommendation = self.recommendations.iter_mut().find(|r| r.id == *id)?;
        recommendation.feedback = Some(Feedback {
            is_helpful,
            comment,
            timestamp: now,
        });

        let history = self.engagement_history.entry(*id).or_default();
        history.retain(|t| clock.same_day(*t, now));
        history.push(now);
        if history.len() > cap {
            history.drain(..history.len() - cap);
        }
        let score = (history.len() as f64 / cap as f64).clamp(0.0, 1.0);
        recommendation.engagement_score = score;

        out.push(Event::FeedbackRecorded {
            recommendation_id: *id,
            is_helpful,
            engagement_score: score,
            at: now,
        });
        Some(score)
    }
}

/// Challenge synthesized from the current mood and its activity tags.
pub fn create_adaptive_challenge(
    mood: Mood,
    activities: &BTreeSet<MoodActivity>,
    now: DateTime<Utc>,
) -> Recommendation {
    let (rec_type, duration) = if activities.contains(&MoodActivity::Meditation) {
        (RecommendationType::Meditation, 10)
    } else if activities.contains(&MoodActivity::Reading) {
        (RecommendationType::Article, 15)
    } else {
        (RecommendationType::Activity, 20)
    };

    Recommendation::new(
        format!("7-Day {} Relief Program", mood.label()),
        "A personalized program to help manage your current mood state",
        rec_type,
        Category::Mindfulness,
        TimeRange::Anytime,
        duration,
        now,
    )
    .with_priority(Priority::High)
}

fn default_catalog(now: DateTime<Utc>) -> Vec<Recommendation> {
    vec![
        Recommendation::new(
            "Morning Meditation",
            "Start your day with a 10-minute guided meditation",
            RecommendationType::Meditation,
            Category::Mindfulness,
            TimeRange::Morning,
            10,
            now,
        )
        .with_priority(Priority::High),
        Recommendation::new(
            "Evening Journaling",
            "Reflect on your day and write down three things you're grateful for",
            RecommendationType::Journaling,
            Category::Mindfulness,
            TimeRange::Evening,
            15,
            now,
        ),
        Recommendation::new(
            "Lunchtime Walk",
            "Take a brisk 20-minute walk to recharge",
            RecommendationType::Exercise,
            Category::Fitness,
            TimeRange::Afternoon,
            20,
            now,
        ),
    ]
}
