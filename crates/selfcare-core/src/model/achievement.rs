use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::habit::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AchievementCategory {
    Mood,
    Habits,
    Consistency,
    Milestones,
}

/// Rule-based achievements unlocked by the gamification engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AchievementKind {
    HabitsCompleted { count: u64 },
    CategoryMaster { category: Category },
    PerfectWeek,
    EarlyBird,
    NightOwl,
    StreakMilestone { days: u32 },
}

impl AchievementKind {
    /// Unique per achievement; used to detect repeat unlocks.
    pub fn title(&self) -> String {
        match self {
            AchievementKind::HabitsCompleted { count } => format!("{count} Habits Completed"),
            AchievementKind::CategoryMaster { category } => format!("{} Master", category.label()),
            AchievementKind::PerfectWeek => "Perfect Week".to_string(),
            AchievementKind::EarlyBird => "Early Bird".to_string(),
            AchievementKind::NightOwl => "Night Owl".to_string(),
            AchievementKind::StreakMilestone { days } => format!("{days}-Day Streak"),
        }
    }

    pub fn description(&self) -> String {
        match self {
            AchievementKind::HabitsCompleted { count } => {
                format!("Completed {count} habits in total")
            }
            AchievementKind::CategoryMaster { category } => {
                format!("Completed 50 {} habits", category.label().to_lowercase())
            }
            AchievementKind::PerfectWeek => {
                "Completed every habit on each of the last 7 days".to_string()
            }
            AchievementKind::EarlyBird => "Completed 5 habits before 9 AM".to_string(),
            AchievementKind::NightOwl => "Completed 5 habits after 9 PM".to_string(),
            AchievementKind::StreakMilestone { days } => {
                format!("Kept a habit going for {days} days in a row")
            }
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            AchievementKind::HabitsCompleted { .. } => "checkmark.seal.fill",
            AchievementKind::CategoryMaster { category } => category.icon(),
            AchievementKind::PerfectWeek => "calendar.badge.checkmark",
            AchievementKind::EarlyBird => "sunrise.fill",
            AchievementKind::NightOwl => "moon.stars.fill",
            AchievementKind::StreakMilestone { .. } => "flame.fill",
        }
    }

    pub fn category(&self) -> AchievementCategory {
        match self {
            AchievementKind::HabitsCompleted { .. } => AchievementCategory::Milestones,
            AchievementKind::CategoryMaster { .. } => AchievementCategory::Habits,
            AchievementKind::PerfectWeek | AchievementKind::StreakMilestone { .. } => {
                AchievementCategory::Consistency
            }
            AchievementKind::EarlyBird | AchievementKind::NightOwl => {
                AchievementCategory::Milestones
            }
        }
    }

    /// Build the already-unlocked record stored on the user.
    pub fn unlocked(&self, at: DateTime<Utc>) -> Achievement {
        Achievement {
            id: Uuid::new_v4(),
            title: self.title(),
            description: self.description(),
            icon: self.icon().to_string(),
            category: self.category(),
            required_progress: 1.0,
            current_progress: 1.0,
            is_unlocked: true,
            unlocked_at: Some(at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub required_progress: f64,
    pub current_progress: f64,
    pub is_unlocked: bool,
    /// Set once, on the locked -> unlocked transition.
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// A locked achievement with zero progress.
    pub fn locked(
        title: &str,
        description: &str,
        icon: &str,
        category: AchievementCategory,
        required_progress: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category,
            required_progress,
            current_progress: 0.0,
            is_unlocked: false,
            unlocked_at: None,
        }
    }

    /// Fraction complete, capped at 1.0.
    pub fn progress(&self) -> f64 {
        if self.required_progress <= 0.0 {
            return 1.0;
        }
        (self.current_progress / self.required_progress).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_distinct_per_parameter() {
        let a = AchievementKind::HabitsCompleted { count: 10 }.title();
        let b = AchievementKind::HabitsCompleted { count: 50 }.title();
        assert_ne!(a, b);
        assert_eq!(
            AchievementKind::CategoryMaster {
                category: Category::Fitness
            }
            .title(),
            "Fitness Master"
        );
    }

    #[test]
    fn progress_is_capped() {
        let mut a = Achievement::locked("x", "y", "z", AchievementCategory::Habits, 4.0);
        a.current_progress = 2.0;
        assert_eq!(a.progress(), 0.5);
        a.current_progress = 9.0;
        assert_eq!(a.progress(), 1.0);
    }

    #[test]
    fn unlocked_record_is_complete() {
        let at = Utc::now();
        let a = AchievementKind::PerfectWeek.unlocked(at);
        assert!(a.is_unlocked);
        assert_eq!(a.unlocked_at, Some(at));
        assert_eq!(a.progress(), 1.0);
        assert_eq!(a.category, AchievementCategory::Consistency);
    }
}
