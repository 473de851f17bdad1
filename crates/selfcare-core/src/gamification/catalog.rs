use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Achievement, AchievementCategory};

/// Progress-tracked achievements shown on the achievements screen.
///
/// Separate from the rule-based unlocks on the user record: entries here
/// carry a numeric goal and move towards it as the facade reports progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementCatalog(Vec<Achievement>);

impl Default for AchievementCatalog {
    fn default() -> Self {
        use AchievementCategory::*;
        Self(vec![
            Achievement::locked("Mood Master", "Track your mood for 7 days in a row", "face.smiling.fill", Mood, 7.0),
            Achievement::locked("Habit Hero", "Complete 5 habits in one day", "checkmark.circle.fill", Habits, 5.0),
            Achievement::locked("Consistency King", "Maintain a 30-day streak", "flame.fill", Consistency, 30.0),
            Achievement::locked("Early Bird", "Complete morning habits for 7 days", "sunrise.fill", Milestones, 7.0),
            Achievement::locked("Night Owl", "Complete evening habits for 7 days", "moon.stars.fill", Milestones, 7.0),
            Achievement::locked("Mood Analyst", "Identify a mood pattern", "chart.bar.fill", Mood, 1.0),
            Achievement::locked("Habit Builder", "Create 5 habits", "plus.circle.fill", Habits, 5.0),
            Achievement::locked("Streak Master", "Maintain a 100-day streak", "flame.fill", Consistency, 100.0),
        ])
    }
}

impl AchievementCatalog {
    pub fn achievements(&self) -> &[Achievement] {
        &self.0
    }

    pub fn get(&self, id: &Uuid) -> Option<&Achievement> {
        self.0.iter().find(|a| a.id == *id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Achievement> {
        self.0.iter().find(|a| a.title == title)
    }

    /// Set progress, clamped to the requirement.
    ///
    /// Unlocking is sticky, and `unlocked_at` is stamped only on the
    /// locked -> unlocked transition.
    /// Returns true when this call unlocked the achievement.
    pub fn update_progress(&mut self, id: &Uuid, current: f64, now: DateTime<Utc>) -> bool {
        let Some(achievement) = self.0.iter_mut().find(|a| a.id == *id) else {
            return false;
        };
        let progress = current.min(achievement.required_progress).max(0.0);
        let newly = progress >= achievement.required_progress && !achievement.is_unlocked;

        achievement.current_progress = progress;
        if newly {
            achievement.is_unlocked = true;
            achievement.unlocked_at = Some(now);
            tracing::info!(title = %achievement.title, "catalog achievement reached");
        }
        newly
    }

    /// [`update_progress`](Self::update_progress) addressed by title.
    pub fn update_progress_by_title(&mut self, title: &str, current: f64, now: DateTime<Utc>) -> bool {
        match self.find_by_title(title).map(|a| a.id) {
            Some(id) => self.update_progress(&id, current, now),
            None => false,
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.0.iter().filter(|a| a.is_unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn default_catalog_is_locked() {
        let catalog = AchievementCatalog::default();
        assert_eq!(catalog.achievements().len(), 8);
        assert_eq!(catalog.unlocked_count(), 0);
        assert_eq!(
            catalog.find_by_title("Streak Master").unwrap().required_progress,
            100.0
        );
    }

    #[test]
    fn unlock_time_is_stamped_once() {
        let mut catalog = AchievementCatalog::default();
        let id = catalog.find_by_title("Habit Builder").unwrap().id;

        assert!(!catalog.update_progress(&id, 3.0, now()));
        assert_eq!(catalog.get(&id).unwrap().progress(), 0.6);

        assert!(catalog.update_progress(&id, 9.0, now()));
        let first = catalog.get(&id).unwrap().clone();
        assert_eq!(first.current_progress, 5.0);
        assert_eq!(first.unlocked_at, Some(now()));

        assert!(!catalog.update_progress(&id, 6.0, now() + Duration::days(1)));
        assert_eq!(catalog.get(&id).unwrap().unlocked_at, Some(now()));

        assert!(!catalog.update_progress(&id, 2.0, now() + Duration::days(2)));
        let after = catalog.get(&id).unwrap();
        assert!(after.is_unlocked);
        assert_eq!(after.unlocked_at, Some(now()));
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut catalog = AchievementCatalog::default();
        assert!(!catalog.update_progress(&Uuid::new_v4(), 1.0, now()));
        assert!(!catalog.update_progress_by_title("Nope", 1.0, now()));
    }
}
