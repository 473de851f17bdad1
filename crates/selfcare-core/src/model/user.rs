use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::achievement::Achievement;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub share_health_data: bool,
    pub share_mood_data: bool,
    pub share_habit_data: bool,
}

/// Account-level settings edited from the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePreferences {
    pub notifications_enabled: bool,
    pub daily_reminder_time: NaiveTime,
    pub weekly_report_enabled: bool,
    #[serde(default)]
    pub privacy: PrivacySettings,
}

impl Default for ProfilePreferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            daily_reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            weekly_report_enabled: true,
            privacy: PrivacySettings::default(),
        }
    }
}

/// Profile plus gamification state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub preferences: ProfilePreferences,
    pub total_habits_completed: u64,
    /// habit id -> consecutive completions
    pub streaks: BTreeMap<Uuid, u32>,
    pub level: u32,
    pub experience: u64,
    pub achievements: Vec<Achievement>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            preferences: ProfilePreferences::default(),
            total_habits_completed: 0,
            streaks: BTreeMap::new(),
            level: 1,
            experience: 0,
            achievements: Vec::new(),
        }
    }

    pub fn streak(&self, habit_id: &Uuid) -> Option<u32> {
        self.streaks.get(habit_id).copied()
    }

    pub fn has_achievement(&self, title: &str) -> bool {
        self.achievements.iter().any(|a| a.title == title)
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new("User", "user@example.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AchievementKind;
    use chrono::Utc;

    #[test]
    fn default_user_starts_at_level_one() {
        let user = User::default();
        assert_eq!(user.level, 1);
        assert_eq!(user.experience, 0);
        assert!(user.streaks.is_empty());
    }

    #[test]
    fn round_trip_with_streaks_and_achievements() {
        let mut user = User::new("Sam", "sam@example.com");
        user.streaks.insert(Uuid::new_v4(), 4);
        user.total_habits_completed = 12;
        user.experience = 260;
        user.level = 2;
        user.achievements
            .push(AchievementKind::HabitsCompleted { count: 10 }.unlocked(Utc::now()));
        user.preferences.privacy.share_mood_data = true;

        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn missing_preferences_decode_to_default() {
        let json = r#"{
            "id": "8a3c1d7e-3f0e-4d7c-9d43-5c2b1f8e9a10",
            "name": "Old",
            "email": "old@example.com",
            "totalHabitsCompleted": 3,
            "streaks": {},
            "level": 1,
            "experience": 30,
            "achievements": []
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.preferences, ProfilePreferences::default());
    }
}
