//! Domain records shared by the engines.
//!
//! Records are plain values: engines own their collections and hand out
//! clones or shared references, never long-lived mutable borrows.

mod achievement;
mod activity;
mod habit;
mod mood;
mod preferences;
mod recommendation;
mod user;

pub use achievement::{Achievement, AchievementCategory, AchievementKind};
pub use activity::{ActivityFeed, ActivityItem};
pub use habit::{Category, ChartType, Goal, Habit, HabitType, Reminder, Rgba, TimeRange};
pub use mood::{EnergyLevel, Mood, MoodActivity, MoodEntry};
pub use preferences::{
    ContentType, DifficultyLevel, LearningPreferences, LearningStyle, NotificationPreferences,
    NotificationType, QuietHours, UserPreferences,
};
pub use recommendation::{Feedback, Priority, Recommendation, RecommendationType};
pub use user::{PrivacySettings, ProfilePreferences, User};
