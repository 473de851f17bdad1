//! Application facade: owns every engine plus the store they persist to.
//!
//! UI surfaces (the CLI here) call into [`SelfCare`] only. Each operation
//! validates its input, mutates the owning engine, then writes the affected
//! documents back on a best-effort basis: a failed write is logged and the
//! in-memory state stands.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{DayClock, ReportRange};
use crate::error::{CoreError, Result, ValidationError};
use crate::events::{Celebration, Event, Outbox};
use crate::gamification::{AchievementCatalog, CompletionAward, Gamification};
use crate::habits::{longest_streak, sample_habits, CompletionSummary, HabitCompletionData, HabitEngine};
use crate::model::{
    ActivityFeed, ContentType, EnergyLevel, Habit, Mood, MoodActivity, MoodEntry, NotificationType,
    Recommendation, TimeRange, User, UserPreferences,
};
use crate::mood::{MoodEngine, MoodSummary};
use crate::recommend::{
    create_adaptive_challenge, ActivityRecommendation, CompletionStatus, MoodChange,
    PersonalizationEngine, RecommendationEngine, ScheduledNotification,
};
use crate::storage::{keys, load_or_default, save_best_effort, Config, Database, KeyValueStore};

/// Partial profile edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub daily_reminder_time: Option<NaiveTime>,
    pub weekly_report_enabled: Option<bool>,
    pub share_health_data: Option<bool>,
    pub share_mood_data: Option<bool>,
    pub share_habit_data: Option<bool>,
}

pub struct SelfCare {
    store: Box<dyn KeyValueStore>,
    config: Config,
    clock: DayClock,
    pinned_now: Option<DateTime<Utc>>,
    habits: HabitEngine,
    game: Gamification,
    catalog: AchievementCatalog,
    moods: MoodEngine,
    recs: RecommendationEngine,
    personal: PersonalizationEngine,
    outbox: Outbox,
}

fn not_found(kind: &'static str, id: &Uuid) -> CoreError {
    CoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field).into());
    }
    Ok(())
}

fn require_unit(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("{value} is outside 0.0..=1.0"),
        }
        .into());
    }
    Ok(())
}

impl SelfCare {
    /// Open the on-disk database and configuration in the data directory.
    ///
    /// # Errors
    /// Returns an error if the database or the config file cannot be opened.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        Ok(Self::open_with(Box::new(db), config))
    }

    /// Build the facade over `store`. Unreadable documents fall back to
    /// their defaults (logged), never to an error.
    pub fn open_with(store: Box<dyn KeyValueStore>, config: Config) -> Self {
        let now = Utc::now();
        let clock = config.day_clock();
        let s = store.as_ref();

        let habits = HabitEngine::with_habits(load_or_default(s, keys::HABITS), clock, now);
        let game = Gamification::new(
            load_or_default::<User>(s, keys::USER),
            load_or_default::<ActivityFeed>(s, keys::ACTIVITIES),
            config.experience.clone(),
            config.activity.max_recent,
        );
        let catalog = load_or_default(s, keys::ACHIEVEMENT_CATALOG);
        let moods = MoodEngine::new(load_or_default(s, keys::MOOD_ENTRIES), clock);
        let mut recs = RecommendationEngine::new(
            load_or_default(s, keys::RECOMMENDATIONS),
            load_or_default(s, keys::ENGAGEMENT_HISTORY),
            config.recommendations.engagement_ceiling,
            clock,
        );
        let personal = PersonalizationEngine::new(
            load_or_default::<UserPreferences>(s, keys::PREFERENCES),
            load_or_default(s, keys::ACTIVITY_HISTORY),
            load_or_default(s, keys::NOTIFICATION_HISTORY),
            clock,
        );

        let seeded = config.recommendations.seed_catalog && recs.seed_catalog(now);

        let app = Self {
            store,
            config,
            clock,
            pinned_now: None,
            habits,
            game,
            catalog,
            moods,
            recs,
            personal,
            outbox: Outbox::default(),
        };
        if seeded {
            app.persist_recommendations();
        }
        app
    }

    /// Open over a fresh in-memory database with default configuration.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot create the in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Database::open_memory()?;
        Ok(Self::open_with(Box::new(db), Config::default()))
    }

    /// Freeze the clock at `at` (or release it with `None`). Used for
    /// replaying a session at a fixed time.
    pub fn pin_time(&mut self, at: Option<DateTime<Utc>>) {
        self.pinned_now = at;
        self.habits.refresh_today(self.now());
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.pinned_now.unwrap_or_else(Utc::now)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> DayClock {
        self.clock
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        save_best_effort(self.store.as_ref(), key, value);
    }

    fn persist_habits(&self) {
        self.persist(keys::HABITS, self.habits.habits());
    }

    fn persist_user(&self) {
        self.persist(keys::USER, self.game.user());
        self.persist(keys::ACTIVITIES, self.game.activities());
    }

    fn persist_recommendations(&self) {
        self.persist(keys::RECOMMENDATIONS, self.recs.recommendations());
        self.persist(keys::ENGAGEMENT_HISTORY, self.recs.engagement_history());
    }

    fn persist_personalization(&self) {
        self.persist(keys::PREFERENCES, self.personal.preferences());
        self.persist(keys::ACTIVITY_HISTORY, self.personal.activity_history());
        self.persist(keys::NOTIFICATION_HISTORY, self.personal.notification_history());
    }

    /// Bring the progress-tracked catalog in line with current state.
    fn sync_catalog(&mut self, now: DateTime<Utc>) {
        let habit_count = self.habits.habits().len() as f64;
        let done_today = self.habits.completed_today(now) as f64;
        let best_streak = f64::from(longest_streak(&self.game.user().streaks));
        let mood_run = f64::from(self.moods.current_logging_run(now));
        let patterns_found = if self.moods.insights().is_empty() { 0.0 } else { 1.0 };
        let morning_days = self.habits.completion_days_in(TimeRange::Morning) as f64;
        let evening_days = self.habits.completion_days_in(TimeRange::Evening) as f64;

        let c = &mut self.catalog;
        c.update_progress_by_title("Habit Builder", habit_count, now);
        c.update_progress_by_title("Habit Hero", done_today, now);
        c.update_progress_by_title("Consistency King", best_streak, now);
        c.update_progress_by_title("Streak Master", best_streak, now);
        c.update_progress_by_title("Mood Master", mood_run, now);
        c.update_progress_by_title("Mood Analyst", patterns_found, now);
        c.update_progress_by_title("Early Bird", morning_days, now);
        c.update_progress_by_title("Night Owl", evening_days, now);
        self.persist(keys::ACHIEVEMENT_CATALOG, &self.catalog);
    }

    // ── Habits ──────────────────────────────────────────────────────────

    pub fn habits(&self) -> &[Habit] {
        self.habits.habits()
    }

    pub fn habit(&self, id: &Uuid) -> Option<&Habit> {
        self.habits.get(id)
    }

    pub fn todays_habits(&self) -> Vec<&Habit> {
        self.habits.todays_habits()
    }

    pub fn is_completed_today(&self, id: &Uuid) -> bool {
        self.habits.is_completed_today(id, self.now())
    }

    /// # Errors
    /// Returns a validation error for a blank name or a weekday outside 1..=7.
    pub fn add_habit(&mut self, habit: Habit) -> Result<Uuid> {
        habit.validate()?;
        let now = self.now();
        let id = habit.id;
        tracing::debug!(habit = %habit.name, "adding habit");
        self.habits.add_habit(habit, now);
        self.persist_habits();
        self.sync_catalog(now);
        Ok(id)
    }

    /// Complete a habit for today.
    ///
    /// `Ok(None)` when it was already completed today (no effect).
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn toggle_habit(&mut self, id: &Uuid) -> Result<Option<CompletionAward>> {
        if self.habits.get(id).is_none() {
            return Err(not_found("habit", id));
        }
        let now = self.now();
        let Some(completion) = self.habits.toggle_habit(id, now) else {
            return Ok(None);
        };
        let award = self.game.record_completion(
            &completion,
            self.habits.habits(),
            &self.clock,
            &mut self.outbox,
        );
        self.persist_habits();
        self.persist_user();
        self.sync_catalog(now);
        Ok(Some(award))
    }

    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn delete_habit(&mut self, id: &Uuid) -> Result<Habit> {
        let now = self.now();
        let removed = self
            .habits
            .delete_habit(id, now)
            .ok_or_else(|| not_found("habit", id))?;
        self.persist_habits();
        self.sync_catalog(now);
        Ok(removed)
    }

    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn reset_streak(&mut self, id: &Uuid) -> Result<()> {
        if self.habits.get(id).is_none() {
            return Err(not_found("habit", id));
        }
        self.game.reset_streak(id);
        self.persist_user();
        Ok(())
    }

    /// Add the starter habits when the list is empty. Returns how many were added.
    pub fn add_sample_habits(&mut self) -> usize {
        if !self.habits.habits().is_empty() {
            return 0;
        }
        let now = self.now();
        let samples = sample_habits(self.clock.day_of(now));
        let count = samples.len();
        for habit in samples {
            self.habits.add_habit(habit, now);
        }
        self.persist_habits();
        self.sync_catalog(now);
        count
    }

    pub fn completion_summary(&self) -> CompletionSummary {
        self.habits.summary(&self.game.user().streaks, self.now())
    }

    pub fn completion_data(&self, range: ReportRange) -> Vec<HabitCompletionData> {
        self.habits.completion_data(range, self.now())
    }

    // ── Gamification and profile ────────────────────────────────────────

    pub fn user(&self) -> &User {
        self.game.user()
    }

    pub fn activities(&self) -> &ActivityFeed {
        self.game.activities()
    }

    pub fn achievement_catalog(&self) -> &AchievementCatalog {
        &self.catalog
    }

    /// Manually take experience away. Not reached by any completion path.
    pub fn remove_experience(&mut self, points: u64) {
        let now = self.now();
        self.game.remove_experience(points, now, &mut self.outbox);
        self.persist_user();
    }

    /// # Errors
    /// Returns a validation error for a blank name or email.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User> {
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(email) = &update.email {
            require_text("email", email)?;
        }

        let user = self.game.user_mut();
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        let prefs = &mut user.preferences;
        if let Some(v) = update.notifications_enabled {
            prefs.notifications_enabled = v;
        }
        if let Some(v) = update.daily_reminder_time {
            prefs.daily_reminder_time = v;
        }
        if let Some(v) = update.weekly_report_enabled {
            prefs.weekly_report_enabled = v;
        }
        if let Some(v) = update.share_health_data {
            prefs.privacy.share_health_data = v;
        }
        if let Some(v) = update.share_mood_data {
            prefs.privacy.share_mood_data = v;
        }
        if let Some(v) = update.share_habit_data {
            prefs.privacy.share_habit_data = v;
        }

        self.persist_user();
        Ok(self.game.user())
    }

    // ── Mood ────────────────────────────────────────────────────────────

    pub fn log_mood(
        &mut self,
        mood: Mood,
        energy: EnergyLevel,
        activities: BTreeSet<MoodActivity>,
        notes: impl Into<String>,
    ) -> MoodEntry {
        let now = self.now();
        let entry = self
            .moods
            .add_mood_entry(mood, energy, activities, notes, now, &mut self.outbox)
            .clone();
        self.personal.update_mood_baseline(self.moods.entries(), now);
        self.persist(keys::MOOD_ENTRIES, self.moods.entries());
        self.persist_personalization();
        self.sync_catalog(now);
        entry
    }

    pub fn mood_entries(&self, range: Option<ReportRange>) -> Vec<&MoodEntry> {
        match range {
            Some(range) => self.moods.entries_in(range, self.now()),
            None => self.moods.entries().iter().collect(),
        }
    }

    pub fn mood_summary(&self) -> MoodSummary {
        self.moods.summary(self.now())
    }

    // ── Recommendations ─────────────────────────────────────────────────

    pub fn all_recommendations(&self) -> &[Recommendation] {
        self.recs.recommendations()
    }

    /// Ranked recommendations for `time_range`; `None` uses the configured limit.
    pub fn recommendations(&mut self, time_range: TimeRange, limit: Option<usize>) -> Vec<Recommendation> {
        let limit = limit.unwrap_or(self.config.recommendations.default_limit);
        let listed = self.recs.personalized(time_range, limit, self.now());
        if !listed.is_empty() {
            self.persist_recommendations();
        }
        listed
    }

    /// # Errors
    /// Returns a validation error for a blank title.
    pub fn add_recommendation(&mut self, recommendation: Recommendation) -> Result<Uuid> {
        require_text("title", &recommendation.title)?;
        let id = recommendation.id;
        self.recs.add_recommendation(recommendation);
        self.persist_recommendations();
        Ok(id)
    }

    /// Record feedback; returns the recomputed engagement score.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown id.
    pub fn give_feedback(&mut self, id: &Uuid, is_helpful: bool, comment: Option<String>) -> Result<f64> {
        let now = self.now();
        let score = self
            .recs
            .update_feedback(id, is_helpful, comment, now, &mut self.outbox)
            .ok_or_else(|| not_found("recommendation", id))?;
        self.persist_recommendations();
        Ok(score)
    }

    /// Synthesize a challenge from the latest mood entry and add it to the
    /// catalog. `None` until a mood has been logged.
    pub fn create_adaptive_challenge(&mut self) -> Option<Recommendation> {
        let latest = self.moods.latest()?;
        let challenge = create_adaptive_challenge(latest.mood, &latest.activities, self.now());
        self.recs.add_recommendation(challenge.clone());
        self.persist_recommendations();
        Some(challenge)
    }

    // ── Personalization ─────────────────────────────────────────────────

    pub fn preferences(&self) -> &UserPreferences {
        self.personal.preferences()
    }

    /// # Errors
    /// Returns a validation error for a blank name or an engagement outside 0..=1.
    pub fn record_activity(
        &mut self,
        name: &str,
        duration_minutes: u32,
        engagement: f64,
        status: CompletionStatus,
    ) -> Result<()> {
        require_text("activity", name)?;
        require_unit("engagement", engagement)?;
        let now = self.now();
        self.personal
            .record_activity(name, duration_minutes, engagement, status, now);
        self.persist_personalization();
        Ok(())
    }

    pub fn record_notification(&mut self, kind: NotificationType, was_opened: bool, response_seconds: Option<u32>) {
        let now = self.now();
        self.personal
            .record_notification(kind, was_opened, response_seconds, now);
        self.persist_personalization();
    }

    /// # Errors
    /// Returns a validation error for a blank name or an engagement outside 0..=1.
    pub fn update_activity_engagement(&mut self, name: &str, engagement: f64) -> Result<()> {
        require_text("activity", name)?;
        require_unit("engagement", engagement)?;
        self.personal.update_activity_engagement(name, engagement);
        self.persist_personalization();
        Ok(())
    }

    /// # Errors
    /// Returns a validation error for hours outside 0..24.
    pub fn set_quiet_hours(&mut self, start_hour: u32, end_hour: u32) -> Result<()> {
        for (field, hour) in [("quietHours.start", start_hour), ("quietHours.end", end_hour)] {
            if hour > 23 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: format!("{hour} is not an hour of the day"),
                }
                .into());
            }
        }
        let quiet = &mut self.personal.preferences_mut().notifications.quiet_hours;
        quiet.start_hour = start_hour;
        quiet.end_hour = end_hour;
        self.persist_personalization();
        Ok(())
    }

    pub fn optimal_hour_for_activity(&self, name: &str) -> Option<u32> {
        self.personal.optimal_hour_for_activity(name)
    }

    pub fn mood_changes(&self) -> Vec<MoodChange> {
        self.personal.detect_mood_changes(self.moods.entries(), self.now())
    }

    pub fn should_send_notification(&self, at: DateTime<Utc>) -> bool {
        self.personal.should_send_notification(at)
    }

    pub fn activity_recommendations(&self) -> Vec<ActivityRecommendation> {
        self.personal
            .activity_recommendations(self.moods.entries(), self.now())
    }

    pub fn notification_schedule(&self) -> Vec<ScheduledNotification> {
        self.personal
            .notification_schedule(self.moods.entries(), self.now())
    }

    pub fn adapted_content(&self, activity: &str) -> ContentType {
        self.personal.adapted_content(activity)
    }

    pub fn notification_response_rate(&self) -> f64 {
        self.personal.notification_response_rate()
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Take every event emitted since the last drain.
    ///
    /// Hosts should drain after each operation. Undrained events are capped
    /// at [`MAX_PENDING_EVENTS`](crate::events::MAX_PENDING_EVENTS), oldest
    /// first out; the celebration slot is kept until dismissed.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.outbox.drain()
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.outbox.celebration()
    }

    pub fn dismiss_celebration(&mut self) -> Option<Celebration> {
        self.outbox.dismiss_celebration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_is_seeded() {
        let app = SelfCare::in_memory().unwrap();
        assert_eq!(app.all_recommendations().len(), 3);
        assert!(app.habits().is_empty());
        assert_eq!(app.user().level, 1);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let mut config = Config::default();
        config.recommendations.seed_catalog = false;
        let app = SelfCare::open_with(Box::new(Database::open_memory().unwrap()), config);
        assert!(app.all_recommendations().is_empty());
    }

    #[test]
    fn profile_update_rejects_blank_name() {
        let mut app = SelfCare::in_memory().unwrap();
        let err = app
            .update_profile(ProfileUpdate {
                name: Some("  ".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyField("name"))));

        let user = app
            .update_profile(ProfileUpdate {
                name: Some("Alex".into()),
                share_mood_data: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(user.name, "Alex");
        assert!(user.preferences.privacy.share_mood_data);
    }

    #[test]
    fn quiet_hours_are_validated() {
        let mut app = SelfCare::in_memory().unwrap();
        assert!(app.set_quiet_hours(24, 6).is_err());
        app.set_quiet_hours(23, 6).unwrap();
        assert_eq!(app.preferences().notifications.quiet_hours.start_hour, 23);
    }

    #[test]
    fn adaptive_challenge_needs_a_mood() {
        let mut app = SelfCare::in_memory().unwrap();
        assert!(app.create_adaptive_challenge().is_none());
        app.log_mood(Mood::Sad, EnergyLevel::Low, [MoodActivity::Reading].into(), "");
        let challenge = app.create_adaptive_challenge().unwrap();
        assert_eq!(challenge.title, "7-Day Sad Relief Program");
        assert!(app.all_recommendations().iter().any(|r| r.id == challenge.id));
    }
}
