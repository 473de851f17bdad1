//! Experience, levels, streaks and achievements.
//!
//! The engine owns the [`User`] record and the recent-activity feed. It is
//! driven by habit completions and never reads engine state other than the
//! habit snapshot handed to it.
//!
//! Level invariant: after every award or removal the level is re-derived by
//! looping until `experience < (level + 1) * level_step`, and (above level 1)
//! `experience >= level * level_step`.

mod achievements;
mod catalog;

pub use achievements::{STREAK_MILESTONES, TOTAL_MILESTONES};
pub use catalog::AchievementCatalog;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::DayClock;
use crate::events::{Event, Outbox};
use crate::habits::Completion;
use crate::model::{AchievementKind, ActivityFeed, ActivityItem, Habit, User};
use crate::storage::ExperienceConfig;

/// Experience granted for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionAward {
    pub streak: u32,
    pub base: u64,
    pub streak_bonus: u64,
    pub milestone: bool,
}

pub struct Gamification {
    user: User,
    activities: ActivityFeed,
    rules: ExperienceConfig,
    max_recent: usize,
}

impl Gamification {
    pub fn new(user: User, activities: ActivityFeed, rules: ExperienceConfig, max_recent: usize) -> Self {
        let mut engine = Self {
            user,
            activities,
            rules,
            max_recent,
        };
        // Stored records from older builds may predate looped level-ups.
        engine.user.level = engine.level_for(engine.user.experience);
        engine
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    pub fn activities(&self) -> &ActivityFeed {
        &self.activities
    }

    pub fn rules(&self) -> &ExperienceConfig {
        &self.rules
    }

    /// Experience at which `level` is reached.
    pub fn threshold(&self, level: u32) -> u64 {
        u64::from(level) * self.rules.level_step
    }

    /// Level implied by an experience total (never below 1).
    pub fn level_for(&self, experience: u64) -> u32 {
        if self.rules.level_step == 0 {
            return 1;
        }
        let level = experience / self.rules.level_step;
        u32::try_from(level).unwrap_or(u32::MAX).max(1)
    }

    fn log(&mut self, title: &str, subtitle: impl Into<String>, icon: &str, at: DateTime<Utc>) {
        self.activities
            .push(ActivityItem::new(title, subtitle, icon, at), self.max_recent);
    }

    /// Apply a habit completion: streak, counters, experience, achievements.
    pub fn record_completion(
        &mut self,
        completion: &Completion,
        habits: &[Habit],
        clock: &DayClock,
        out: &mut Outbox,
    ) -> CompletionAward {
        let now = completion.at;
        let streak = {
            let entry = self.user.streaks.entry(completion.habit_id).or_insert(0);
            *entry += 1;
            *entry
        };
        self.user.total_habits_completed += 1;
        self.log(
            "Habit Completed",
            completion.habit_name.as_str(),
            "checkmark.circle.fill",
            now,
        );
        out.push(Event::HabitCompleted {
            habit_id: completion.habit_id,
            habit_name: completion.habit_name.clone(),
            streak,
            at: now,
        });

        let base = self.rules.habit_completion;
        self.award_experience(base, now, out);

        let milestone = streak % 5 == 0;
        if milestone {
            self.log(
                "Streak Milestone",
                format!("{streak} day streak for {}", completion.habit_name),
                "flame.fill",
                now,
            );
            out.push(Event::StreakMilestone {
                habit_id: completion.habit_id,
                habit_name: completion.habit_name.clone(),
                streak,
                at: now,
            });
        }

        let streak_bonus = u64::from(streak.min(self.rules.streak_bonus_cap)) * self.rules.streak_bonus;
        self.award_experience(streak_bonus, now, out);

        self.check_achievements(habits, clock, now, out);

        CompletionAward {
            streak,
            base,
            streak_bonus,
            milestone,
        }
    }

    /// Add experience, then level up as many times as the total allows.
    pub fn award_experience(&mut self, points: u64, now: DateTime<Utc>, out: &mut Outbox) {
        if points == 0 {
            return;
        }
        self.user.experience += points;
        out.push(Event::ExperienceAwarded {
            points,
            total: self.user.experience,
            at: now,
        });

        while self.rules.level_step > 0
            && self.user.experience >= self.threshold(self.user.level + 1)
        {
            self.user.level += 1;
            let level = self.user.level;
            tracing::info!(level, experience = self.user.experience, "level up");
            self.log("Level Up!", format!("Reached level {level}"), "star.circle.fill", now);
            out.push(Event::LevelUp { level, at: now });
        }
    }

    /// Take experience away (floored at 0) and drop levels to match.
    ///
    /// No completion path calls this; it exists for manual corrections.
    pub fn remove_experience(&mut self, points: u64, now: DateTime<Utc>, out: &mut Outbox) {
        self.user.experience = self.user.experience.saturating_sub(points);
        while self.user.level > 1 && self.user.experience < self.threshold(self.user.level) {
            self.user.level -= 1;
            let level = self.user.level;
            tracing::info!(level, experience = self.user.experience, "level down");
            self.log(
                "Level Decreased",
                format!("Returned to level {level}"),
                "arrow.down.circle.fill",
                now,
            );
            out.push(Event::LevelDown { level, at: now });
        }
    }

    /// Unlock `kind` unless an achievement with the same title exists.
    /// Returns whether anything changed.
    pub fn unlock(&mut self, kind: AchievementKind, now: DateTime<Utc>, out: &mut Outbox) -> bool {
        let achievement = kind.unlocked(now);
        if self.user.has_achievement(&achievement.title) {
            return false;
        }
        tracing::info!(title = %achievement.title, "achievement unlocked");
        self.log("Achievement Unlocked", achievement.title.as_str(), &achievement.icon, now);
        out.push(Event::AchievementUnlocked {
            title: achievement.title.clone(),
            description: achievement.description.clone(),
            icon: achievement.icon.clone(),
            at: now,
        });
        self.user.achievements.push(achievement);
        self.award_experience(self.rules.achievement_unlock, now, out);
        true
    }

    /// Evaluate every rule against current state and unlock what is earned.
    pub fn check_achievements(
        &mut self,
        habits: &[Habit],
        clock: &DayClock,
        now: DateTime<Utc>,
        out: &mut Outbox,
    ) -> Vec<AchievementKind> {
        let earned = achievements::earned(&self.user, habits, clock, now);
        earned
            .into_iter()
            .filter(|kind| self.unlock(*kind, now, out))
            .collect()
    }

    /// Explicitly zero a habit's streak.
    pub fn reset_streak(&mut self, habit_id: &Uuid) -> bool {
        match self.user.streaks.get_mut(habit_id) {
            Some(streak) => {
                *streak = 0;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap()
    }

    fn engine() -> Gamification {
        Gamification::new(User::default(), ActivityFeed::new(), ExperienceConfig::default(), 50)
    }

    fn completion(habit: &Habit) -> Completion {
        Completion {
            habit_id: habit.id,
            habit_name: habit.name.clone(),
            category: habit.category,
            day: now().date_naive(),
            at: now(),
        }
    }

    #[test]
    fn single_award_below_threshold_keeps_level() {
        let mut game = engine();
        let mut out = Outbox::default();
        game.award_experience(150, now(), &mut out);
        assert_eq!(game.user().level, 1);
        assert!(out.celebration().is_none());
    }

    #[test]
    fn large_award_crosses_several_levels() {
        let mut game = engine();
        let mut out = Outbox::default();
        game.award_experience(520, now(), &mut out);
        assert_eq!(game.user().level, 5);
        let ups = out
            .pending()
            .iter()
            .filter(|e| matches!(e, Event::LevelUp { .. }))
            .count();
        assert_eq!(ups, 4);
        assert_eq!(game.activities().latest().unwrap().subtitle, "Reached level 5");
    }

    #[test]
    fn remove_experience_drops_levels() {
        let mut game = engine();
        let mut out = Outbox::default();
        game.award_experience(450, now(), &mut out);
        assert_eq!(game.user().level, 4);
        game.remove_experience(220, now(), &mut out);
        assert_eq!(game.user().experience, 230);
        assert_eq!(game.user().level, 2);
        game.remove_experience(10_000, now(), &mut out);
        assert_eq!(game.user().experience, 0);
        assert_eq!(game.user().level, 1);
    }

    #[test]
    fn new_normalises_stale_level() {
        let mut user = User::default();
        user.experience = 730;
        user.level = 2;
        let game = Gamification::new(user, ActivityFeed::new(), ExperienceConfig::default(), 50);
        assert_eq!(game.user().level, 7);
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut game = engine();
        let mut out = Outbox::default();
        assert!(game.unlock(AchievementKind::PerfectWeek, now(), &mut out));
        let xp = game.user().experience;
        assert!(!game.unlock(AchievementKind::PerfectWeek, now(), &mut out));
        assert_eq!(game.user().experience, xp);
        assert_eq!(game.user().achievements.len(), 1);
        assert_eq!(xp, 100);
    }

    #[test]
    fn streak_milestone_awards_bonus() {
        let mut game = engine();
        let habit = Habit::new("Walk", now().date_naive()).with_category(Category::Fitness);
        game.user_mut().streaks.insert(habit.id, 4);
        let mut out = Outbox::default();

        let before = game.user().experience;
        let award = game.record_completion(&completion(&habit), &[habit.clone()], &DayClock::utc(), &mut out);

        assert_eq!(award.streak, 5);
        assert!(award.milestone);
        assert_eq!(award.streak_bonus, 5 * 5);
        assert_eq!(game.user().experience - before, 10 + 25);
        assert!(game
            .activities()
            .items()
            .iter()
            .any(|a| a.title == "Streak Milestone" && a.subtitle == "5 day streak for Walk"));
    }

    #[test]
    fn streak_bonus_is_capped() {
        let mut game = engine();
        let habit = Habit::new("Walk", now().date_naive());
        game.user_mut().streaks.insert(habit.id, 19);
        let mut out = Outbox::default();
        let award = game.record_completion(&completion(&habit), &[habit.clone()], &DayClock::utc(), &mut out);
        assert_eq!(award.streak, 20);
        assert_eq!(award.streak_bonus, 50);
    }

    #[test]
    fn first_completion_starts_streak_and_counts() {
        let mut game = engine();
        let habit = Habit::new("Walk", now().date_naive());
        let mut out = Outbox::default();
        let award = game.record_completion(&completion(&habit), &[habit.clone()], &DayClock::utc(), &mut out);
        assert_eq!(award.streak, 1);
        assert!(!award.milestone);
        assert_eq!(game.user().total_habits_completed, 1);
        assert_eq!(game.user().experience, 15);
        assert_eq!(game.user().streak(&habit.id), Some(1));
    }

    #[test]
    fn reset_streak_only_touches_known_habits() {
        let mut game = engine();
        let id = Uuid::new_v4();
        assert!(!game.reset_streak(&id));
        game.user_mut().streaks.insert(id, 8);
        assert!(game.reset_streak(&id));
        assert_eq!(game.user().streak(&id), Some(0));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn holds(game: &Gamification) -> bool {
            let user = game.user();
            let step = game.rules().level_step;
            let upper = user.experience < u64::from(user.level + 1) * step;
            let lower = user.level == 1 || user.experience >= u64::from(user.level) * step;
            upper && lower
        }

        proptest! {
            #[test]
            fn level_invariant_after_awards(awards in proptest::collection::vec(0u64..2_000, 1..20)) {
                let mut game = engine();
                let mut out = Outbox::default();
                for points in awards {
                    game.award_experience(points, now(), &mut out);
                    prop_assert!(holds(&game));
                }
            }

            #[test]
            fn level_invariant_after_mixed_changes(
                changes in proptest::collection::vec((any::<bool>(), 0u64..1_500), 1..30)
            ) {
                let mut game = engine();
                let mut out = Outbox::default();
                for (add, points) in changes {
                    if add {
                        game.award_experience(points, now(), &mut out);
                    } else {
                        game.remove_experience(points, now(), &mut out);
                    }
                    prop_assert!(holds(&game));
                    prop_assert_eq!(game.user().level, game.level_for(game.user().experience));
                }
            }
        }
    }
}
