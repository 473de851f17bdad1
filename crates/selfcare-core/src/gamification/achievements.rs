//! Unlock rules evaluated after every completion.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::clock::DayClock;
use crate::habits::longest_streak;
use crate::model::{AchievementKind, Category, Habit, User};

pub const TOTAL_MILESTONES: [u64; 5] = [10, 50, 100, 500, 1000];
pub const STREAK_MILESTONES: [u32; 4] = [7, 30, 100, 365];

const CATEGORY_MASTERY: usize = 50;
const TIME_OF_DAY_THRESHOLD: usize = 5;
const PERFECT_WEEK_DAYS: i64 = 7;

fn early_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn late_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Every achievement the current state qualifies for, in rule order.
/// Already-unlocked ones are included; the caller filters by title.
pub(super) fn earned(
    user: &User,
    habits: &[Habit],
    clock: &DayClock,
    now: DateTime<Utc>,
) -> Vec<AchievementKind> {
    let mut kinds = Vec::new();

    kinds.extend(
        TOTAL_MILESTONES
            .iter()
            .filter(|&&count| user.total_habits_completed >= count)
            .map(|&count| AchievementKind::HabitsCompleted { count }),
    );

    for category in Category::ALL {
        let days: usize = habits
            .iter()
            .filter(|h| h.category == category)
            .map(|h| h.completed_dates.len())
            .sum();
        if days >= CATEGORY_MASTERY {
            kinds.push(AchievementKind::CategoryMaster { category });
        }
    }

    if is_perfect_week(habits, clock, now) {
        kinds.push(AchievementKind::PerfectWeek);
    }

    let times = || habits.iter().flat_map(|h| h.completion_times.values());
    if times().filter(|t| **t < early_cutoff()).count() >= TIME_OF_DAY_THRESHOLD {
        kinds.push(AchievementKind::EarlyBird);
    }
    if times().filter(|t| **t >= late_cutoff()).count() >= TIME_OF_DAY_THRESHOLD {
        kinds.push(AchievementKind::NightOwl);
    }

    let best = longest_streak(&user.streaks);
    kinds.extend(
        STREAK_MILESTONES
            .iter()
            .filter(|&&days| best >= days)
            .map(|&days| AchievementKind::StreakMilestone { days }),
    );

    kinds
}

fn is_perfect_week(habits: &[Habit], clock: &DayClock, now: DateTime<Utc>) -> bool {
    if habits.is_empty() {
        return false;
    }
    let today = clock.day_of(now);
    (0..PERFECT_WEEK_DAYS).all(|back| {
        let day = today - Duration::days(back);
        habits.iter().all(|h| h.is_completed_on(day))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 20, 22, 0, 0).unwrap()
    }

    fn hms(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn completed(name: &str, days: i64, hour: u32) -> Habit {
        let today = now().date_naive();
        let mut habit = Habit::new(name, today - Duration::days(400));
        for back in 0..days {
            habit.toggle_completion(today - Duration::days(back), hms(hour));
        }
        habit
    }

    #[test]
    fn totals_unlock_every_passed_threshold() {
        let mut user = User::default();
        user.total_habits_completed = 120;
        let kinds = earned(&user, &[], &DayClock::utc(), now());
        assert_eq!(
            kinds,
            vec![
                AchievementKind::HabitsCompleted { count: 10 },
                AchievementKind::HabitsCompleted { count: 50 },
                AchievementKind::HabitsCompleted { count: 100 },
            ]
        );
    }

    #[test]
    fn perfect_week_needs_all_habits_all_days() {
        let full = completed("A", 7, 12);
        let short = completed("B", 6, 12);
        assert!(is_perfect_week(&[full.clone()], &DayClock::utc(), now()));
        assert!(!is_perfect_week(&[full, short], &DayClock::utc(), now()));
        assert!(!is_perfect_week(&[], &DayClock::utc(), now()));
    }

    #[test]
    fn early_bird_and_night_owl_count_completion_times() {
        let morning = completed("Stretch", 5, 7);
        let evening = completed("Journal", 4, 21);
        let kinds = earned(&User::default(), &[morning, evening], &DayClock::utc(), now());
        assert!(kinds.contains(&AchievementKind::EarlyBird));
        assert!(!kinds.contains(&AchievementKind::NightOwl));
    }

    #[test]
    fn category_mastery_sums_across_habits() {
        let a = completed("Run", 30, 12).with_category(Category::Fitness);
        let b = completed("Lift", 20, 12).with_category(Category::Fitness);
        let kinds = earned(&User::default(), &[a, b], &DayClock::utc(), now());
        assert!(kinds.contains(&AchievementKind::CategoryMaster {
            category: Category::Fitness
        }));
        assert!(!kinds.contains(&AchievementKind::CategoryMaster {
            category: Category::Health
        }));
    }

    #[test]
    fn streak_milestones_use_longest_streak() {
        let mut user = User::default();
        user.streaks.insert(Uuid::new_v4(), 3);
        user.streaks.insert(Uuid::new_v4(), 31);
        let kinds = earned(&user, &[], &DayClock::utc(), now());
        assert_eq!(
            kinds,
            vec![
                AchievementKind::StreakMilestone { days: 7 },
                AchievementKind::StreakMilestone { days: 30 },
            ]
        );
    }
}
