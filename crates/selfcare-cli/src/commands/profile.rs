//! Profile and progression commands.

use chrono::NaiveTime;
use clap::Subcommand;
use selfcare_core::{ProfileUpdate, SelfCare};

use super::{print_json, print_with_events, CmdResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile with level and experience
    Show,
    /// Edit profile fields; omitted fields are left unchanged
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        /// HH:MM
        #[arg(long)]
        reminder_time: Option<NaiveTime>,
        #[arg(long)]
        weekly_report: Option<bool>,
        #[arg(long)]
        share_health: Option<bool>,
        #[arg(long)]
        share_mood: Option<bool>,
        #[arg(long)]
        share_habits: Option<bool>,
    },
    /// Unlocked achievements and catalog progress
    Achievements,
    /// Recent activity feed
    Activity {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Take experience away, lowering the level if needed
    RemoveXp {
        points: u64,
    },
}

pub fn run(action: ProfileAction) -> CmdResult {
    let mut app = SelfCare::open()?;
    match action {
        ProfileAction::Show => {
            let user = app.user();
            let next = app.config().experience.level_step * u64::from(user.level + 1);
            print_json(&serde_json::json!({
                "user": user,
                "nextLevelAt": next,
            }))
        }
        ProfileAction::Set {
            name,
            email,
            notifications,
            reminder_time,
            weekly_report,
            share_health,
            share_mood,
            share_habits,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                notifications_enabled: notifications,
                daily_reminder_time: reminder_time,
                weekly_report_enabled: weekly_report,
                share_health_data: share_health,
                share_mood_data: share_mood,
                share_habit_data: share_habits,
            };
            let user = app.update_profile(update)?;
            print_json(user)
        }
        ProfileAction::Achievements => {
            let catalog = app.achievement_catalog();
            print_json(&serde_json::json!({
                "unlocked": app.user().achievements,
                "catalog": catalog,
                "catalogUnlocked": catalog.unlocked_count(),
            }))
        }
        ProfileAction::Activity { limit } => {
            let items = app.activities().items();
            print_json(&items[..limit.min(items.len())])
        }
        ProfileAction::RemoveXp { points } => {
            app.remove_experience(points);
            let user = app.user().clone();
            print_with_events(&mut app, serde_json::json!({
                "level": user.level,
                "experience": user.experience,
            }))
        }
    }
}
