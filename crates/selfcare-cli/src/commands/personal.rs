//! Personalization commands: activity attempts, notification outcomes and
//! the suggestions derived from them.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use selfcare_core::model::NotificationType;
use selfcare_core::recommend::CompletionStatus;
use selfcare_core::SelfCare;

use super::{parse_enum, print_json, CmdResult};

#[derive(Subcommand)]
pub enum PersonalAction {
    /// Record an attempted activity
    Record {
        activity: String,
        /// Minutes spent
        duration: u32,
        /// 0.0 - 1.0
        engagement: f64,
        /// completed, skipped or partiallyCompleted
        #[arg(long, default_value = "completed", value_parser = parse_enum::<CompletionStatus>)]
        status: CompletionStatus,
    },
    /// Set the stored engagement for an activity
    Engagement {
        activity: String,
        /// 0.0 - 1.0
        value: f64,
    },
    /// Record a sent notification
    Notify {
        /// activityReminder, moodCheck, progressUpdate or challengeReminder
        #[arg(value_parser = parse_enum::<NotificationType>)]
        kind: NotificationType,
        #[arg(long)]
        opened: bool,
        /// Seconds until it was opened
        #[arg(long)]
        response_seconds: Option<u32>,
    },
    /// Set the quiet window (hours 0-23; start > end wraps past midnight)
    QuietHours {
        start: u32,
        end: u32,
    },
    /// Hour at which an activity most often went well
    Optimal {
        activity: String,
    },
    /// Activities worth suggesting right now
    Suggest,
    /// Today's notification plan
    Schedule,
    /// Content format to offer for an activity
    Content {
        activity: String,
    },
    /// Whether a notification may be sent (RFC 3339 time, default now)
    ShouldNotify {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Preferences and notification response rate
    Show,
}

pub fn run(action: PersonalAction) -> CmdResult {
    let mut app = SelfCare::open()?;
    match action {
        PersonalAction::Record {
            activity,
            duration,
            engagement,
            status,
        } => {
            app.record_activity(&activity, duration, engagement, status)?;
            println!("ok");
        }
        PersonalAction::Engagement { activity, value } => {
            app.update_activity_engagement(&activity, value)?;
            println!("ok");
        }
        PersonalAction::Notify {
            kind,
            opened,
            response_seconds,
        } => {
            app.record_notification(kind, opened, response_seconds);
            println!("ok");
        }
        PersonalAction::QuietHours { start, end } => {
            app.set_quiet_hours(start, end)?;
            println!("ok");
        }
        PersonalAction::Optimal { activity } => match app.optimal_hour_for_activity(&activity) {
            Some(hour) => println!("{hour}"),
            None => println!("no successful attempts recorded for {activity}"),
        },
        PersonalAction::Suggest => print_json(&app.activity_recommendations())?,
        PersonalAction::Schedule => print_json(&app.notification_schedule())?,
        PersonalAction::Content { activity } => print_json(&app.adapted_content(&activity))?,
        PersonalAction::ShouldNotify { at } => {
            let at = at.unwrap_or_else(|| app.now());
            println!("{}", app.should_send_notification(at));
        }
        PersonalAction::Show => print_json(&serde_json::json!({
            "preferences": app.preferences(),
            "notificationResponseRate": app.notification_response_rate(),
        }))?,
    }
    Ok(())
}
