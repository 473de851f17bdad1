use clap::Subcommand;
use selfcare_core::model::{Category, Habit, HabitType, TimeRange};
use selfcare_core::SelfCare;
use uuid::Uuid;

use super::{parse_enum, print_json, print_with_events, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits
    List {
        /// Only habits scheduled for today
        #[arg(long)]
        today: bool,
    },
    /// Show one habit with its streak
    Show {
        id: Uuid,
    },
    /// Add a habit
    Add {
        /// Habit name
        name: String,
        #[arg(long, default_value = "⭐")]
        emoji: String,
        /// health, mindfulness, productivity, fitness, learning or social
        #[arg(long, default_value = "health", value_parser = parse_enum::<Category>)]
        category: Category,
        /// build, quit or maintain
        #[arg(long = "type", default_value = "build", value_parser = parse_enum::<HabitType>)]
        habit_type: HabitType,
        /// Scheduled weekdays, 1 = Sunday .. 7 = Saturday
        #[arg(long, value_delimiter = ',', default_value = "1,2,3,4,5,6,7")]
        days: Vec<u8>,
        /// anytime, morning, afternoon or evening
        #[arg(long, default_value = "anytime", value_parser = parse_enum::<TimeRange>)]
        time_range: TimeRange,
    },
    /// Mark a habit completed for today
    Toggle {
        id: Uuid,
    },
    /// Delete a habit (earned experience and streaks are kept)
    Delete {
        id: Uuid,
    },
    /// Reset a habit's streak to zero
    ResetStreak {
        id: Uuid,
    },
    /// Add the starter habits when none exist
    Samples,
}

pub fn run(action: HabitAction) -> CmdResult {
    let mut app = SelfCare::open()?;
    match action {
        HabitAction::List { today } => {
            if today {
                print_json(&app.todays_habits())?;
            } else {
                print_json(app.habits())?;
            }
        }
        HabitAction::Show { id } => {
            let habit = app
                .habit(&id)
                .ok_or_else(|| format!("habit not found: {id}"))?;
            print_json(&serde_json::json!({
                "habit": habit,
                "streak": app.user().streak(&id).unwrap_or(0),
                "completedToday": app.is_completed_today(&id),
            }))?;
        }
        HabitAction::Add {
            name,
            emoji,
            category,
            habit_type,
            days,
            time_range,
        } => {
            let start = app.clock().day_of(app.now());
            let mut habit = Habit::new(name, start)
                .with_emoji(emoji)
                .with_category(category)
                .with_task_days(days)
                .with_time_range(time_range);
            habit.habit_type = habit_type;
            let id = app.add_habit(habit)?;
            println!("{id}");
        }
        HabitAction::Toggle { id } => {
            let award = app.toggle_habit(&id)?;
            if award.is_none() {
                eprintln!("already completed today");
            }
            print_with_events(&mut app, award)?;
        }
        HabitAction::Delete { id } => {
            let removed = app.delete_habit(&id)?;
            println!("deleted: {}", removed.name);
        }
        HabitAction::ResetStreak { id } => {
            app.reset_streak(&id)?;
            println!("streak reset");
        }
        HabitAction::Samples => {
            let added = app.add_sample_habits();
            println!("added {added} sample habits");
        }
    }
    Ok(())
}
