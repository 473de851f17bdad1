use clap::Subcommand;
use selfcare_core::model::{EnergyLevel, Mood, MoodActivity};
use selfcare_core::{ReportRange, SelfCare};

use super::{parse_enum, print_json, print_with_events, CmdResult};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Log how you feel right now
    Log {
        /// happy, neutral, sad, anxious or angry
        #[arg(value_parser = parse_enum::<Mood>)]
        mood: Mood,
        /// low, medium or high
        #[arg(long, default_value = "medium", value_parser = parse_enum::<EnergyLevel>)]
        energy: EnergyLevel,
        /// Activity tag; repeat for several
        #[arg(long = "activity", value_parser = parse_enum::<MoodActivity>)]
        activities: Vec<MoodActivity>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List entries, optionally limited to a week, month or year
    List {
        #[arg(long, value_parser = parse_enum::<ReportRange>)]
        range: Option<ReportRange>,
    },
    /// Averages, patterns and insights
    Summary,
    /// Large swings between consecutive entries of the past week
    Changes,
}

pub fn run(action: MoodAction) -> CmdResult {
    let mut app = SelfCare::open()?;
    match action {
        MoodAction::Log {
            mood,
            energy,
            activities,
            notes,
        } => {
            let entry = app.log_mood(mood, energy, activities.into_iter().collect(), notes);
            print_with_events(&mut app, entry)?;
        }
        MoodAction::List { range } => print_json(&app.mood_entries(range))?,
        MoodAction::Summary => print_json(&app.mood_summary())?,
        MoodAction::Changes => print_json(&app.mood_changes())?,
    }
    Ok(())
}
