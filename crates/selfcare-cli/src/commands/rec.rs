use clap::Subcommand;
use selfcare_core::model::{Category, Priority, Recommendation, RecommendationType, TimeRange};
use selfcare_core::SelfCare;
use uuid::Uuid;

use super::{parse_enum, print_json, print_with_events, CmdResult};

#[derive(Subcommand)]
pub enum RecAction {
    /// Ranked recommendations for a part of the day
    List {
        /// anytime, morning, afternoon or evening
        #[arg(value_parser = parse_enum::<TimeRange>)]
        time_range: TimeRange,
        /// Defaults to recommendations.default_limit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Every recommendation in the catalog
    All,
    /// Add a recommendation to the catalog
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// activity, challenge, article, meditation, exercise or journaling
        #[arg(long = "type", default_value = "activity", value_parser = parse_enum::<RecommendationType>)]
        rec_type: RecommendationType,
        #[arg(long, default_value = "mindfulness", value_parser = parse_enum::<Category>)]
        category: Category,
        #[arg(long, default_value = "anytime", value_parser = parse_enum::<TimeRange>)]
        time_range: TimeRange,
        /// Minutes
        #[arg(long, default_value_t = 10)]
        duration: u32,
        /// low, medium or high
        #[arg(long, default_value = "medium", value_parser = parse_enum::<Priority>)]
        priority: Priority,
    },
    /// Rate a recommendation
    Feedback {
        id: Uuid,
        /// Mark it as not helpful
        #[arg(long)]
        not_helpful: bool,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Create a challenge tailored to the latest mood entry
    Challenge,
}

pub fn run(action: RecAction) -> CmdResult {
    let mut app = SelfCare::open()?;
    match action {
        RecAction::List { time_range, limit } => {
            print_json(&app.recommendations(time_range, limit))?;
        }
        RecAction::All => print_json(app.all_recommendations())?,
        RecAction::Add {
            title,
            description,
            rec_type,
            category,
            time_range,
            duration,
            priority,
        } => {
            let recommendation = Recommendation::new(
                title,
                description,
                rec_type,
                category,
                time_range,
                duration,
                app.now(),
            )
            .with_priority(priority);
            let id = app.add_recommendation(recommendation)?;
            println!("{id}");
        }
        RecAction::Feedback {
            id,
            not_helpful,
            comment,
        } => {
            let score = app.give_feedback(&id, !not_helpful, comment)?;
            print_with_events(&mut app, serde_json::json!({ "engagementScore": score }))?;
        }
        RecAction::Challenge => match app.create_adaptive_challenge() {
            Some(challenge) => print_json(&challenge)?,
            None => return Err("log a mood first".into()),
        },
    }
    Ok(())
}
