use clap::Subcommand;
use selfcare_core::{ReportRange, SelfCare};

use super::{parse_enum, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Completion rates, longest streak and most consistent habit
    Summary,
    /// Completed days per habit within a week, month or year
    Data {
        #[arg(long, default_value = "week", value_parser = parse_enum::<ReportRange>)]
        range: ReportRange,
    },
}

pub fn run(action: ReportAction) -> CmdResult {
    let app = SelfCare::open()?;
    match action {
        ReportAction::Summary => print_json(&app.completion_summary()),
        ReportAction::Data { range } => print_json(&app.completion_data(range)),
    }
}
