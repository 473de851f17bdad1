pub mod config;
pub mod habit;
pub mod mood;
pub mod personal;
pub mod profile;
pub mod rec;
pub mod report;

use serde::de::DeserializeOwned;
use serde::Serialize;
use selfcare_core::SelfCare;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Parse a camelCase enum name ("happy", "activityReminder") the way it is stored.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|_| format!("unrecognized value: {s}"))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print `result` together with the events and celebration the call produced.
pub fn print_with_events<T: Serialize>(app: &mut SelfCare, result: T) -> CmdResult {
    let events = app.drain_events();
    let celebration = app.dismiss_celebration();
    print_json(&serde_json::json!({
        "result": result,
        "events": events,
        "celebration": celebration,
    }))
}
