//! # SelfCare Core Library
//!
//! This library provides the core logic of the SelfCare wellness app: habit
//! tracking, mood logging, gamification and recommendations. All operations
//! are reachable from the standalone CLI binary; a mobile or desktop shell
//! would be a thin layer over the same [`SelfCare`] facade.
//!
//! ## Architecture
//!
//! - **Habit Engine**: habit collection, daily completion and reports
//! - **Gamification**: experience, levels, streaks and achievement unlocks
//! - **Mood Engine**: append-only mood log with weekday and activity patterns
//! - **Recommendations**: ranked catalog, engagement scoring, adaptive challenges
//!   and activity/notification personalization
//! - **Storage**: SQLite key-value documents and TOML configuration
//!
//! ## Key Components
//!
//! - [`SelfCare`]: Application facade owning every engine
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management
//! - [`Event`]: Notifications produced for the UI

pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod gamification;
pub mod habits;
pub mod model;
pub mod mood;
pub mod recommend;
pub mod storage;

pub use app::{ProfileUpdate, SelfCare};
pub use clock::{DayClock, ReportRange};
pub use error::{ConfigError, CoreError, DecodeError, StorageError, ValidationError};
pub use events::{Celebration, Event, Outbox};
pub use gamification::{AchievementCatalog, CompletionAward, Gamification};
pub use habits::{CompletionSummary, HabitEngine};
pub use mood::{MoodEngine, MoodSummary};
pub use recommend::{PersonalizationEngine, RecommendationEngine};
pub use storage::{Config, Database, KeyValueStore};
