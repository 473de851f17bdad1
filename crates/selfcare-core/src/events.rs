use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Mood;

/// Every user-visible state change produces an Event.
/// The UI drains them after each call; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCompleted {
        habit_id: Uuid,
        habit_name: String,
        streak: u32,
        at: DateTime<Utc>,
    },
    StreakMilestone {
        habit_id: Uuid,
        habit_name: String,
        streak: u32,
        at: DateTime<Utc>,
    },
    ExperienceAwarded {
        points: u64,
        total: u64,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    LevelDown {
        level: u32,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        title: String,
        description: String,
        icon: String,
        at: DateTime<Utc>,
    },
    MoodLogged {
        entry_id: Uuid,
        mood: Mood,
        at: DateTime<Utc>,
    },
    FeedbackRecorded {
        recommendation_id: Uuid,
        is_helpful: bool,
        engagement_score: f64,
        at: DateTime<Utc>,
    },
}

/// Overlay shown by the UI after a level-up or unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub title: String,
    pub message: String,
    pub icon: String,
}

impl Event {
    pub fn celebration(&self) -> Option<Celebration> {
        match self {
            Event::LevelUp { level, .. } => Some(Celebration {
                title: "Level Up!".to_string(),
                message: format!("Congratulations! You've reached level {level}!"),
                icon: "star.circle.fill".to_string(),
            }),
            Event::AchievementUnlocked {
                description, icon, ..
            } => Some(Celebration {
                title: "Achievement Unlocked!".to_string(),
                message: description.clone(),
                icon: icon.clone(),
            }),
            _ => None,
        }
    }
}

/// Events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 256;

/// Pending events plus the most recent celebration (last write wins).
///
/// At most [`MAX_PENDING_EVENTS`] events are held; pushing past that drops
/// the oldest.
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<Event>,
    celebration: Option<Celebration>,
}

impl Outbox {
    pub fn push(&mut self, event: Event) {
        if let Some(c) = event.celebration() {
            self.celebration = Some(c);
        }
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..dropped);
            tracing::debug!(dropped, "outbox full, oldest events dropped");
        }
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[Event] {
        &self.events
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    pub fn dismiss_celebration(&mut self) -> Option<Celebration> {
        self.celebration.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_up_sets_celebration() {
        let mut outbox = Outbox::default();
        outbox.push(Event::ExperienceAwarded {
            points: 10,
            total: 10,
            at: Utc::now(),
        });
        assert!(outbox.celebration().is_none());

        outbox.push(Event::LevelUp {
            level: 2,
            at: Utc::now(),
        });
        let c = outbox.celebration().unwrap();
        assert_eq!(c.title, "Level Up!");
        assert!(c.message.contains("level 2"));
    }

    #[test]
    fn latest_celebration_wins() {
        let mut outbox = Outbox::default();
        outbox.push(Event::LevelUp {
            level: 2,
            at: Utc::now(),
        });
        outbox.push(Event::AchievementUnlocked {
            title: "Perfect Week".to_string(),
            description: "All done".to_string(),
            icon: "calendar".to_string(),
            at: Utc::now(),
        });
        assert_eq!(outbox.celebration().unwrap().title, "Achievement Unlocked!");
        assert_eq!(outbox.dismiss_celebration().unwrap().message, "All done");
        assert!(outbox.celebration().is_none());
    }

    #[test]
    fn drain_empties_queue() {
        let mut outbox = Outbox::default();
        outbox.push(Event::LevelDown {
            level: 1,
            at: Utc::now(),
        });
        assert_eq!(outbox.drain().len(), 1);
        assert!(outbox.pending().is_empty());
    }

    #[test]
    fn undrained_queue_keeps_newest() {
        let mut outbox = Outbox::default();
        for level in 0..(MAX_PENDING_EVENTS as u32 + 40) {
            outbox.push(Event::LevelDown {
                level,
                at: Utc::now(),
            });
        }
        let pending = outbox.pending();
        assert_eq!(pending.len(), MAX_PENDING_EVENTS);
        assert!(matches!(pending[0], Event::LevelDown { level: 40, .. }));
    }

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_value(Event::LevelUp {
            level: 3,
            at: Utc::now(),
        })
        .unwrap();
        assert_eq!(json["type"], "LevelUp");
    }
}
