use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line in the "recent activity" feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub timestamp: DateTime<Utc>,
    pub icon: String,
}

impl ActivityItem {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: subtitle.into(),
            timestamp,
            icon: icon.into(),
        }
    }
}

/// Most-recent-first feed with a fixed capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityFeed(Vec<ActivityItem>);

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front; drop the oldest items beyond `cap`.
    pub fn push(&mut self, item: ActivityItem, cap: usize) {
        self.0.insert(0, item);
        self.0.truncate(cap);
    }

    pub fn items(&self) -> &[ActivityItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn latest(&self) -> Option<&ActivityItem> {
        self.0.first()
    }
}
