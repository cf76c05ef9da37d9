/// Shared data structures for the application state
///
/// A `Story` is exactly what gets persisted: the serialized field names
/// are the persistence format.

use serde::{Deserialize, Serialize};

/// A single ephemeral image post
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Story {
    /// Unique identifier, assigned at creation
    pub id: String,
    /// Self-contained image payload (`data:image/jpeg;base64,...`)
    pub image: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Set once the viewer has displayed this story
    pub seen: bool,
}

impl Story {
    /// Build a fresh, unseen story
    pub fn new(id: String, image: String, timestamp: i64) -> Self {
        Self {
            id,
            image,
            timestamp,
            seen: false,
        }
    }

    /// Age in milliseconds relative to `now_ms`, saturating at the i64 bounds
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    /// Header label shown in the viewer, e.g. "User 3f2a"
    pub fn author_label(&self) -> String {
        let short: String = self.id.chars().take(4).collect();
        format!("User {}", short)
    }
}
