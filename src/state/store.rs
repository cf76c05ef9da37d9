/// The story collection and its persistence
///
/// The in-memory `Vec<Story>` is the single source of truth. It is
/// hydrated once from the key-value store and every mutation writes the
/// whole collection back under one key.

use uuid::Uuid;

use super::clock::Clock;
use super::data::Story;
use super::library::KeyValueStore;
use crate::error::StorageError;

/// Key under which the serialized collection lives
pub const STORAGE_KEY: &str = "user_stories";

pub struct StoryStore {
    backend: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    stories: Vec<Story>,
    retention_ms: i64,
}

impl StoryStore {
    /// Hydrate the collection, dropping expired and duplicate entries.
    ///
    /// Missing or corrupt data yields an empty collection. The filtered
    /// collection is written back once so that stale entries do not
    /// linger in storage.
    pub fn load(
        backend: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        retention_ms: i64,
    ) -> Self {
        let mut store = Self {
            backend,
            clock,
            stories: Vec::new(),
            retention_ms,
        };

        let persisted = match store.read_persisted() {
            Ok(stories) => stories,
            Err(e) => {
                tracing::warn!("⚠️  Failed to parse stories, starting empty: {}", e);
                Vec::new()
            }
        };

        let total = persisted.len();
        let now = store.clock.now_ms();
        let mut live: Vec<Story> = Vec::with_capacity(total);
        for story in persisted {
            if story.age_ms(now) >= retention_ms {
                continue;
            }
            if live.iter().any(|s| s.id == story.id) {
                tracing::warn!("⚠️  Dropping duplicate story id {}", story.id);
                continue;
            }
            live.push(story);
        }

        if live.len() < total {
            tracing::info!("🧹 Dropped {} expired or duplicate stories", total - live.len());
        }
        tracing::info!("📚 Loaded {} stories", live.len());

        store.stories = live;
        store.persist();
        store
    }

    /// Read and parse the persisted collection (empty when absent)
    fn read_persisted(&self) -> Result<Vec<Story>, StorageError> {
        match self.backend.get(STORAGE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the persisted blob with the whole collection.
    /// Failures are logged; the in-memory collection stays authoritative.
    fn persist(&mut self) {
        let result = serde_json::to_string(&self.stories)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(STORAGE_KEY, &json));

        if let Err(e) = result {
            tracing::warn!("⚠️  Failed to persist stories: {}", e);
        }
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Append a new story for `image` and persist
    pub fn add(&mut self, image: String) -> Story {
        let id = self.fresh_id();
        let story = Story::new(id, image, self.clock.now_ms());

        self.stories.push(story.clone());
        self.persist();

        tracing::info!("➕ Added story {} ({} total)", story.id, self.stories.len());
        story
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.stories.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }

    /// Remove the story with `id` (if present) and persist
    pub fn delete(&mut self, id: &str) {
        let before = self.stories.len();
        self.stories.retain(|s| s.id != id);

        if self.stories.len() < before {
            tracing::info!("🗑️  Deleted story {} ({} left)", id, self.stories.len());
        }
        self.persist();
    }

    /// Flag a story as viewed. Returns true when the flag changed.
    pub fn mark_seen(&mut self, id: &str) -> bool {
        let Some(story) = self.stories.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if story.seen {
            return false;
        }

        story.seen = true;
        self.persist();
        true
    }

    #[cfg(test)]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for StoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryStore")
            .field("stories", &self.stories.len())
            .field("retention_ms", &self.retention_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clock::ManualClock;
    use crate::state::library::MemoryStore;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    const NOW: i64 = 1_700_000_000_000;

    fn backend_with(json: &str) -> Box<MemoryStore> {
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, json).unwrap();
        Box::new(backend)
    }

    fn persisted(store: &StoryStore) -> Vec<Story> {
        let json = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_load_drops_expired_stories() {
        let json = format!(
            r#"[
                {{"id":"fresh","image":"a","timestamp":{},"seen":false}},
                {{"id":"edge","image":"b","timestamp":{},"seen":false}},
                {{"id":"old","image":"c","timestamp":{},"seen":true}},
                {{"id":"almost","image":"d","timestamp":{},"seen":false}}
            ]"#,
            NOW - 1000,
            NOW - DAY_MS,
            NOW - 2 * DAY_MS,
            NOW - DAY_MS + 1,
        );

        let store = StoryStore::load(backend_with(&json), Box::new(ManualClock::at(NOW)), DAY_MS);

        let ids: Vec<&str> = store.stories().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "almost"]);
        for story in store.stories() {
            assert!(NOW - story.timestamp < DAY_MS);
        }

        // The filtered collection is written back
        assert_eq!(persisted(&store).len(), 2);
    }

    #[test]
    fn test_load_corrupt_data_is_empty() {
        let store = StoryStore::load(
            backend_with("{ definitely not json"),
            Box::new(ManualClock::at(NOW)),
            DAY_MS,
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_missing_data_is_empty() {
        let store = StoryStore::load(
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::at(NOW)),
            DAY_MS,
        );
        assert!(store.is_empty());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_load_minimum_timestamp_is_expired() {
        let json = format!(
            r#"[{{"id":"x","image":"a","timestamp":-9223372036854775808,"seen":false}},
                {{"id":"y","image":"b","timestamp":{},"seen":false}}]"#,
            NOW
        );
        let store = StoryStore::load(backend_with(&json), Box::new(ManualClock::at(NOW)), DAY_MS);

        let ids: Vec<&str> = store.stories().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["y"]);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let json = format!(
            r#"[{{"id":"x","image":"a","timestamp":{now},"seen":false}},
                {{"id":"x","image":"b","timestamp":{now},"seen":false}}]"#,
            now = NOW
        );
        let store = StoryStore::load(backend_with(&json), Box::new(ManualClock::at(NOW)), DAY_MS);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stories()[0].image, "a");
    }

    #[test]
    fn test_add_appends_with_unique_id() {
        let clock = ManualClock::at(NOW);
        let mut store = StoryStore::load(Box::new(MemoryStore::new()), Box::new(clock.clone()), DAY_MS);

        let first = store.add("one".into());
        clock.advance(10);
        let second = store.add("two".into());

        assert_ne!(first.id, second.id);
        assert_eq!(store.stories().last(), Some(&second));
        assert_eq!(second.timestamp, NOW + 10);
        assert!(!second.seen);
        assert_eq!(persisted(&store), store.stories().to_vec());
    }

    #[test]
    fn test_delete_persists() {
        let mut store = StoryStore::load(
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::at(NOW)),
            DAY_MS,
        );
        let a = store.add("a".into());
        let b = store.add("b".into());

        store.delete(&a.id);
        assert_eq!(store.stories(), &[b.clone()]);
        assert_eq!(persisted(&store), vec![b]);

        // Unknown ids are a no-op
        store.delete("nope");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_mark_seen_only_once() {
        let mut store = StoryStore::load(
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::at(NOW)),
            DAY_MS,
        );
        let story = store.add("a".into());

        assert!(store.mark_seen(&story.id));
        assert!(!store.mark_seen(&story.id));
        assert!(persisted(&store)[0].seen);
        assert!(!store.mark_seen("unknown"));
    }

    #[test]
    fn test_reload_round_trip_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stories.db");
        let clock = ManualClock::at(NOW);

        let added = {
            let backend = crate::state::library::SqliteStore::open(&path).unwrap();
            let mut store = StoryStore::load(Box::new(backend), Box::new(clock.clone()), DAY_MS);
            store.add("payload".into())
        };

        let backend = crate::state::library::SqliteStore::open(&path).unwrap();
        let store = StoryStore::load(Box::new(backend), Box::new(clock.clone()), DAY_MS);
        assert_eq!(store.stories(), &[added]);

        // A day later the story is gone on the next load
        clock.advance(DAY_MS);
        let backend = crate::state::library::SqliteStore::open(&path).unwrap();
        let store = StoryStore::load(Box::new(backend), Box::new(clock), DAY_MS);
        assert!(store.is_empty());
    }
}
