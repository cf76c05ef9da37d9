/// User interface module
///
/// - `tray.rs` - the bubble row with the add control
/// - `viewer.rs` - the full-screen slideshow
/// - `canvas.rs` - the gesture surface over the slideshow image
/// - `gesture.rs` - tap zone and swipe thresholds

pub mod canvas;
pub mod gesture;
pub mod tray;
pub mod viewer;

use iced::widget::image::Handle;
use std::collections::HashMap;

use crate::media::normalize::decode_data_url;
use crate::state::data::Story;

/// Decoded image handles keyed by story id.
///
/// Payloads are decoded once per story instead of on every frame.
#[derive(Debug, Default)]
pub struct ImageCache {
    handles: HashMap<String, Handle>,
}

impl ImageCache {
    /// Match the cache to the current collection
    pub fn sync(&mut self, stories: &[Story]) {
        self.handles
            .retain(|id, _| stories.iter().any(|story| &story.id == id));

        for story in stories {
            if self.handles.contains_key(&story.id) {
                continue;
            }
            match decode_data_url(&story.image) {
                Some(bytes) => {
                    self.handles
                        .insert(story.id.clone(), Handle::from_bytes(bytes));
                }
                None => tracing::warn!("⚠️  Story {} has an unreadable image payload", story.id),
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Handle> {
        self.handles.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_follows_collection() {
        let a = Story::new("a".into(), "data:image/jpeg;base64,AAEC".into(), 0);
        let b = Story::new("b".into(), "data:image/jpeg;base64,AwQF".into(), 0);
        let broken = Story::new("c".into(), "not a data url".into(), 0);

        let mut cache = ImageCache::default();
        cache.sync(&[a.clone(), b.clone(), broken]);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_none());

        cache.sync(&[b]);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }
}
