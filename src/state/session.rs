/// The story session: one store, one viewer.
///
/// This is the only thing the UI mutates. The viewer only ever sees the
/// store's current length, so it cannot drift from the collection.

use super::data::Story;
use super::store::StoryStore;
use super::viewer::{Direction, Timing, Transition, Viewer};
use crate::error::UploadError;

#[derive(Debug)]
pub struct StorySession {
    store: StoryStore,
    viewer: Viewer,
}

impl StorySession {
    pub fn new(store: StoryStore, timing: Timing) -> Self {
        Self {
            store,
            viewer: Viewer::new(timing),
        }
    }

    pub fn stories(&self) -> &[Story] {
        self.store.stories()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn now_ms(&self) -> i64 {
        self.store.now_ms()
    }

    /// The story the viewer is showing, if it is open
    pub fn current_story(&self) -> Option<&Story> {
        self.viewer.index().and_then(|i| self.store.get(i))
    }

    pub fn progress_bars(&self) -> Vec<f32> {
        self.viewer.progress_bars(self.store.len())
    }

    /// Store the result of a finished upload. Failed uploads never reach the store.
    pub fn accept_upload(&mut self, result: Result<String, UploadError>) -> Result<Story, UploadError> {
        let image = result?;
        Ok(self.add_story(image))
    }

    pub fn add_story(&mut self, image: String) -> Story {
        let story = self.store.add(image);
        self.settle(Transition::Unchanged);
        story
    }

    pub fn open(&mut self, index: usize) -> Transition {
        // Nothing to show: close instead of rendering an empty viewer
        if self.store.is_empty() {
            return self.viewer.close();
        }

        let transition = self.viewer.open(index, self.store.len());
        self.settle(transition)
    }

    pub fn close(&mut self) -> Transition {
        self.viewer.close()
    }

    pub fn tick(&mut self, ticket: u64) -> Transition {
        let transition = self.viewer.tick(ticket, self.store.len());
        self.settle(transition)
    }

    pub fn navigate(&mut self, direction: Direction) -> Transition {
        let transition = self.viewer.navigate(direction, self.store.len());
        self.settle(transition)
    }

    /// Delete whatever the viewer is showing
    pub fn delete_current(&mut self) -> Transition {
        let Some(id) = self.current_story().map(|s| s.id.clone()) else {
            return Transition::Unchanged;
        };
        self.delete_story(&id)
    }

    /// Delete any story; the viewer clamps or closes as needed
    pub fn delete_story(&mut self, id: &str) -> Transition {
        self.store.delete(id);
        let transition = self.viewer.observe_len(self.store.len());
        self.settle(transition)
    }

    /// Let the viewer catch up with the collection, then flag whatever is
    /// on screen as seen
    fn settle(&mut self, transition: Transition) -> Transition {
        let transition = match self.viewer.observe_len(self.store.len()) {
            Transition::Unchanged => transition,
            observed => observed,
        };

        if let Transition::Moved(index) = transition {
            if let Some(id) = self.store.get(index).map(|s| s.id.clone()) {
                self.store.mark_seen(&id);
            }
        }

        transition
    }
}
