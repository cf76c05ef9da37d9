/// Story viewer state machine
///
/// The viewer is either `Closed` or `Showing` one index of the collection
/// with a progress percentage. It never holds stories itself: every
/// operation receives the current collection length.
///
/// The repeating progress timer is modelled as a ticket (`generation`).
/// Any transition that changes what is displayed, or closes the viewer,
/// issues a new ticket. Ticks carrying an older ticket are ignored, which
/// is how a running timer gets cancelled and restarted.

/// Navigation command shared by the tap zones and the swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Auto-advance timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long one story is displayed
    pub story_duration_ms: u64,
    /// Timer period
    pub tick_interval_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            story_duration_ms: 5000,
            tick_interval_ms: 100,
        }
    }
}

impl Timing {
    /// Progress gained per tick, in percent
    pub fn progress_step(&self) -> f32 {
        100.0 / (self.story_duration_ms as f32 / self.tick_interval_ms as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerState {
    Closed,
    Showing { index: usize, progress: f32 },
}

/// What a viewer operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing observable changed
    Unchanged,
    /// Same story, more progress
    Progressed,
    /// A (possibly different) story is displayed from 0%
    Moved(usize),
    /// The viewer closed
    Closed,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    state: ViewerState,
    generation: u64,
    /// Collection length last observed while showing
    len: usize,
    step: f32,
}

impl Viewer {
    pub fn new(timing: Timing) -> Self {
        Self {
            state: ViewerState::Closed,
            generation: 0,
            len: 0,
            step: timing.progress_step(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Showing { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            ViewerState::Showing { index, .. } => Some(index),
            ViewerState::Closed => None,
        }
    }

    pub fn progress(&self) -> f32 {
        match self.state {
            ViewerState::Showing { progress, .. } => progress,
            ViewerState::Closed => 0.0,
        }
    }

    /// Ticket of the active timer, `None` when no timer should run
    pub fn ticket(&self) -> Option<u64> {
        self.is_open().then_some(self.generation)
    }

    /// Open at `index` of a collection of `len` stories.
    /// An empty collection closes immediately.
    pub fn open(&mut self, index: usize, len: usize) -> Transition {
        if len == 0 {
            return self.close();
        }

        self.len = len;
        self.restart(index.min(len - 1))
    }

    pub fn close(&mut self) -> Transition {
        if self.is_open() {
            tracing::debug!("viewer closed");
        }
        self.state = ViewerState::Closed;
        self.generation += 1;
        Transition::Closed
    }

    /// One timer firing
    pub fn tick(&mut self, ticket: u64, len: usize) -> Transition {
        if !self.is_open() || ticket != self.generation {
            return Transition::Unchanged;
        }

        let observed = self.observe_len(len);
        if observed != Transition::Unchanged {
            return observed;
        }

        let ViewerState::Showing { index, progress } = self.state else {
            return Transition::Unchanged;
        };

        if progress >= 100.0 {
            return self.advance(index, len);
        }

        self.state = ViewerState::Showing {
            index,
            progress: (progress + self.step).min(100.0),
        };
        Transition::Progressed
    }

    /// Manual navigation. "Previous" on the first story does nothing;
    /// "next" on the last story closes.
    pub fn navigate(&mut self, direction: Direction, len: usize) -> Transition {
        if !self.is_open() {
            return Transition::Unchanged;
        }
        if self.observe_len(len) == Transition::Closed {
            return Transition::Closed;
        }

        let Some(index) = self.index() else {
            return Transition::Unchanged;
        };

        match direction {
            Direction::Previous if index > 0 => self.restart(index - 1),
            Direction::Previous => Transition::Unchanged,
            Direction::Next => self.advance(index, len),
        }
    }

    /// React to the collection changing underneath the viewer.
    ///
    /// Empty → close. Shorter than the index → clamp to the last story.
    /// Any length change restarts the timer, because the story at the
    /// current index may be a different one now.
    pub fn observe_len(&mut self, len: usize) -> Transition {
        let Some(index) = self.index() else {
            return Transition::Unchanged;
        };

        if len == 0 {
            return self.close();
        }
        if len == self.len && index < len {
            return Transition::Unchanged;
        }

        self.len = len;
        self.restart(index.min(len - 1))
    }

    /// Fill level of each progress bar, one per story
    pub fn progress_bars(&self, len: usize) -> Vec<f32> {
        let Some(index) = self.index() else {
            return vec![0.0; len];
        };
        let progress = self.progress();

        (0..len)
            .map(|i| match i.cmp(&index) {
                std::cmp::Ordering::Less => 100.0,
                std::cmp::Ordering::Equal => progress,
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    fn advance(&mut self, index: usize, len: usize) -> Transition {
        if index + 1 < len {
            self.restart(index + 1)
        } else {
            self.close()
        }
    }

    fn restart(&mut self, index: usize) -> Transition {
        self.state = ViewerState::Showing {
            index,
            progress: 0.0,
        };
        self.generation += 1;
        tracing::debug!("viewer showing index {}", index);
        Transition::Moved(index)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}
