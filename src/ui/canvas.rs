use iced::widget::canvas::{self, Program};
use iced::mouse::{self, Cursor};
use iced::touch;
use iced::{Rectangle, Renderer, Theme};

use super::gesture::{SwipeTracker, TapZones};
use crate::Message;

/// Transparent surface stacked over the story image.
/// Turns clicks and horizontal swipes into navigation messages.
///
/// Tap zones are measured against the canvas bounds, which span the full
/// window width in the viewer layout. A narrower surface narrows the zones.
pub struct GestureSurface {
    pub zones: TapZones,
    /// Minimum swipe distance in logical pixels
    pub swipe_threshold: f32,
}

impl Program<Message> for GestureSurface {
    type State = SwipeState;

    fn draw(
        &self,
        _state: &Self::State,
        _renderer: &Renderer,
        _theme: &Theme,
        _bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        // Nothing to paint, the image underneath is the content
        vec![]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Click: left zone goes back, the rest goes forward
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    let direction = self.zones.direction(pos.x, bounds.width);
                    return (canvas::event::Status::Captured, Some(Message::Navigate(direction)));
                }
            }

            canvas::Event::Touch(touch::Event::FingerPressed { position, .. }) => {
                if bounds.contains(position) {
                    state.swipe.begin(position.x);
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Touch(touch::Event::FingerMoved { position, .. }) => {
                state.swipe.update(position.x);
            }

            canvas::Event::Touch(touch::Event::FingerLifted { .. }) => {
                if let Some(direction) = state.swipe.finish(self.swipe_threshold) {
                    return (canvas::event::Status::Captured, Some(Message::Navigate(direction)));
                }
            }

            canvas::Event::Touch(touch::Event::FingerLost { .. }) => {
                state.swipe.cancel();
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}

/// State for an in-progress touch gesture
#[derive(Debug, Clone, Default)]
pub struct SwipeState {
    pub swipe: SwipeTracker,
}
