/// Full-screen story viewer
///
/// Layout, top to bottom: one progress bar per story, a header with the
/// author, age and actions, then the image with the gesture surface on top.

use iced::widget::image::{Handle, Image};
use iced::widget::{
    button, column, container, horizontal_space, progress_bar, row, stack, text, Canvas, Row,
};
use iced::{Alignment, ContentFit, Element, Length};

use super::canvas::GestureSurface;
use super::gesture::TapZones;
use super::ImageCache;
use crate::config::StoryConfig;
use crate::state::session::StorySession;
use crate::Message;

/// Age label: whole seconds under a minute, whole minutes under an hour,
/// whole hours beyond that
pub fn time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    // Clock skew must not produce a negative age
    let seconds = (now_ms.saturating_sub(timestamp_ms) / 1000).max(0);
    if seconds < 60 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    format!("{}h", minutes / 60)
}

/// Build the viewer for whatever the session is showing
pub fn view<'a>(
    session: &'a StorySession,
    images: &'a ImageCache,
    config: &'a StoryConfig,
) -> Element<'a, Message> {
    let Some(story) = session.current_story() else {
        // The session closes the viewer before this can be rendered
        tracing::warn!(
            "⚠️  Viewer rendered without a current story ({} stories)",
            session.stories().len()
        );
        return container(text("")).into();
    };

    let bars = Row::with_children(session.progress_bars().into_iter().map(|fill| {
        progress_bar(0.0..=100.0, fill)
            .height(Length::Fixed(3.0))
            .into()
    }))
    .spacing(4)
    .padding(10);

    let header = row![
        text(story.author_label()).size(14),
        text(time_ago(story.timestamp, session.now_ms())).size(12),
        horizontal_space(),
        button(text("Delete"))
            .on_press(Message::DeleteCurrent)
            .style(button::danger),
        button(text("Close"))
            .on_press(Message::CloseViewer)
            .style(button::text),
    ]
    .spacing(10)
    .padding(10)
    .align_y(Alignment::Center);

    let picture: Element<'a, Message> = match images.get(&story.id) {
        Some(handle) => Image::<Handle>::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        None => container(text("Image unavailable"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    let surface = Canvas::new(GestureSurface {
        zones: TapZones {
            previous_fraction: config.previous_zone,
        },
        swipe_threshold: config.swipe_threshold,
    })
    .width(Length::Fill)
    .height(Length::Fill);

    let content = stack![picture, surface]
        .width(Length::Fill)
        .height(Length::Fill);

    column![bars, header, content]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
