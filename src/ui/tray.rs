/// The story tray: an "add" bubble followed by one bubble per story
///
/// The tray has no state of its own; it is a projection of the collection.

use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, container, text, Row};
use iced::{Alignment, ContentFit, Element, Length};

use super::ImageCache;
use crate::state::data::Story;
use crate::Message;

/// Bubble diameter in logical pixels
const BUBBLE_SIZE: f32 = 64.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayItem {
    /// Always first
    Add,
    /// Opens the viewer at `index` of the current collection
    Bubble { index: usize, id: String, seen: bool },
}

pub fn tray_items(stories: &[Story]) -> Vec<TrayItem> {
    std::iter::once(TrayItem::Add)
        .chain(stories.iter().enumerate().map(|(index, story)| TrayItem::Bubble {
            index,
            id: story.id.clone(),
            seen: story.seen,
        }))
        .collect()
}

/// Build the tray row
pub fn view<'a>(stories: &'a [Story], images: &'a ImageCache) -> Element<'a, Message> {
    let bubbles = tray_items(stories).into_iter().map(|item| match item {
        TrayItem::Add => add_bubble(),
        TrayItem::Bubble { index, id, seen } => {
            let label = stories
                .get(index)
                .map(Story::author_label)
                .unwrap_or_default();
            story_bubble(index, images.get(&id), seen, label)
        }
    });

    Row::with_children(bubbles)
        .spacing(16)
        .padding(16)
        .align_y(Alignment::Start)
        .into()
}

fn add_bubble<'a>() -> Element<'a, Message> {
    let ring = button(
        container(text("+").size(32))
            .center_x(Length::Fixed(BUBBLE_SIZE))
            .center_y(Length::Fixed(BUBBLE_SIZE)),
    )
    .on_press(Message::AddStory)
    .padding(3);

    column![ring, text("Your Story").size(12)]
        .spacing(6)
        .align_x(Alignment::Center)
        .into()
}

fn story_bubble<'a>(
    index: usize,
    handle: Option<&Handle>,
    seen: bool,
    label: String,
) -> Element<'a, Message> {
    let thumbnail: Element<'a, Message> = match handle {
        Some(handle) => Image::<Handle>::new(handle.clone())
            .width(Length::Fixed(BUBBLE_SIZE))
            .height(Length::Fixed(BUBBLE_SIZE))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("?"))
            .center_x(Length::Fixed(BUBBLE_SIZE))
            .center_y(Length::Fixed(BUBBLE_SIZE))
            .into(),
    };

    // Seen stories get a muted ring
    let ring = button(thumbnail)
        .on_press(Message::OpenStory(index))
        .padding(3)
        .style(move |theme, status| {
            if seen {
                button::secondary(theme, status)
            } else {
                button::primary(theme, status)
            }
        });

    column![ring, text(label).size(12)]
        .spacing(6)
        .align_x(Alignment::Center)
        .into()
}
