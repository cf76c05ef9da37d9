use iced::widget::{column, container, text};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

mod config;
mod error;
mod media;
mod state;
mod ui;

use config::StoryConfig;
use error::UploadError;
use media::normalize::{self, IMAGE_EXTENSIONS};
use state::clock::SystemClock;
use state::library::{KeyValueStore, MemoryStore, SqliteStore};
use state::session::StorySession;
use state::store::StoryStore;
use state::viewer::{Direction, Transition};
use ui::ImageCache;

/// Main application state
struct Stories {
    /// Story collection and viewer
    session: StorySession,
    /// Decoded images for the tray and the viewer
    images: ImageCache,
    config: StoryConfig,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "add" bubble
    AddStory,
    /// Background normalization of a picked file finished
    UploadProcessed(Result<String, UploadError>),
    /// User clicked the bubble at this index
    OpenStory(usize),
    /// Progress timer fired for the given ticket
    Tick(u64),
    /// Tap or swipe on the viewer surface
    Navigate(Direction),
    DeleteCurrent,
    CloseViewer,
}

impl Stories {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = StoryConfig::load_or_default();

        // Without a database the app still works, it just forgets on exit
        let backend: Box<dyn KeyValueStore> = match SqliteStore::open_default() {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::error!("❌ Failed to open story database, using memory only: {}", e);
                Box::new(MemoryStore::new())
            }
        };

        let store = StoryStore::load(backend, Box::new(SystemClock), config.retention_ms());
        let session = StorySession::new(store, config.timing());

        let mut images = ImageCache::default();
        images.sync(session.stories());

        tracing::info!("🎨 Stories initialized with {} stories", session.stories().len());

        (
            Stories {
                session,
                images,
                config,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddStory => {
                // Show the native file picker, images only
                let file = FileDialog::new()
                    .set_title("Select an image for your story")
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file();

                if let Some(path) = file {
                    return Task::perform(
                        normalize::load_upload(path, self.config.normalize_options()),
                        Message::UploadProcessed,
                    );
                }

                Task::none()
            }
            Message::UploadProcessed(result) => {
                match self.session.accept_upload(result) {
                    Ok(_) => self.images.sync(self.session.stories()),
                    Err(e) => {
                        tracing::warn!("⚠️  Upload rejected: {}", e);
                        show_alert(&e);
                    }
                }
                Task::none()
            }
            Message::OpenStory(index) => {
                self.session.open(index);
                Task::none()
            }
            Message::Tick(ticket) => {
                self.session.tick(ticket);
                Task::none()
            }
            Message::Navigate(direction) => {
                self.session.navigate(direction);
                Task::none()
            }
            Message::DeleteCurrent => {
                if self.session.delete_current() != Transition::Unchanged {
                    self.images.sync(self.session.stories());
                }
                Task::none()
            }
            Message::CloseViewer => {
                self.session.close();
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if self.session.viewer().is_open() {
            return ui::viewer::view(&self.session, &self.images, &self.config);
        }

        let content = column![
            text("Stories").size(32),
            ui::tray::view(self.session.stories(), &self.images),
        ]
        .spacing(20)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// The progress timer runs only while the viewer is open. A new ticket
    /// is a new subscription, so changing stories restarts the cycle.
    fn subscription(&self) -> Subscription<Message> {
        match self.session.viewer().ticket() {
            Some(ticket) => iced::time::every(self.config.tick_interval())
                .with(ticket)
                .map(|(ticket, _)| Message::Tick(ticket)),
            None => Subscription::none(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Blocking alert for a failed upload
fn show_alert(error: &UploadError) {
    let title = match error {
        UploadError::Oversized { .. } => "File too large",
        UploadError::ImageProcessing(_) | UploadError::Read(_) => "Upload failed",
    };

    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(error.to_string())
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    iced::application("Stories", Stories::update, Stories::view)
        .subscription(Stories::subscription)
        .theme(Stories::theme)
        .centered()
        .run_with(Stories::new)
}
