/// State management module
///
/// This module handles all application state, including:
/// - The story record (data.rs)
/// - Clock access (clock.rs)
/// - The key-value persistence backends (library.rs)
/// - The story collection with retention (store.rs)
/// - The viewer state machine (viewer.rs)
/// - The session tying store and viewer together (session.rs)

pub mod clock;
pub mod data;
pub mod library;
pub mod session;
pub mod store;
pub mod viewer;
