//! Core types shared by the input subsystem and the navigation engine.

pub mod error;
pub mod event;

pub use error::{ActionError, ConfigError, MenuError, Result};
pub use event::{InputEvent, KeyEvent};
