//! Contract between the navigation engine and whatever draws the menu.

use crate::core::MenuError;
use crate::models::{NavigationState, Page};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One line of feedback shown under the menu until the next key is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Snapshot of everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MenuView<'a> {
    pub page: &'a Page,
    pub state: &'a NavigationState,
    pub status: Option<&'a Status>,
    pub can_go_back: bool,
}

pub trait Renderer {
    /// Draws a full frame. Called after every processed event and after a resize.
    fn render(&mut self, view: &MenuView<'_>) -> io::Result<()>;

    /// Receives non-fatal errors raised while handling an event.
    fn report(&mut self, error: &MenuError) {
        let _ = error;
    }

    /// New terminal dimensions; the next `render` lays out for them.
    fn resize(&mut self, width: u16, height: u16) {
        let _ = (width, height);
    }
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, view: &MenuView<'_>) -> io::Result<()> {
        (**self).render(view)
    }

    fn report(&mut self, error: &MenuError) {
        (**self).report(error)
    }

    fn resize(&mut self, width: u16, height: u16) {
        (**self).resize(width, height)
    }
}
