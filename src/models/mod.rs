//! Menu data model: pages, entries and the navigation state over them.

pub mod menu;
pub mod state;

pub use menu::{Entry, Menu, Page};
pub use state::NavigationState;
