//! Headless menu core: actions, the render contract and the navigation state machine.

pub mod action;
pub mod navigation;
pub mod render;

pub use action::{ActionOutcome, ActionRegistry, ActionResult};
pub use navigation::{Flow, NavigationEngine, NavigationOptions};
pub use render::{MenuView, Renderer, Status, StatusKind};
