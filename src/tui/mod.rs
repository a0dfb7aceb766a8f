//! Terminal integration layer (crossterm + ratatui).
//!
//! Kept apart from `input`/`kernel` so the engine can be driven by other frontends, or by
//! tests, without depending on terminal crates.

pub mod render;
pub mod resize;
pub mod terminal_guard;

pub use render::{TerminalRenderer, Theme};
pub use resize::ResizeMonitor;
pub use terminal_guard::{
    CrosstermTerminalOps, TerminalGuard, TerminalOps, TerminalRestorer, TerminationSignal,
};
#[cfg(unix)]
pub use terminal_guard::{install_termination_signals, SignalWatchdog, SIGNAL_GRACE_PERIOD};
