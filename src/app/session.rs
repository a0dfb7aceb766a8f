//! The foreground loop tying terminal, input thread, engine and renderer together.

use crate::core::{InputEvent, MenuError, Result};
use crate::input::{key_queue, ByteSource, InputThread, KeyReceiver, TtySource};
use crate::kernel::{ActionRegistry, Flow, NavigationEngine, Renderer};
use crate::models::{Menu, NavigationState};
use crate::services::{MenuConfig, MenuSettings};
use crate::tui::{ResizeMonitor, TerminalGuard, TerminalRenderer, TerminationSignal, Theme};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// Longest the loop waits for a key before checking signals and terminal size again.
const IDLE_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Escape on the start page, Ctrl-C, or an action returning `Exit`.
    UserExit,
    Signal(TerminationSignal),
    InputLost(String),
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub reason: ExitReason,
    pub state: NavigationState,
    /// Keys evicted from the full queue during the session.
    pub dropped_keys: u64,
}

impl SessionReport {
    pub fn exit_code(&self) -> i32 {
        match &self.reason {
            ExitReason::UserExit => 0,
            ExitReason::Signal(signal) => signal.exit_code(),
            ExitReason::InputLost(_) => 1,
        }
    }
}

/// Optional collaborators of the loop besides keys.
#[derive(Default)]
pub struct SessionHooks {
    pub resize: Option<ResizeMonitor>,
    pub signals: Option<Receiver<TerminationSignal>>,
}

pub struct MenuSession {
    engine: NavigationEngine,
    settings: MenuSettings,
}

impl MenuSession {
    pub fn new(menu: Menu, actions: ActionRegistry, settings: MenuSettings) -> Result<Self> {
        let engine = NavigationEngine::new(menu, actions, settings.navigation())?;
        Ok(Self { engine, settings })
    }

    pub fn from_config(config: MenuConfig, actions: ActionRegistry) -> Result<Self> {
        Self::new(config.menu, actions, config.settings)
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    /// Runs the menu on the controlling terminal until the user exits.
    pub fn run(self) -> Result<SessionReport> {
        let guard = TerminalGuard::new().map_err(MenuError::TerminalMode)?;
        let mut hooks = SessionHooks::default();

        #[cfg(unix)]
        let watchdog = {
            let (tx, rx) = std::sync::mpsc::channel();
            match crate::tui::terminal_guard::install_termination_signals(guard.restorer(), tx) {
                Ok(watchdog) => {
                    hooks.signals = Some(rx);
                    Some(watchdog)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "termination signals not installed");
                    None
                }
            }
        };
        match ResizeMonitor::new() {
            Ok(monitor) => hooks.resize = Some(monitor),
            Err(err) => tracing::warn!(error = %err, "resize detection unavailable"),
        }

        let theme = Theme::from_settings(&self.settings.theme);
        let renderer = TerminalRenderer::stdout(theme)
            .map_err(MenuError::Render)?
            .with_min_size(self.settings.min_width, self.settings.min_height);
        let source = TtySource::open().map_err(MenuError::TerminalMode)?;

        let report = self.run_with(guard, source, renderer, hooks);
        #[cfg(unix)]
        {
            if let Some(watchdog) = watchdog {
                watchdog.close();
            }
        }
        report
    }

    /// Runs the loop with caller-supplied terminal pieces.
    ///
    /// On return the input thread has been joined and `guard` has restored the terminal, on
    /// error paths included.
    pub fn run_with<S, R>(
        mut self,
        guard: TerminalGuard,
        source: S,
        mut renderer: R,
        mut hooks: SessionHooks,
    ) -> Result<SessionReport>
    where
        S: ByteSource,
        R: Renderer,
    {
        let restorer = guard.restorer();
        let (tx, rx) = key_queue(self.settings.queue_capacity);
        let mut input = InputThread::spawn(source, tx, self.settings.acquisition())
            .map_err(|err| MenuError::AcquisitionLost(err.to_string()))?;
        tracing::info!(start = %self.engine.state().current, "menu session started");

        let outcome = self.event_loop(&rx, &mut renderer, &mut hooks);

        input.shutdown();
        let restored = restorer.restore();
        drop(guard);

        let reason = outcome?;
        restored.map_err(MenuError::TerminalMode)?;

        let dropped_keys = rx.dropped();
        tracing::info!(?reason, dropped_keys, "menu session finished");
        Ok(SessionReport {
            reason,
            state: self.engine.state().clone(),
            dropped_keys,
        })
    }

    fn event_loop<R: Renderer>(
        &mut self,
        rx: &KeyReceiver,
        renderer: &mut R,
        hooks: &mut SessionHooks,
    ) -> Result<ExitReason> {
        self.engine.render(renderer)?;

        loop {
            if let Some(signals) = &hooks.signals {
                match signals.try_recv() {
                    Ok(signal) => return Ok(ExitReason::Signal(signal)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => hooks.signals = None,
                }
            }

            if let Some((width, height)) = hooks.resize.as_mut().and_then(ResizeMonitor::poll) {
                renderer.resize(width, height);
                self.engine.render(renderer)?;
            }

            let Some(event) = rx.pop_blocking(IDLE_TICK) else {
                if rx.is_closed() {
                    return Ok(ExitReason::InputLost("input thread exited".to_string()));
                }
                continue;
            };

            let lost = match &event {
                InputEvent::AcquisitionLost(reason) => Some(reason.clone()),
                InputEvent::Key(_) => None,
            };
            let flow = self.engine.handle_input(event, renderer);
            self.engine.render(renderer)?;

            if flow == Flow::Exit {
                return Ok(lost.map_or(ExitReason::UserExit, ExitReason::InputLost));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/session.rs"]
mod tests;
