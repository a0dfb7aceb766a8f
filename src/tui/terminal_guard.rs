//! Scoped raw-mode ownership.
//!
//! [`TerminalGuard`] switches the terminal into raw mode on construction and restores it exactly
//! once: from `Drop`, from an explicit [`TerminalRestorer::restore`], or from the signal watchdog,
//! whichever runs first.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long the foreground loop gets to exit on its own after SIGINT/SIGTERM.
pub const SIGNAL_GRACE_PERIOD: Duration = Duration::from_secs(2);

pub trait TerminalOps: Send + Sync + 'static {
    fn setup(&self) -> io::Result<()>;
    fn restore(&self) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct CrosstermTerminalOps;

impl TerminalOps for CrosstermTerminalOps {
    fn setup(&self) -> io::Result<()> {
        use crossterm::{
            cursor, execute,
            terminal::{enable_raw_mode, EnterAlternateScreen},
        };

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        use crossterm::{
            cursor, execute,
            terminal::{disable_raw_mode, LeaveAlternateScreen},
        };

        // Try every step even if one fails.
        let mut first_err: Option<io::Error> = None;

        if let Err(err) = disable_raw_mode() {
            first_err.get_or_insert(err);
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
            first_err.get_or_insert(err);
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Cloneable handle that releases raw mode at most once across all clones.
#[derive(Clone)]
pub struct TerminalRestorer {
    restored: Arc<AtomicBool>,
    ops: Arc<dyn TerminalOps>,
}

impl TerminalRestorer {
    fn new(ops: Arc<dyn TerminalOps>) -> Self {
        Self {
            restored: Arc::new(AtomicBool::new(false)),
            ops,
        }
    }

    pub fn restore(&self) -> io::Result<()> {
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.ops.restore()
    }

    pub fn is_restored(&self) -> bool {
        self.restored.load(Ordering::SeqCst)
    }
}

pub struct TerminalGuard {
    restorer: TerminalRestorer,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        Self::with_ops(Arc::new(CrosstermTerminalOps))
    }

    /// Enters raw mode through `ops`.
    ///
    /// A failed setup may leave the terminal half-configured, so it is undone before the
    /// error is returned.
    pub fn with_ops(ops: Arc<dyn TerminalOps>) -> io::Result<Self> {
        let restorer = TerminalRestorer::new(ops);
        if let Err(err) = restorer.ops.setup() {
            if let Err(restore_err) = restorer.restore() {
                tracing::warn!(error = %restore_err, "restore after failed setup");
            }
            return Err(err);
        }
        tracing::debug!("raw mode entered");
        Ok(Self { restorer })
    }

    pub fn restorer(&self) -> TerminalRestorer {
        self.restorer.clone()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restorer.restore() {
            tracing::warn!(error = %err, "failed to restore terminal");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    SigInt,
    SigTerm,
}

impl TerminationSignal {
    pub fn exit_code(self) -> i32 {
        match self {
            TerminationSignal::SigInt => 130,
            TerminationSignal::SigTerm => 143,
        }
    }
}

/// SIGINT/SIGTERM forwarding for one menu session.
///
/// Closing (or dropping) the watchdog unregisters the handlers and stops the thread, so a
/// signal arriving after the session is left to the host process.
#[cfg(unix)]
pub struct SignalWatchdog {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalWatchdog {
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("signal watchdog panicked");
            }
        }
    }
}

#[cfg(unix)]
impl Drop for SignalWatchdog {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Forwards SIGINT/SIGTERM to `tx`.
///
/// If the watchdog is still open [`SIGNAL_GRACE_PERIOD`] after a forwarded signal, it restores
/// the terminal itself and exits with the conventional signal status. A signal that can no
/// longer be forwarded (receiver gone) is ignored.
#[cfg(unix)]
pub fn install_termination_signals(
    restorer: TerminalRestorer,
    tx: std::sync::mpsc::Sender<TerminationSignal>,
) -> io::Result<SignalWatchdog> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();
    let closed = handle.clone();
    let thread = std::thread::Builder::new()
        .name("termenu-signals".into())
        .spawn(move || {
            for sig in signals.forever() {
                let signal = match sig {
                    SIGINT => TerminationSignal::SigInt,
                    SIGTERM => TerminationSignal::SigTerm,
                    _ => continue,
                };
                tracing::info!(?signal, "termination signal received");

                if tx.send(signal).is_err() {
                    tracing::debug!(?signal, "menu loop already gone, ignoring signal");
                    continue;
                }

                if wait_for_close(&closed, SIGNAL_GRACE_PERIOD) {
                    break;
                }
                tracing::error!(?signal, "menu loop did not exit in time, forcing exit");
                let _ = restorer.restore();
                std::process::exit(signal.exit_code());
            }
        })?;

    Ok(SignalWatchdog {
        handle,
        thread: Some(thread),
    })
}

/// Sleeps up to `grace`, returning early with `true` once `handle` is closed.
#[cfg(unix)]
fn wait_for_close(handle: &signal_hook::iterator::Handle, grace: Duration) -> bool {
    let deadline = std::time::Instant::now() + grace;
    while std::time::Instant::now() < deadline {
        if handle.is_closed() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    handle.is_closed()
}

#[cfg(test)]
#[path = "../../tests/unit/tui/terminal_guard.rs"]
mod tests;
