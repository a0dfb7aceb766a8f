//! Terminal size change detection for the foreground loop.
//!
//! On unix a SIGWINCH handler raises a flag and the size is only queried after it fires.
//! Elsewhere the size is re-read at most once per poll period.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_RESIZE_POLL: Duration = Duration::from_millis(100);

type SizeProbe = Box<dyn FnMut() -> io::Result<(u16, u16)> + Send>;

pub struct ResizeMonitor {
    size: (u16, u16),
    probe: SizeProbe,
    pending: Arc<AtomicBool>,
    poll_every: Option<Duration>,
    last_check: Instant,
    #[cfg(unix)]
    sig_id: Option<signal_hook::SigId>,
}

impl ResizeMonitor {
    /// Watches the real terminal through crossterm.
    pub fn new() -> io::Result<Self> {
        let size = crossterm::terminal::size()?;
        let mut monitor = Self::with_probe(size, Box::new(crossterm::terminal::size));

        #[cfg(unix)]
        {
            let id = signal_hook::flag::register(
                signal_hook::consts::SIGWINCH,
                Arc::clone(&monitor.pending),
            )?;
            monitor.sig_id = Some(id);
            monitor.poll_every = None;
        }

        Ok(monitor)
    }

    /// Uses `probe` for size queries and re-reads it every [`DEFAULT_RESIZE_POLL`].
    pub fn with_probe(initial: (u16, u16), probe: SizeProbe) -> Self {
        Self {
            size: initial,
            probe,
            pending: Arc::new(AtomicBool::new(false)),
            poll_every: Some(DEFAULT_RESIZE_POLL),
            last_check: Instant::now(),
            #[cfg(unix)]
            sig_id: None,
        }
    }

    /// `None` disables periodic checks; only [`Self::request_check`] triggers a query.
    pub fn poll_every(mut self, period: Option<Duration>) -> Self {
        self.poll_every = period;
        self
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Forces the next [`Self::poll`] to query the size.
    pub fn request_check(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Returns the new size if it changed since the last call.
    pub fn poll(&mut self) -> Option<(u16, u16)> {
        let signalled = self.pending.swap(false, Ordering::AcqRel);
        let due = self
            .poll_every
            .is_some_and(|period| self.last_check.elapsed() >= period);
        if !signalled && !due {
            return None;
        }
        self.last_check = Instant::now();

        match (self.probe)() {
            Ok(size) if size != self.size => {
                tracing::debug!(width = size.0, height = size.1, "terminal size changed");
                self.size = size;
                Some(size)
            }
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to query terminal size");
                None
            }
        }
    }
}

impl Drop for ResizeMonitor {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(id) = self.sig_id.take() {
            signal_hook::low_level::unregister(id);
        }
    }
}
