use super::decoder::{EscapeDecoder, DEFAULT_ESCAPE_TIMEOUT};
use super::queue::KeySender;
use super::source::{ByteSource, DEFAULT_POLL_INTERVAL};
use crate::core::InputEvent;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Consecutive read failures tolerated before input is declared lost.
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionConfig {
    pub poll_interval: Duration,
    pub escape_timeout: Duration,
    pub max_consecutive_errors: u32,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }
}

/// Cooperative stop flag shared with the acquisition thread.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Background thread turning raw terminal bytes into queued key events.
///
/// The thread owns the byte source and the decoder; nothing it touches besides the queue is
/// shared with the foreground. It observes the stop signal within one poll interval.
pub struct InputThread {
    stop: StopSignal,
    handle: Option<JoinHandle<()>>,
}

impl InputThread {
    pub fn spawn<S: ByteSource>(
        source: S,
        tx: KeySender,
        config: AcquisitionConfig,
    ) -> io::Result<Self> {
        let stop = StopSignal::new();
        let thread_stop = stop.clone();
        let handle = std::thread::Builder::new()
            .name("termenu-input".into())
            .spawn(move || acquisition_loop(source, tx, thread_stop, config))?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signals the thread to stop and waits for it to exit.
    pub fn shutdown(&mut self) {
        self.stop.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("input thread panicked");
            }
        }
    }
}

impl Drop for InputThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn acquisition_loop<S: ByteSource>(
    mut source: S,
    tx: KeySender,
    stop: StopSignal,
    config: AcquisitionConfig,
) {
    let mut decoder = EscapeDecoder::new(config.escape_timeout);
    let mut events = Vec::with_capacity(4);
    let mut failures = 0u32;
    tracing::debug!(
        poll_interval_us = config.poll_interval.as_micros() as u64,
        escape_timeout_us = config.escape_timeout.as_micros() as u64,
        "input thread started"
    );

    while !stop.is_stopped() {
        // Never wait past a pending escape deadline.
        let wait = match decoder.deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(config.poll_interval),
            None => config.poll_interval,
        };

        match source.poll_byte(wait) {
            Ok(Some(byte)) => {
                failures = 0;
                decoder.feed(byte, Instant::now(), &mut events);
            }
            Ok(None) => {}
            Err(err) => {
                failures += 1;
                tracing::warn!(error = %err, failures, "byte source read failed");
                if failures >= config.max_consecutive_errors {
                    tracing::error!(error = %err, "giving up on terminal input");
                    tx.push(InputEvent::AcquisitionLost(err.to_string()));
                    break;
                }
                std::thread::sleep(config.poll_interval);
            }
        }

        if let Some(event) = decoder.expire(Instant::now()) {
            events.push(event);
        }
        for event in events.drain(..) {
            tx.push(event);
        }
    }

    tracing::debug!("input thread stopped");
}

#[cfg(test)]
#[path = "../../tests/unit/input/acquisition.rs"]
mod tests;
