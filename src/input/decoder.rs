//! Raw terminal bytes to [`KeyEvent`]s.
//!
//! A lone ESC and the first byte of an arrow-key sequence are indistinguishable until either
//! the next byte arrives or a short timeout passes, so the decoder keeps a deadline while it
//! sits in [`DecoderState::SawEsc`] or [`DecoderState::SawEscBracket`]. The caller feeds bytes
//! with [`EscapeDecoder::feed`] and calls [`EscapeDecoder::expire`] whenever the deadline may
//! have elapsed.

use crate::core::KeyEvent;
use std::time::{Duration, Instant};

pub const ESC: u8 = 0x1b;
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(5);

/// Longest CSI sequence kept before it is abandoned as unknown.
const MAX_SEQUENCE_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Idle,
    SawEsc,
    SawEscBracket,
    /// `ESC O`, the application cursor-key prefix.
    SawEscO,
}

#[derive(Debug)]
pub struct EscapeDecoder {
    state: DecoderState,
    pending: Vec<u8>,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ESCAPE_TIMEOUT)
    }
}

impl EscapeDecoder {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: DecoderState::Idle,
            pending: Vec::with_capacity(MAX_SEQUENCE_LEN),
            deadline: None,
            timeout,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Instant at which an incomplete sequence will be resolved, if one is in flight.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Feeds one byte received at `now`, appending any completed events to `out`.
    pub fn feed(&mut self, byte: u8, now: Instant, out: &mut Vec<KeyEvent>) {
        match self.state {
            DecoderState::Idle => self.feed_idle(byte, now, out),
            DecoderState::SawEsc => match byte {
                b'[' => {
                    self.pending.push(byte);
                    self.state = DecoderState::SawEscBracket;
                    self.deadline = now.checked_add(self.timeout);
                }
                b'O' => {
                    self.pending.push(byte);
                    self.state = DecoderState::SawEscO;
                    self.deadline = now.checked_add(self.timeout);
                }
                _ => {
                    out.push(KeyEvent::Unknown(self.take_pending_with(byte)));
                    self.feed_idle(byte, now, out);
                }
            },
            DecoderState::SawEscBracket => self.feed_csi(byte, now, out),
            DecoderState::SawEscO => match arrow_for(byte) {
                Some(arrow) => {
                    self.reset();
                    out.push(arrow);
                }
                None => {
                    self.pending.push(byte);
                    out.push(KeyEvent::Unknown(self.take_pending()));
                }
            },
        }
    }

    /// Resolves an incomplete sequence whose deadline has passed.
    ///
    /// A bare ESC becomes [`KeyEvent::Escape`]; a truncated CSI/SS3 becomes
    /// [`KeyEvent::Unknown`] with the bytes collected so far.
    pub fn expire(&mut self, now: Instant) -> Option<KeyEvent> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        let event = match self.state {
            DecoderState::Idle => return None,
            DecoderState::SawEsc => {
                self.reset();
                KeyEvent::Escape
            }
            DecoderState::SawEscBracket | DecoderState::SawEscO => {
                KeyEvent::Unknown(self.take_pending())
            }
        };
        Some(event)
    }

    /// Convenience wrapper used by tests and the acquisition loop.
    pub fn feed_all(&mut self, bytes: &[u8], now: Instant) -> Vec<KeyEvent> {
        let mut out = Vec::new();
        for &byte in bytes {
            self.feed(byte, now, &mut out);
        }
        out
    }

    fn feed_idle(&mut self, byte: u8, now: Instant, out: &mut Vec<KeyEvent>) {
        let event = match byte {
            ESC => {
                self.pending.push(byte);
                self.state = DecoderState::SawEsc;
                self.deadline = now.checked_add(self.timeout);
                return;
            }
            b'\r' | b'\n' => KeyEvent::Enter,
            0x7f | 0x08 => KeyEvent::Backspace,
            0x03 => KeyEvent::Interrupt,
            0x20..=0x7e => KeyEvent::Char(byte as char),
            // Non-ASCII bytes are taken as Latin-1 so every byte still yields one event.
            0x80..=0xff => KeyEvent::Char(char::from(byte)),
            _ => KeyEvent::Unknown(vec![byte]),
        };
        out.push(event);
    }

    fn feed_csi(&mut self, byte: u8, now: Instant, out: &mut Vec<KeyEvent>) {
        match byte {
            // Parameter and intermediate bytes, e.g. the `1;5` in `ESC [ 1 ; 5 A`.
            0x20..=0x3f => {
                self.pending.push(byte);
                if self.pending.len() >= MAX_SEQUENCE_LEN {
                    out.push(KeyEvent::Unknown(self.take_pending()));
                }
            }
            0x40..=0x7e => match arrow_for(byte) {
                Some(arrow) => {
                    self.reset();
                    out.push(arrow);
                }
                None => {
                    self.pending.push(byte);
                    out.push(KeyEvent::Unknown(self.take_pending()));
                }
            },
            _ => {
                out.push(KeyEvent::Unknown(self.take_pending()));
                self.feed_idle(byte, now, out);
            }
        }
    }

    fn take_pending(&mut self) -> Vec<u8> {
        let bytes = std::mem::take(&mut self.pending);
        self.reset();
        bytes
    }

    fn take_pending_with(&mut self, byte: u8) -> Vec<u8> {
        self.pending.push(byte);
        self.take_pending()
    }

    fn reset(&mut self) {
        self.state = DecoderState::Idle;
        self.pending.clear();
        self.deadline = None;
    }
}

fn arrow_for(byte: u8) -> Option<KeyEvent> {
    match byte {
        b'A' => Some(KeyEvent::ArrowUp),
        b'B' => Some(KeyEvent::ArrowDown),
        b'C' => Some(KeyEvent::ArrowRight),
        b'D' => Some(KeyEvent::ArrowLeft),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/decoder.rs"]
mod tests;
