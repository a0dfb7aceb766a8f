//! Non-blocking access to terminal input bytes.
//!
//! [`ByteSource::poll_byte`] is the only primitive the rest of the crate uses; the event-driven
//! unix variant (`poll(2)` on the tty fd) and the key-check windows variant (`_kbhit`) both hide
//! behind it.

use std::io;
use std::time::Duration;

/// Default wait per poll. Small enough that keystrokes are never perceptibly delayed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub trait ByteSource: Send + 'static {
    /// Returns the next byte if one is available, waiting at most `timeout` for it.
    ///
    /// `Ok(None)` means nothing arrived in time. Must never block indefinitely.
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        (**self).poll_byte(timeout)
    }
}

pub use platform::TtySource;

#[cfg(unix)]
mod platform {
    use super::ByteSource;
    use std::fs::File;
    use std::io;
    use std::os::unix::io::{AsRawFd, RawFd};
    use std::time::Duration;

    const READ_CHUNK: usize = 64;

    /// Reads the controlling terminal: stdin when it is a tty, `/dev/tty` otherwise.
    pub struct TtySource {
        fd: RawFd,
        // Keeps `/dev/tty` open when stdin is redirected.
        _tty: Option<File>,
        buf: [u8; READ_CHUNK],
        start: usize,
        end: usize,
    }

    impl TtySource {
        pub fn open() -> io::Result<Self> {
            // SAFETY: isatty only inspects the descriptor.
            if unsafe { libc::isatty(libc::STDIN_FILENO) } == 1 {
                return Ok(Self::from_fd(libc::STDIN_FILENO, None));
            }
            let tty = File::open("/dev/tty")?;
            let fd = tty.as_raw_fd();
            Ok(Self::from_fd(fd, Some(tty)))
        }

        fn from_fd(fd: RawFd, tty: Option<File>) -> Self {
            Self {
                fd,
                _tty: tty,
                buf: [0; READ_CHUNK],
                start: 0,
                end: 0,
            }
        }

        fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
            let mut pfd = libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            };
            // Round up so a sub-millisecond wait does not turn into a busy loop.
            let timeout_ms = timeout.as_micros().div_ceil(1000).min(i32::MAX as u128) as libc::c_int;
            // SAFETY: pfd is a valid pollfd and nfds is 1.
            let ret = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
            if ret < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    return Ok(false);
                }
                return Err(err);
            }
            if ret == 0 {
                return Ok(false);
            }
            if pfd.revents & (libc::POLLERR | libc::POLLNVAL) != 0 {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "terminal input descriptor is no longer valid",
                ));
            }
            // POLLHUP still lets read() report EOF below.
            Ok(true)
        }

        fn fill(&mut self) -> io::Result<bool> {
            // SAFETY: buf is valid for READ_CHUNK bytes.
            let n = unsafe { libc::read(self.fd, self.buf.as_mut_ptr().cast(), READ_CHUNK) };
            if n < 0 {
                let err = io::Error::last_os_error();
                return match err.kind() {
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(false),
                    _ => Err(err),
                };
            }
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "terminal input closed",
                ));
            }
            self.start = 0;
            self.end = n as usize;
            Ok(true)
        }
    }

    impl ByteSource for TtySource {
        fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
            if self.start == self.end {
                if !self.wait_readable(timeout)? || !self.fill()? {
                    return Ok(None);
                }
            }
            let byte = self.buf[self.start];
            self.start += 1;
            Ok(Some(byte))
        }
    }
}

#[cfg(windows)]
mod platform {
    use super::ByteSource;
    use crate::input::decoder::ESC;
    use std::collections::VecDeque;
    use std::io;
    use std::time::{Duration, Instant};

    extern "C" {
        fn _kbhit() -> i32;
        fn _getch() -> i32;
    }

    /// Console keyboard via the CRT `_kbhit`/`_getch` pair.
    ///
    /// Extended keys arrive as a `0xE0`/`0x00` prefix plus a scan code; arrows are rewritten
    /// into `ESC [ A..D` so the decoder sees the same bytes on every platform.
    pub struct TtySource {
        pending: VecDeque<u8>,
    }

    impl TtySource {
        pub fn open() -> io::Result<Self> {
            Ok(Self {
                pending: VecDeque::new(),
            })
        }

        fn read_key(&mut self) {
            // SAFETY: only called after _kbhit reported a key.
            let first = unsafe { _getch() } as u8;
            if first != 0xe0 && first != 0x00 {
                self.pending.push_back(first);
                return;
            }
            // SAFETY: the scan code of an extended key is always queued with its prefix.
            let code = unsafe { _getch() } as u8;
            match code {
                b'H' => self.pending.extend([ESC, b'[', b'A']),
                b'P' => self.pending.extend([ESC, b'[', b'B']),
                b'M' => self.pending.extend([ESC, b'[', b'C']),
                b'K' => self.pending.extend([ESC, b'[', b'D']),
                _ => self.pending.extend([ESC, b'[', b'?', code]),
            }
        }
    }

    impl ByteSource for TtySource {
        fn poll_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
            if let Some(byte) = self.pending.pop_front() {
                return Ok(Some(byte));
            }
            let deadline = Instant::now() + timeout;
            loop {
                // SAFETY: _kbhit has no preconditions.
                if unsafe { _kbhit() } != 0 {
                    self.read_key();
                    return Ok(self.pending.pop_front());
                }
                let now = Instant::now();
                if now >= deadline {
                    return Ok(None);
                }
                std::thread::sleep((deadline - now).min(Duration::from_micros(250)));
            }
        }
    }
}
