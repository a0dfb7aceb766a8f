//! Keyboard input acquisition.
//!
//! Data flows one way: [`ByteSource`] → [`EscapeDecoder`] → [`KeySender`] on a dedicated
//! thread, then [`KeyReceiver`] on the foreground loop.

pub mod acquisition;
pub mod decoder;
pub mod queue;
pub mod source;

pub use acquisition::{AcquisitionConfig, InputThread, StopSignal};
pub use decoder::{DecoderState, EscapeDecoder};
pub use queue::{key_queue, KeyReceiver, KeySender, DEFAULT_QUEUE_CAPACITY};
pub use source::{ByteSource, TtySource};
