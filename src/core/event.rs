/// A decoded keystroke.
///
/// Produced by the escape decoder on the acquisition thread and consumed exactly once by the
/// navigation engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// One byte per event: bytes above 0x7F are read as Latin-1, so a multi-byte UTF-8
    /// character arrives as several `Char`s and cannot match an accelerator.
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Backspace,
    /// Ctrl-C delivered as a byte while the terminal is in raw mode.
    Interrupt,
    /// Raw bytes of a sequence the decoder does not understand.
    Unknown(Vec<u8>),
}

impl KeyEvent {
    pub fn as_char(&self) -> Option<char> {
        match self {
            KeyEvent::Char(ch) => Some(*ch),
            _ => None,
        }
    }
}

/// An item carried by the key queue from the acquisition thread to the foreground loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// The byte source failed persistently; no further keys will arrive.
    AcquisitionLost(String),
}

impl InputEvent {
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            InputEvent::Key(key) => Some(key),
            InputEvent::AcquisitionLost(_) => None,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        InputEvent::Key(key)
    }
}
