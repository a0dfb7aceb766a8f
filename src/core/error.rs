use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, MenuError>;

/// Error returned by a user-supplied action callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_error<E: std::error::Error>(err: E) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ActionError {}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<io::Error> for ActionError {
    fn from(err: io::Error) -> Self {
        Self::from_error(err)
    }
}

/// Menu configuration errors raised by the JSON loader and by programmatic construction.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    NoPages,
    MissingStartPage,
    UnknownStartPage(String),
    DuplicatePage(String),
    BlankLabel { page: String },
    InvalidSetting { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read menu config: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid menu config JSON: {}", err),
            ConfigError::NoPages => write!(f, "menu config must contain a non-empty 'pages' map"),
            ConfigError::MissingStartPage => write!(f, "menu config must specify 'start_page'"),
            ConfigError::UnknownStartPage(page) => {
                write!(f, "start page '{}' is not defined", page)
            }
            ConfigError::DuplicatePage(page) => write!(f, "a page named '{}' already exists", page),
            ConfigError::BlankLabel { page } => {
                write!(f, "page '{}' has an entry with a blank label", page)
            }
            ConfigError::InvalidSetting { key, reason } => {
                write!(f, "invalid setting '{}': {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[derive(Debug)]
pub enum MenuError {
    /// Raw mode could not be entered or restored. Fatal to the session.
    TerminalMode(io::Error),
    /// An entry or action pointed at a page that does not exist.
    InvalidNavigationTarget(String),
    /// An entry referenced an action identifier that is not registered.
    MissingAction(String),
    ActionFailure { label: String, source: ActionError },
    /// The byte source failed persistently and the acquisition thread gave up.
    AcquisitionLost(String),
    StartPageNotSet,
    Render(io::Error),
    Config(ConfigError),
}

impl MenuError {
    /// Whether the session has to end when this error surfaces.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MenuError::TerminalMode(_)
                | MenuError::AcquisitionLost(_)
                | MenuError::StartPageNotSet
                | MenuError::Config(_)
        )
    }
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::TerminalMode(err) => write!(f, "terminal mode error: {}", err),
            MenuError::InvalidNavigationTarget(page) => {
                write!(f, "page '{}' not found in menu", page)
            }
            MenuError::MissingAction(id) => write!(f, "action '{}' is not registered", id),
            MenuError::ActionFailure { label, source } => {
                write!(f, "error in '{}': {}", label, source)
            }
            MenuError::AcquisitionLost(reason) => write!(f, "keyboard input lost: {}", reason),
            MenuError::StartPageNotSet => write!(f, "no start page set"),
            MenuError::Render(err) => write!(f, "render failed: {}", err),
            MenuError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MenuError::TerminalMode(err) | MenuError::Render(err) => Some(err),
            MenuError::ActionFailure { source, .. } => Some(source),
            MenuError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for MenuError {
    fn from(err: ConfigError) -> Self {
        MenuError::Config(err)
    }
}
