use crate::core::{ActionError, MenuError};
use rustc_hash::FxHashMap;
use std::panic::{self, AssertUnwindSafe};

/// What the menu should do after an action returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionOutcome {
    #[default]
    Stay,
    /// Stay on the page and show a message on the status line.
    Message(String),
    /// Navigate to a page, pushing the current one onto the history.
    Goto(String),
    Exit,
}

pub type ActionResult = Result<ActionOutcome, ActionError>;

type ActionFn = Box<dyn FnMut() -> ActionResult>;

/// Zero-argument callbacks looked up by identifier at invocation time.
#[derive(Default)]
pub struct ActionRegistry {
    actions: FxHashMap<String, ActionFn>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `exit` and `noop`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("exit", || Ok(ActionOutcome::Exit));
        registry.register("noop", || Ok(ActionOutcome::Stay));
        registry
    }

    /// Registers `action` under `id`, replacing any previous binding.
    pub fn register<F>(&mut self, id: impl Into<String>, action: F) -> &mut Self
    where
        F: FnMut() -> ActionResult + 'static,
    {
        let id = id.into();
        if self.actions.insert(id.clone(), Box::new(action)).is_some() {
            tracing::debug!(action = %id, "action re-registered");
        }
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs the action bound to `id` to completion on the calling thread.
    ///
    /// A panicking action is reported as an [`MenuError::ActionFailure`] like any other error.
    pub fn invoke(&mut self, id: &str, label: &str) -> Result<ActionOutcome, MenuError> {
        let action = self
            .actions
            .get_mut(id)
            .ok_or_else(|| MenuError::MissingAction(id.to_string()))?;

        let result = panic::catch_unwind(AssertUnwindSafe(action)).unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "action panicked".to_string());
            Err(ActionError::new(message))
        });

        result.map_err(|source| MenuError::ActionFailure {
            label: label.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("ActionRegistry").field("actions", &ids).finish()
    }
}
