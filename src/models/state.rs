/// Where the user is in the menu.
///
/// Owned by the navigation engine and only mutated on the foreground thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current: String,
    pub selected: usize,
    pub history: Vec<String>,
}

impl NavigationState {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            current: start.into(),
            selected: 0,
            history: Vec::new(),
        }
    }

    /// Moves the selection by `delta` within `len` entries.
    pub fn step(&mut self, delta: isize, len: usize, wrap: bool) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let last = len - 1;
        let current = self.selected.min(last) as isize;
        let target = current + delta;
        self.selected = if wrap {
            target.rem_euclid(len as isize) as usize
        } else {
            target.clamp(0, last as isize) as usize
        };
    }

    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn push_page(&mut self, page: impl Into<String>) {
        let previous = std::mem::replace(&mut self.current, page.into());
        self.history.push(previous);
        self.selected = 0;
    }

    /// Returns `false` when there is no history to go back to.
    pub fn pop_page(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                self.selected = 0;
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
