//! The single-threaded menu state machine.
//!
//! Each call to [`NavigationEngine::handle_key`] processes exactly one key to completion,
//! including any action it triggers, before the caller drains the next one.

use super::action::{ActionOutcome, ActionRegistry};
use super::render::{MenuView, Renderer, Status};
use crate::core::{InputEvent, KeyEvent, MenuError, Result};
use crate::models::{Menu, NavigationState, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationOptions {
    /// Moving past the first or last entry wraps to the other end instead of stopping.
    pub wrap_selection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct NavigationEngine {
    menu: Menu,
    actions: ActionRegistry,
    state: NavigationState,
    options: NavigationOptions,
    status: Option<Status>,
}

impl NavigationEngine {
    pub fn new(menu: Menu, actions: ActionRegistry, options: NavigationOptions) -> Result<Self> {
        let start = menu
            .start_page()
            .filter(|id| menu.contains(id))
            .ok_or(MenuError::StartPageNotSet)?
            .to_string();
        warn_unresolved(&menu, &actions);
        Ok(Self {
            menu,
            actions,
            state: NavigationState::new(start),
            options,
            status: None,
        })
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.menu.page(&self.state.current)
    }

    pub fn view(&self) -> Option<MenuView<'_>> {
        let page = self.current_page()?;
        Some(MenuView {
            page,
            state: &self.state,
            status: self.status.as_ref(),
            can_go_back: self.state.can_go_back(),
        })
    }

    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        match self.view() {
            Some(view) => renderer.render(&view).map_err(MenuError::Render),
            None => Ok(()),
        }
    }

    /// Handles an item from the key queue.
    pub fn handle_input<R: Renderer + ?Sized>(
        &mut self,
        event: InputEvent,
        renderer: &mut R,
    ) -> Flow {
        match event {
            InputEvent::Key(key) => self.handle_key(&key, renderer),
            InputEvent::AcquisitionLost(reason) => {
                let err = MenuError::AcquisitionLost(reason);
                tracing::error!(error = %err, "leaving menu");
                renderer.report(&err);
                self.status = Some(Status::error(err.to_string()));
                Flow::Exit
            }
        }
    }

    pub fn handle_key<R: Renderer + ?Sized>(&mut self, key: &KeyEvent, renderer: &mut R) -> Flow {
        self.status = None;
        let len = self.current_page().map_or(0, Page::len);
        self.state.clamp(len);

        match key {
            KeyEvent::ArrowUp => {
                self.state.step(-1, len, self.options.wrap_selection);
                Flow::Continue
            }
            KeyEvent::ArrowDown => {
                self.state.step(1, len, self.options.wrap_selection);
                Flow::Continue
            }
            KeyEvent::Enter => self.activate(self.state.selected, renderer),
            KeyEvent::Escape | KeyEvent::Backspace => {
                if self.state.pop_page() {
                    tracing::debug!(page = %self.state.current, "back");
                    Flow::Continue
                } else {
                    Flow::Exit
                }
            }
            KeyEvent::Interrupt => Flow::Exit,
            KeyEvent::Char(ch) => {
                let index = self
                    .current_page()
                    .and_then(|page| page.find_accelerator(*ch));
                match index {
                    Some(index) => {
                        self.state.selected = index;
                        self.activate(index, renderer)
                    }
                    None => Flow::Continue,
                }
            }
            KeyEvent::ArrowLeft | KeyEvent::ArrowRight | KeyEvent::Unknown(_) => Flow::Continue,
        }
    }

    fn activate<R: Renderer + ?Sized>(&mut self, index: usize, renderer: &mut R) -> Flow {
        let Some(entry) = self.current_page().and_then(|page| page.entry(index)) else {
            return Flow::Continue;
        };
        if !entry.enabled {
            return Flow::Continue;
        }
        let label = entry.label.clone();
        let next_page = entry.next_page.clone();
        let action = entry.action.clone();

        if let Some(target) = next_page {
            return self.goto(target, renderer);
        }
        let Some(action) = action else {
            return Flow::Continue;
        };

        tracing::debug!(action = %action, entry = %label, "invoking action");
        match self.actions.invoke(&action, &label) {
            Ok(ActionOutcome::Stay) => Flow::Continue,
            Ok(ActionOutcome::Message(text)) => {
                self.status = Some(Status::info(text));
                Flow::Continue
            }
            Ok(ActionOutcome::Goto(target)) => self.goto(target, renderer),
            Ok(ActionOutcome::Exit) => Flow::Exit,
            Err(err) => {
                self.report(err, renderer);
                Flow::Continue
            }
        }
    }

    fn goto<R: Renderer + ?Sized>(&mut self, target: String, renderer: &mut R) -> Flow {
        if !self.menu.contains(&target) {
            self.report(MenuError::InvalidNavigationTarget(target), renderer);
            return Flow::Continue;
        }
        tracing::debug!(from = %self.state.current, to = %target, "navigate");
        self.state.push_page(target);
        Flow::Continue
    }

    fn report<R: Renderer + ?Sized>(&mut self, err: MenuError, renderer: &mut R) {
        tracing::warn!(error = %err, page = %self.state.current, "menu error");
        renderer.report(&err);
        self.status = Some(Status::error(err.to_string()));
    }
}

fn warn_unresolved(menu: &Menu, actions: &ActionRegistry) {
    for id in menu.page_ids() {
        let Some(page) = menu.page(id) else { continue };
        for entry in &page.entries {
            if let Some(next) = entry.next_page.as_deref().filter(|t| !menu.contains(t)) {
                tracing::warn!(page = %id, entry = %entry.label, next_page = next, "unknown next page");
            }
            if entry.next_page.is_none() {
                if let Some(action) = entry.action.as_deref().filter(|a| !actions.contains(a)) {
                    tracing::warn!(page = %id, entry = %entry.label, action, "unregistered action");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/navigation.rs"]
mod tests;
