use super::*;
use crate::core::ActionError;
use crate::kernel::render::StatusKind;
use crate::models::Entry;
use std::cell::Cell;
use std::io;
use std::rc::Rc;

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<(String, usize)>,
    reports: Vec<String>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &MenuView<'_>) -> io::Result<()> {
        self.frames
            .push((view.page.id.clone(), view.state.selected));
        Ok(())
    }

    fn report(&mut self, error: &MenuError) {
        self.reports.push(error.to_string());
    }
}

fn three_entry_menu() -> Menu {
    let mut menu = Menu::new();
    menu.add_page(
        Page::new("home", "Home")
            .with_entry(Entry::new("One").action("noop"))
            .with_entry(Entry::new("Two").action("noop"))
            .with_entry(Entry::new("Three").action("noop")),
    )
    .unwrap();
    menu.set_start_page("home").unwrap();
    menu
}

fn engine(menu: Menu, wrap_selection: bool) -> NavigationEngine {
    NavigationEngine::new(
        menu,
        ActionRegistry::with_builtins(),
        NavigationOptions { wrap_selection },
    )
    .unwrap()
}

fn press(engine: &mut NavigationEngine, renderer: &mut RecordingRenderer, keys: &[KeyEvent]) -> Flow {
    let mut flow = Flow::Continue;
    for key in keys {
        flow = engine.handle_key(key, renderer);
        engine.render(renderer).unwrap();
    }
    flow
}

fn settings_menu() -> Menu {
    let mut menu = Menu::new();
    menu.add_page(
        Page::new("home", "Home")
            .with_entry(Entry::new("Hello").action("hello"))
            .with_entry(Entry::new("Go").next_page("settings")),
    )
    .unwrap();
    menu.add_page(Page::new("settings", "Settings").with_entry(Entry::new("Back").next_page("home")))
        .unwrap();
    menu.set_start_page("home").unwrap();
    menu
}

#[test]
fn start_page_is_required() {
    let mut menu = Menu::new();
    menu.add_page(Page::new("home", "Home")).unwrap();
    let err = NavigationEngine::new(menu, ActionRegistry::new(), NavigationOptions::default());
    assert!(matches!(err, Err(MenuError::StartPageNotSet)));
}

#[test]
fn selection_clamps_without_wraparound() {
    let mut engine = engine(three_entry_menu(), false);
    let mut renderer = RecordingRenderer::default();
    assert_eq!(engine.state().selected, 0);

    press(&mut engine, &mut renderer, &[KeyEvent::ArrowUp]);
    assert_eq!(engine.state().selected, 0);

    press(
        &mut engine,
        &mut renderer,
        &[KeyEvent::ArrowDown, KeyEvent::ArrowDown, KeyEvent::ArrowDown],
    );
    assert_eq!(engine.state().selected, 2);
}

#[test]
fn selection_wraps_when_enabled() {
    let mut engine = engine(three_entry_menu(), true);
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::ArrowUp]);
    assert_eq!(engine.state().selected, 2);

    press(&mut engine, &mut renderer, &[KeyEvent::ArrowDown]);
    assert_eq!(engine.state().selected, 0);
}

#[test]
fn enter_on_next_page_pushes_history() {
    let mut engine = engine(settings_menu(), false);
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::ArrowDown, KeyEvent::Enter]);

    let state = engine.state();
    assert_eq!(state.current, "settings");
    assert_eq!(state.selected, 0);
    assert_eq!(state.history, vec!["home".to_string()]);
}

#[test]
fn escape_and_backspace_pop_one_level() {
    let mut engine = engine(settings_menu(), false);
    let mut renderer = RecordingRenderer::default();
    press(&mut engine, &mut renderer, &[KeyEvent::ArrowDown, KeyEvent::Enter]);
    // settings -> home via the "Back" entry: two levels of history.
    press(&mut engine, &mut renderer, &[KeyEvent::Enter]);
    assert_eq!(engine.state().depth(), 2);

    assert_eq!(press(&mut engine, &mut renderer, &[KeyEvent::Escape]), Flow::Continue);
    assert_eq!(engine.state().current, "settings");
    assert_eq!(engine.state().depth(), 1);

    assert_eq!(press(&mut engine, &mut renderer, &[KeyEvent::Backspace]), Flow::Continue);
    assert_eq!(engine.state().current, "home");
    assert_eq!(engine.state().selected, 0);
    assert_eq!(engine.state().depth(), 0);
}

#[test]
fn escape_with_empty_history_exits() {
    let mut engine = engine(settings_menu(), false);
    let mut renderer = RecordingRenderer::default();
    assert_eq!(engine.handle_key(&KeyEvent::Escape, &mut renderer), Flow::Exit);
    assert_eq!(engine.handle_key(&KeyEvent::Backspace, &mut renderer), Flow::Exit);
}

#[test]
fn interrupt_exits_regardless_of_history() {
    let mut engine = engine(settings_menu(), false);
    let mut renderer = RecordingRenderer::default();
    press(&mut engine, &mut renderer, &[KeyEvent::ArrowDown, KeyEvent::Enter]);
    assert_eq!(engine.handle_key(&KeyEvent::Interrupt, &mut renderer), Flow::Exit);
}

#[test]
fn action_failure_keeps_session_alive() {
    let mut engine = engine(three_entry_menu(), false);
    engine
        .actions_mut()
        .register("noop", || Err(ActionError::new("printer on fire")));
    let mut renderer = RecordingRenderer::default();

    assert_eq!(press(&mut engine, &mut renderer, &[KeyEvent::Enter]), Flow::Continue);
    assert_eq!(renderer.reports, vec!["error in 'One': printer on fire".to_string()]);
    assert_eq!(engine.status().map(|s| s.kind), Some(StatusKind::Error));
    assert_eq!(engine.state().current, "home");

    press(&mut engine, &mut renderer, &[KeyEvent::ArrowDown]);
    assert_eq!(engine.state().selected, 1);
    assert!(engine.status().is_none());
}

#[test]
fn missing_action_is_reported_not_fatal() {
    let mut engine = engine(settings_menu(), false);
    let mut renderer = RecordingRenderer::default();

    assert_eq!(press(&mut engine, &mut renderer, &[KeyEvent::Enter]), Flow::Continue);
    assert_eq!(renderer.reports, vec!["action 'hello' is not registered".to_string()]);
    assert_eq!(engine.state().current, "home");
}

#[test]
fn invalid_target_stays_on_page() {
    let mut menu = Menu::new();
    menu.add_page(Page::new("home", "Home").with_entry(Entry::new("Broken").next_page("nowhere")))
        .unwrap();
    menu.set_start_page("home").unwrap();
    let mut engine = engine(menu, false);
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::Enter]);
    assert_eq!(engine.state().current, "home");
    assert!(engine.state().history.is_empty());
    assert_eq!(renderer.reports, vec!["page 'nowhere' not found in menu".to_string()]);
}

#[test]
fn action_runs_synchronously_and_exactly_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let mut engine = engine(settings_menu(), false);
    engine.actions_mut().register("hello", move || {
        counter.set(counter.get() + 1);
        Ok(ActionOutcome::Message("hi".into()))
    });
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::Enter]);
    assert_eq!(calls.get(), 1);
    assert_eq!(engine.status(), Some(&Status::info("hi")));
}

#[test]
fn action_outcomes_navigate_and_exit() {
    let mut engine = engine(settings_menu(), false);
    engine
        .actions_mut()
        .register("hello", || Ok(ActionOutcome::Goto("settings".into())));
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::Enter]);
    assert_eq!(engine.state().current, "settings");
    assert_eq!(engine.state().depth(), 1);

    engine.actions_mut().register("hello", || Ok(ActionOutcome::Exit));
    press(&mut engine, &mut renderer, &[KeyEvent::Escape]);
    assert_eq!(engine.handle_key(&KeyEvent::Enter, &mut renderer), Flow::Exit);
}

#[test]
fn next_page_wins_over_action() {
    let mut menu = Menu::new();
    menu.add_page(Page::new("home", "Home").with_entry(Entry::new("Both").action("exit").next_page("other")))
        .unwrap();
    menu.add_page(Page::new("other", "Other")).unwrap();
    menu.set_start_page("home").unwrap();
    let mut engine = engine(menu, false);
    let mut renderer = RecordingRenderer::default();

    assert_eq!(press(&mut engine, &mut renderer, &[KeyEvent::Enter]), Flow::Continue);
    assert_eq!(engine.state().current, "other");
}

#[test]
fn disabled_and_noop_entries_do_nothing() {
    let mut menu = Menu::new();
    menu.add_page(
        Page::new("home", "Home")
            .with_entry(Entry::new("Off").next_page("home").disabled())
            .with_entry(Entry::new("Label only")),
    )
    .unwrap();
    menu.set_start_page("home").unwrap();
    let mut engine = engine(menu, false);
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::Enter, KeyEvent::ArrowDown, KeyEvent::Enter]);
    assert!(engine.state().history.is_empty());
    assert!(renderer.reports.is_empty());
}

#[test]
fn accelerator_selects_and_activates() {
    let mut menu = Menu::new();
    menu.add_page(
        Page::new("home", "Home")
            .with_entry(Entry::new("Hello").action("noop"))
            .with_entry(Entry::new("Go").next_page("settings").accelerator('g')),
    )
    .unwrap();
    menu.add_page(Page::new("settings", "Settings")).unwrap();
    menu.set_start_page("home").unwrap();
    let mut engine = engine(menu, false);
    let mut renderer = RecordingRenderer::default();

    press(&mut engine, &mut renderer, &[KeyEvent::Char('x')]);
    assert_eq!(engine.state().current, "home");
    assert_eq!(engine.state().selected, 0);

    press(&mut engine, &mut renderer, &[KeyEvent::Char('G')]);
    assert_eq!(engine.state().current, "settings");
    assert_eq!(engine.state().history, vec!["home".to_string()]);
}

#[test]
fn unhandled_keys_are_ignored() {
    let mut engine = engine(three_entry_menu(), false);
    let mut renderer = RecordingRenderer::default();
    let flow = press(
        &mut engine,
        &mut renderer,
        &[
            KeyEvent::ArrowRight,
            KeyEvent::ArrowLeft,
            KeyEvent::Unknown(vec![0x1b, b'[', b'Z']),
            KeyEvent::Char('z'),
        ],
    );
    assert_eq!(flow, Flow::Continue);
    assert_eq!(engine.state().selected, 0);
    assert_eq!(renderer.frames.len(), 4);
}

#[test]
fn acquisition_lost_exits() {
    let mut engine = engine(three_entry_menu(), false);
    let mut renderer = RecordingRenderer::default();
    let flow = engine.handle_input(InputEvent::AcquisitionLost("eof".into()), &mut renderer);
    assert_eq!(flow, Flow::Exit);
    assert_eq!(renderer.reports, vec!["keyboard input lost: eof".to_string()]);
}

#[test]
fn end_to_end_home_settings_home() {
    let mut engine = engine(settings_menu(), false);
    let mut renderer = RecordingRenderer::default();

    for key in [KeyEvent::ArrowDown, KeyEvent::Enter, KeyEvent::Enter] {
        assert_eq!(
            engine.handle_input(InputEvent::Key(key), &mut renderer),
            Flow::Continue
        );
        engine.render(&mut renderer).unwrap();
    }

    assert_eq!(engine.state().current, "home");
    assert_eq!(
        renderer.frames,
        vec![
            ("home".to_string(), 1),
            ("settings".to_string(), 0),
            ("home".to_string(), 0)
        ]
    );
}
