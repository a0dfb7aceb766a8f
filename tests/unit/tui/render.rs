use super::*;
use crate::kernel::Status;
use crate::models::{Entry, NavigationState, Page};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

fn home() -> Page {
    Page::new("home", "Main Menu")
        .with_entry(Entry::new("Hello").action("greet"))
        .with_entry(Entry::new("Settings").next_page("settings").accelerator('s'))
        .with_entry(Entry::new("Later").disabled())
}

fn rows(buffer: &Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

fn find(buffer: &Buffer, text: &str) -> Option<(u16, u16)> {
    rows(buffer).iter().enumerate().find_map(|(y, row)| {
        let byte = row.find(text)?;
        Some((row[..byte].chars().count() as u16, y as u16))
    })
}

fn draw(
    renderer: &mut TerminalRenderer<TestBackend>,
    page: &Page,
    state: &NavigationState,
    status: Option<&Status>,
) {
    let view = MenuView {
        page,
        state,
        status,
        can_go_back: !state.history.is_empty(),
    };
    renderer.render(&view).unwrap();
}

#[test]
fn draws_title_entries_and_hint() {
    let mut renderer = TerminalRenderer::new(TestBackend::new(60, 16), Theme::default()).unwrap();
    let page = home();
    draw(&mut renderer, &page, &NavigationState::new("home"), None);

    let buffer = renderer.backend().buffer();
    assert!(find(buffer, " Main Menu ").is_some());
    assert!(find(buffer, "> Hello").is_some());
    assert!(find(buffer, "Settings [s]").is_some());
    assert!(find(buffer, "Esc Quit").is_some());
    assert!(find(buffer, "╔").is_some());
}

#[test]
fn hint_offers_back_when_history_exists() {
    let mut renderer = TerminalRenderer::new(TestBackend::new(60, 16), Theme::default()).unwrap();
    let page = Page::new("settings", "").with_entry(Entry::new("Back").next_page("home"));
    let mut state = NavigationState::new("home");
    state.push_page("settings");
    draw(&mut renderer, &page, &state, None);

    let buffer = renderer.backend().buffer();
    assert!(find(buffer, "Esc Back").is_some());
    assert!(find(buffer, " settings ").is_some());
}

#[test]
fn highlights_selection_and_dims_disabled_entries() {
    let theme = Theme::default();
    let mut renderer = TerminalRenderer::new(TestBackend::new(60, 16), theme).unwrap();
    let page = home();
    let mut state = NavigationState::new("home");
    state.selected = 1;
    draw(&mut renderer, &page, &state, None);

    let buffer = renderer.backend().buffer();
    assert!(find(buffer, "> Settings").is_some());

    let selected = find(buffer, "Settings").unwrap();
    let cell = &buffer[selected];
    assert_eq!(cell.bg, theme.selected_bg);
    assert_eq!(cell.fg, theme.selected_fg);

    let disabled = find(buffer, "Later").unwrap();
    let cell = &buffer[disabled];
    assert_eq!(cell.fg, Color::DarkGray);
    assert!(cell.modifier.contains(Modifier::DIM));
}

#[test]
fn shows_status_line() {
    let mut renderer = TerminalRenderer::new(TestBackend::new(60, 16), Theme::default()).unwrap();
    let page = home();
    let status = Status::error("action 'greet' is not registered");
    draw(&mut renderer, &page, &NavigationState::new("home"), Some(&status));

    let buffer = renderer.backend().buffer();
    let pos = find(buffer, "action 'greet' is not registered").unwrap();
    assert_eq!(buffer[pos].fg, Color::Red);
}

#[test]
fn small_terminal_shows_notice() {
    let mut renderer = TerminalRenderer::new(TestBackend::new(30, 6), Theme::default())
        .unwrap()
        .with_min_size(40, 10);
    let page = home();
    draw(&mut renderer, &page, &NavigationState::new("home"), None);

    let buffer = renderer.backend().buffer();
    assert!(find(buffer, "Terminal too small").is_some());
    assert!(find(buffer, "Hello").is_none());
}

#[test]
fn resize_relays_out_the_menu() {
    let mut renderer = TerminalRenderer::new(TestBackend::new(30, 6), Theme::default())
        .unwrap()
        .with_min_size(40, 10);
    let page = home();
    let state = NavigationState::new("home");
    draw(&mut renderer, &page, &state, None);

    renderer.terminal.backend_mut().resize(60, 16);
    renderer.resize(60, 16);
    draw(&mut renderer, &page, &state, None);

    let buffer = renderer.backend().buffer();
    assert_eq!((buffer.area.width, buffer.area.height), (60, 16));
    assert!(find(buffer, "> Hello").is_some());
}

#[test]
fn theme_falls_back_on_unknown_colors() {
    let settings = ThemeSettings {
        border: "red".to_string(),
        title: "#00ff00".to_string(),
        selected_bg: "not-a-color".to_string(),
        ..ThemeSettings::default()
    };
    let theme = Theme::from_settings(&settings);

    assert_eq!(theme.border, Color::Red);
    assert_eq!(theme.title, Color::Rgb(0, 255, 0));
    assert_eq!(theme.selected_bg, Theme::default().selected_bg);
    assert_eq!(theme.selected_fg, Color::Black);
}
