//! ratatui implementation of the menu render collaborator.

use crate::kernel::{MenuView, Renderer, StatusKind};
use crate::services::ThemeSettings;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use std::io;
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

const HINT: &str = "↑↓ Navigate  Enter Select  Esc Back";
const HINT_ROOT: &str = "↑↓ Navigate  Enter Select  Esc Quit";
const HIGHLIGHT_SYMBOL: &str = "> ";
// Border columns plus the highlight gutter and one column of padding each side.
const BOX_CHROME: u16 = 2 + 2 + 2;
// Border rows, the blank spacer, the hint line and the status line.
const BOX_ROWS: u16 = 2 + 1 + 1 + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub border: Color,
    pub title: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::LightCyan,
            title: Color::White,
            selected_bg: Color::LightCyan,
            selected_fg: Color::Black,
        }
    }
}

impl Theme {
    /// Resolves color names from the config; unparseable names keep the default color.
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        let fallback = Self::default();
        Self {
            border: parse_color("border", &settings.border, fallback.border),
            title: parse_color("title", &settings.title, fallback.title),
            selected_bg: parse_color("selected_bg", &settings.selected_bg, fallback.selected_bg),
            selected_fg: parse_color("selected_fg", &settings.selected_fg, fallback.selected_fg),
        }
    }
}

fn parse_color(key: &str, value: &str, fallback: Color) -> Color {
    match Color::from_str(value.trim()) {
        Ok(color) => color,
        Err(_) => {
            tracing::warn!(key, value, "unknown theme color, using default");
            fallback
        }
    }
}

pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
    min_size: (u16, u16),
}

impl TerminalRenderer<CrosstermBackend<io::Stdout>> {
    pub fn stdout(theme: Theme) -> io::Result<Self> {
        Self::new(CrosstermBackend::new(io::stdout()), theme)
    }
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(backend: B, theme: Theme) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            theme,
            min_size: (0, 0),
        })
    }

    /// Below this size a notice is drawn instead of the menu.
    pub fn with_min_size(mut self, width: u16, height: u16) -> Self {
        self.min_size = (width, height);
        self
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, view: &MenuView<'_>) -> io::Result<()> {
        let theme = self.theme;
        let min_size = self.min_size;
        self.terminal
            .draw(|frame| draw_menu(frame, view, &theme, min_size))?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "terminal resized");
        if let Err(err) = self.terminal.resize(Rect::new(0, 0, width, height)) {
            tracing::warn!(error = %err, "failed to resize terminal buffers");
        }
    }
}

fn draw_menu(frame: &mut Frame<'_>, view: &MenuView<'_>, theme: &Theme, min_size: (u16, u16)) {
    let area = frame.area();
    if area.width < min_size.0 || area.height < min_size.1 {
        let notice = Paragraph::new(format!(
            "Terminal too small ({}x{}, need {}x{})",
            area.width, area.height, min_size.0, min_size.1
        ))
        .alignment(Alignment::Center);
        frame.render_widget(notice, area);
        return;
    }

    let hint = if view.can_go_back { HINT } else { HINT_ROOT };
    let labels: Vec<String> = view.page.entries.iter().map(entry_text).collect();

    let content_width = labels
        .iter()
        .map(|label| label.width())
        .chain([view.page.title.width(), hint.width()])
        .chain(view.status.map(|status| status.text.width()))
        .max()
        .unwrap_or(0) as u16;
    let width = content_width.saturating_add(BOX_CHROME).min(area.width);
    let rows = u16::try_from(labels.len()).unwrap_or(u16::MAX);
    let height = rows.saturating_add(BOX_ROWS).min(area.height);
    let outer = centered(area, width, height);

    let block = Block::bordered()
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme.border))
        .title(Line::from(format!(" {} ", view.page.title)))
        .title_alignment(Alignment::Center)
        .title_style(
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(outer);
    frame.render_widget(block, outer);

    let list_height = inner.height.saturating_sub(2).min(rows);
    let list_area = Rect {
        height: list_height,
        ..inner
    };
    let items: Vec<ListItem<'_>> = view
        .page
        .entries
        .iter()
        .zip(labels)
        .map(|(entry, label)| {
            let item = ListItem::new(label);
            if entry.enabled {
                item
            } else {
                item.style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM))
            }
        })
        .collect();
    let list = List::new(items)
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_style(
            Style::default()
                .bg(theme.selected_bg)
                .fg(theme.selected_fg)
                .add_modifier(Modifier::BOLD),
        );
    let selected = (!view.page.is_empty()).then_some(view.state.selected);
    let mut list_state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, list_area, &mut list_state);

    if inner.height >= 2 {
        let hint_area = Rect::new(inner.x, inner.bottom() - 2, inner.width, 1);
        let hint = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, hint_area);
    }

    if let Some(status) = view.status.filter(|_| inner.height >= 1) {
        let status_area = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
        let color = match status.kind {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        let line = Paragraph::new(status.text.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(color));
        frame.render_widget(line, status_area);
    }
}

fn entry_text(entry: &crate::models::Entry) -> String {
    match entry.accelerator {
        Some(key) => format!("{} [{}]", entry.label, key),
        None => entry.label.clone(),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/tui/render.rs"]
mod tests;
