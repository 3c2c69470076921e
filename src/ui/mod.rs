//! Terminal UI
//!
//! Paints the app's [`Document`](crate::view::Document) with ratatui.
//! Keyboard-first; a click opens a card or closes the modal.

pub mod nodes;
pub mod theme;

use std::rc::Rc;
use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Click, GridView, InputMode};
use crate::genre::{self, QUICK_GENRES};
use crate::view::{Grid, Modal, Phase};

pub use nodes::node_lines;
pub use theme::Theme;

/// Narrowest card before the grid drops a column
pub const MIN_CARD_WIDTH: u16 = 26;
pub const MAX_COLUMNS: usize = 6;
/// Rows per card, borders included
pub const CARD_HEIGHT: u16 = 7;
const HERO_HEIGHT: u16 = 9;

/// Grid columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    ((width / MIN_CARD_WIDTH) as usize).clamp(1, MAX_COLUMNS)
}

/// Where the modal is drawn within `area`
pub fn modal_rect(area: Rect) -> Rect {
    let width = (area.width * 7 / 10).max(40).min(area.width);
    let height = (area.height * 8 / 10).max(12).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Resolve a left click at (`column`, `row`) against what `draw` paints
pub fn click_target(area: Rect, app: &App, column: u16, row: u16) -> Click {
    let position = Position::new(column, row);
    if app.document.modal().is_some() {
        return if modal_rect(area).contains(position) {
            Click::Modal
        } else {
            Click::Elsewhere
        };
    }

    let grid_area = screen_layout(area, app)[4];
    card_rects(grid_area, app)
        .into_iter()
        .find(|(_, rect)| rect.contains(position))
        .map(|(index, _)| Click::Card(index))
        .unwrap_or(Click::Elsewhere)
}

/// Header, genre bar, hero, section title, grid, status bar
fn screen_layout(area: Rect, app: &App) -> Rc<[Rect]> {
    let hero_height = if app.document.hero.is_some() {
        HERO_HEIGHT
    } else {
        0
    };

    Layout::vertical([
        Constraint::Length(3),           // Header
        Constraint::Length(1),           // Genre bar
        Constraint::Length(hero_height), // Hero
        Constraint::Length(1),           // Section title
        Constraint::Min(1),              // Grid
        Constraint::Length(1),           // Status bar
    ])
    .split(area)
}

/// Paint the whole screen
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    let chunks = screen_layout(area, app);
    let hero_height = chunks[2].height;

    render_header(frame, chunks[0], app);
    render_genre_bar(frame, chunks[1], app);
    if hero_height > 0 {
        render_hero(frame, chunks[2], app);
    }
    render_section_title(frame, chunks[3], app);
    render_grid(frame, chunks[4], app);
    render_status_bar(frame, chunks[5], app);

    if let Some(modal) = app.document.modal() {
        render_modal(frame, area, app, modal);
    }

    render_notification(frame, area, app, now);
}

// =============================================================================
// Header
// =============================================================================

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Length(14), // Logo
        Constraint::Length(40), // Nav
        Constraint::Min(1),     // Search box
    ])
    .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("CINE", Theme::title()),
        Span::styled("RATE", Theme::heading()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, chunks[0]);

    let nav_style = |active: bool| {
        if active {
            Theme::title().add_modifier(Modifier::UNDERLINED)
        } else {
            Theme::text()
        }
    };
    let nav = Paragraph::new(Line::from(vec![
        Span::styled("Movies", nav_style(app.view == GridView::Popular)),
        Span::raw("  "),
        Span::styled("Suggestions", nav_style(app.view == GridView::TopRated)),
        Span::raw("  "),
        Span::styled(
            format!("Wishlist ({})", app.document.wishlist_count),
            nav_style(app.view == GridView::Wishlist),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(nav, chunks[1]);

    let editing = app.input_mode == InputMode::Editing;
    let search_line = if editing {
        let (before, after) = app.search.split_at_cursor();
        let mut rest = after.chars();
        let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".into());
        Line::from(vec![
            Span::raw("⌕ "),
            Span::raw(before.to_string()),
            Span::styled(under_cursor, Theme::input_cursor()),
            Span::raw(rest.as_str().to_string()),
        ])
    } else if app.search.query.is_empty() {
        Line::from(Span::styled(
            "⌕ Search movies or genres... (/)",
            Theme::dimmed(),
        ))
    } else {
        Line::from(format!("⌕ {}", app.search.query))
    };

    let search_box = Paragraph::new(search_line).style(Theme::input()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if editing {
                Theme::border_focused()
            } else {
                Theme::border()
            }),
    );
    frame.render_widget(search_box, chunks[2]);
}

fn render_genre_bar(frame: &mut Frame, area: Rect, app: &App) {
    let active = match &app.view {
        GridView::Genre { name, .. } => Some(name.as_str()),
        _ => None,
    };

    let mut spans = Vec::new();
    for (i, name) in QUICK_GENRES.iter().enumerate() {
        let style = if active == Some(*name) {
            Theme::selected()
        } else {
            Theme::button()
        };
        spans.push(Span::styled(format!("{}", i + 1), Theme::keybind()));
        spans.push(Span::styled(
            format!(" {} ", genre::display_name(name)),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("g", Theme::keybind()));
    spans.push(Span::styled(" All Genres ▼ ", Theme::button()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_hero(frame: &mut Frame, area: Rect, app: &App) {
    let Some(hero) = &app.document.hero else {
        return;
    };

    let para = Paragraph::new(node_lines(hero))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::border())
                .style(Style::default().bg(Theme::BACKGROUND_LIGHT)),
        );
    frame.render_widget(para, area);
}

fn render_section_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.document.section_title),
        Theme::title(),
    )));
    frame.render_widget(title, area);
}

// =============================================================================
// Grid
// =============================================================================

fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let cards = match &app.document.grid {
        Grid::Cards(cards) => cards,
        Grid::Loading(message) => {
            render_placeholder(frame, area, vec![Line::styled(message.clone(), Theme::loading())]);
            return;
        }
        Grid::Failed(message) => {
            render_placeholder(frame, area, vec![Line::styled(message.clone(), Theme::error())]);
            return;
        }
        Grid::Empty { title, hint } => {
            let mut lines = vec![Line::styled(title.clone(), Theme::heading())];
            if let Some(hint) = hint {
                lines.push(Line::from(""));
                lines.push(Line::styled(hint.clone(), Theme::dimmed()));
            }
            render_placeholder(frame, area, lines);
            return;
        }
    };

    for (i, rect) in card_rects(area, app) {
        let card = &cards[i];
        let selected = i == app.selection.selected && app.document.modal().is_none();
        let para = Paragraph::new(node_lines(&card.node))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(if selected {
                        Theme::border_focused()
                    } else {
                        Theme::border()
                    }),
            );
        frame.render_widget(para, rect);
    }
}

/// Visible cards and where they go, scrolled so the selection shows
fn card_rects(area: Rect, app: &App) -> Vec<(usize, Rect)> {
    let count = app.document.grid.cards().len();
    let columns = app.selection.columns.max(1);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selection.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);
    let card_width = area.width / columns as u16;

    (first_row * columns..count)
        .map_while(|i| {
            let row = i / columns - first_row;
            if row >= visible_rows {
                return None;
            }
            let col = i % columns;
            let rect = Rect {
                x: area.x + col as u16 * card_width,
                y: area.y + row as u16 * CARD_HEIGHT,
                width: card_width,
                height: CARD_HEIGHT.min(area.height - row as u16 * CARD_HEIGHT),
            };
            Some((i, rect))
        })
        .collect()
}

fn render_placeholder(frame: &mut Frame, area: Rect, mut lines: Vec<Line<'static>>) {
    lines.insert(0, Line::from(""));
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

// =============================================================================
// Overlays
// =============================================================================

fn render_modal(frame: &mut Frame, area: Rect, app: &App, modal: &Modal) {
    let rect = modal_rect(area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Theme::border_focused())
        .style(Style::default().bg(Theme::BACKGROUND_LIGHT));

    let lines = match modal {
        Modal::Detail { node, .. } => node_lines(node),
        Modal::GenrePicker { .. } => picker_lines(app),
    };

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(para, rect);
}

fn picker_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled("Browse by Genre", Theme::heading()),
        Line::from(""),
    ];
    let Some(Modal::GenrePicker { node }) = app.document.modal() else {
        return lines;
    };

    let choices = app.picker_actions();
    let labels = node
        .buttons()
        .into_iter()
        .filter(|(_, action, _)| choices.contains(action))
        .map(|(label, _, _)| label.to_string());

    for (i, label) in labels.enumerate() {
        if i == app.picker_selection {
            lines.push(Line::styled(format!("▸ {}", label), Theme::selected()));
        } else {
            lines.push(Line::styled(format!("  {}", label), Theme::text()));
        }
    }
    lines
}

fn render_notification(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let Some(notification) = app.document.notification() else {
        return;
    };

    let style = match notification.phase(now) {
        Phase::Visible => Theme::notification(),
        Phase::Entering | Phase::Leaving => Theme::notification_faded(),
        Phase::Expired => return,
    };

    let width = (notification.message.chars().count() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width - width,
        y: area.y + 3.min(area.height.saturating_sub(1)),
        width,
        height: 1,
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(format!(" {} ", notification.message))
            .style(style)
            .alignment(Alignment::Center),
        rect,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::GOLD),
        ),
        InputMode::Editing => Span::styled(
            " SEARCH ",
            Style::default().fg(Theme::TEXT).bg(Theme::PRIMARY),
        ),
    };

    let help = match (&app.input_mode, app.document.modal()) {
        (InputMode::Editing, _) => " ↵:search  ESC:done ",
        (_, Some(Modal::Detail { .. })) => {
            " 1-0:rate  +/-:adjust  w:wishlist  s:similar  ESC:close "
        }
        (_, Some(Modal::GenrePicker { .. })) => " ↑↓:choose  ↵:show  ESC:close ",
        (_, None) => {
            " /:search  m/t/w:nav  1-8,g:genres  ↵/click:details  space:wishlist  v/a:hero  q:quit "
        }
    };

    let status = Paragraph::new(Line::from(vec![
        mode,
        Span::styled(help, Theme::dimmed()),
    ]))
    .style(Theme::status_bar());
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(10), 1);
        assert_eq!(grid_columns(80), 3);
        assert_eq!(grid_columns(400), MAX_COLUMNS);
    }

    #[test]
    fn test_modal_rect_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = modal_rect(area);
        assert_eq!(rect, Rect::new(15, 4, 70, 32));
        assert!(rect.contains(Position::new(50, 20)));
        assert!(!rect.contains(Position::new(2, 2)));
    }

    #[test]
    fn test_modal_rect_small_terminal() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(modal_rect(area), area);
    }
}
