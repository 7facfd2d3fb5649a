use super::truncate_str;
use crate::app::{App, Choice, GRID_COLUMNS, InputMode};
use crate::contact::ACK_NOTICE;
use crate::pipeline::PAGE_SIZE;
use crate::view::{CardView, GridView};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

pub const PAGES_LABEL: &str = " Pages: ";

/// Screen areas of the main view.
pub struct Regions {
    pub header: Rect,
    pub search: Rect,
    pub filters: Rect,
    pub cards: Rect,
    pub pagination: Rect,
    pub status: Rect,
}

/// Layout: header(2) + search(3) + filters(1) + cards(min) + pages(wrapped) + status(1)
pub fn regions(area: Rect, total_pages: usize) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(pagination_height(area.width, total_pages)),
            Constraint::Length(1),
        ])
        .split(area);

    Regions {
        header: chunks[0],
        search: chunks[1],
        filters: chunks[2],
        cards: chunks[3],
        pagination: chunks[4],
        status: chunks[5],
    }
}

/// One rect per card slot, row by row.
pub fn card_rects(area: Rect) -> Vec<Rect> {
    let rows = PAGE_SIZE / GRID_COLUMNS;
    let row_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    row_chunks
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row)
                .to_vec()
        })
        .collect()
}

/// One button per page, left to right, wrapping onto further lines
/// indented past the label.
pub fn page_button_rects(area: Rect, total_pages: usize) -> Vec<(usize, Rect)> {
    let indent = area.x + PAGES_LABEL.width() as u16;
    let mut buttons = Vec::with_capacity(total_pages);
    let (mut x, mut y) = (indent, area.y);
    for page in 1..=total_pages {
        let width = page.to_string().len() as u16 + 2;
        if x > indent && x + width > area.right() {
            x = indent;
            y += 1;
        }
        if y >= area.bottom() {
            break;
        }
        buttons.push((page, Rect::new(x, y, width, 1)));
        x += width + 1;
    }
    buttons
}

/// Lines needed to show every page button at `width` columns.
pub fn pagination_height(width: u16, total_pages: usize) -> u16 {
    let unbounded = Rect {
        x: 0,
        y: 0,
        width,
        height: u16::MAX,
    };
    page_button_rects(unbounded, total_pages)
        .last()
        .map_or(1, |(_, rect)| rect.y + 1)
}

/// The page whose button covers `pos`.
pub fn page_at(area: Rect, total_pages: usize, pos: Position) -> Option<usize> {
    page_button_rects(area, total_pages)
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(page, _)| page)
}

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let regions = regions(area, app.total_pages());

    // ── Header ──
    let header_text = format!(
        " Game Catalog   [{} of {} games]",
        app.filtered.len(),
        app.catalog.len()
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, regions.header);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " 🔍 Search (Enter/Esc to finish): "
    } else {
        " 🔍 Search (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.query))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, regions.search);

    if app.input_mode == InputMode::Editing {
        let cursor_x = regions.search.x + 1 + (search_label.width() + app.query.width()) as u16;
        frame.set_cursor_position((cursor_x, regions.search.y + 1));
    }

    // ── Filter selectors ──
    let mut filter_spans = Vec::new();
    filter_spans.extend(selector_spans("g", "Genre", &app.genre));
    filter_spans.extend(selector_spans("p", "Platform", &app.platform));
    filter_spans.extend(selector_spans("y", "Year", &app.year));
    filter_spans.extend(selector_spans("o", "Sort", &app.sort));
    filter_spans.push(key_span("r"));
    filter_spans.push(Span::raw(" Reset"));
    frame.render_widget(Paragraph::new(Line::from(filter_spans)), regions.filters);

    // ── Cards / notices ──
    let grid = app.grid_view();
    let total_pages = grid.page_buttons();
    match grid {
        GridView::LoadFailed { notice } => {
            render_notice(frame, regions.cards, notice, Color::Red);
        }
        GridView::Empty { notice } => {
            render_notice(frame, regions.cards, notice, Color::DarkGray);
        }
        GridView::Page {
            cards,
            page,
            selected,
            ..
        } => {
            for (slot, (card, rect)) in cards.iter().zip(card_rects(regions.cards)).enumerate() {
                render_card(frame, rect, card, slot == selected);
            }
            render_pagination(frame, regions.pagination, page, total_pages);
        }
    }

    // ── Status bar ──
    let mut status_spans = vec![
        key_span(" ←↑↓→"),
        Span::raw(" Select  "),
        key_span("Enter"),
        Span::raw(" Detail  "),
        key_span("[ ]"),
        Span::raw(" Page  "),
        key_span("c"),
        Span::raw(" Contact  "),
        key_span("?"),
        Span::raw(" Help  "),
        key_span("q"),
        Span::raw(" Quit  "),
    ];
    if app.contact.ack_visible() {
        status_spans.push(Span::styled(
            ACK_NOTICE,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    } else {
        status_spans.push(Span::styled(
            &app.status_msg,
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status_spans)), regions.status);
}

fn key_span(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn selector_spans<'a, T: Display + PartialEq>(
    key: &'a str,
    label: &'a str,
    choice: &Choice<T>,
) -> Vec<Span<'a>> {
    let value = match choice.selected() {
        Some(v) => v.to_string(),
        None if choice.options().is_empty() => "-".to_string(),
        None => "Any".to_string(),
    };
    let value_style = if choice.selected().is_some() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    vec![
        Span::raw(" "),
        key_span(key),
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("[{}]", value), value_style),
        Span::raw(" "),
    ]
}

fn render_notice(frame: &mut Frame, area: Rect, notice: String, color: Color) {
    let notice = Paragraph::new(vec![Line::from(""), Line::from(notice)])
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(notice, area);
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView, selected: bool) {
    let border_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = truncate_str(&card.title, (area.width as usize).saturating_sub(4));

    let lines = vec![
        Line::from(Span::styled(&card.summary, Style::default().fg(Color::Yellow))),
        Line::from(vec![
            Span::styled("Cover: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&card.cover, Style::default().fg(Color::Blue)),
        ]),
        Line::from(""),
        Line::from(card.excerpt.as_str()),
    ];

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", title)),
        );
    frame.render_widget(widget, area);
}

fn render_pagination(frame: &mut Frame, area: Rect, page: usize, total_pages: usize) {
    let mut lines = Vec::new();
    let mut spans = vec![Span::styled(PAGES_LABEL, Style::default().fg(Color::DarkGray))];
    let mut row = area.y;
    for (n, rect) in page_button_rects(area, total_pages) {
        if rect.y != row {
            lines.push(Line::from(std::mem::take(&mut spans)));
            spans.push(Span::raw(" ".repeat(PAGES_LABEL.width())));
            row = rect.y;
        }
        let style = if n == page {
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} ", n), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_card_slots() {
        let rects = card_rects(Rect::new(0, 0, 90, 20));
        assert_eq!(rects.len(), PAGE_SIZE);
        assert_eq!(rects[0].y, rects[2].y);
        assert!(rects[3].y > rects[0].y);
    }

    #[test]
    fn test_page_button_hit_testing() {
        let area = Rect::new(0, 30, 80, 1);
        let buttons = page_button_rects(area, 12);
        assert_eq!(buttons.len(), 12);
        assert_eq!(buttons[0].1.x, PAGES_LABEL.len() as u16);

        let (_, third) = buttons[2];
        assert_eq!(page_at(area, 12, Position::new(third.x + 1, 30)), Some(3));
        assert_eq!(page_at(area, 12, Position::new(0, 30)), None);
        assert_eq!(page_at(area, 12, Position::new(third.x, 29)), None);
    }

    #[test]
    fn test_page_buttons_wrap_at_edge() {
        let area = Rect::new(0, 0, 20, 4);
        // label takes 8 columns, each single-digit button 3 plus a gap
        let buttons = page_button_rects(area, 10);
        assert_eq!(buttons.len(), 10);
        assert_eq!(buttons[2].1.y, 0);
        assert_eq!(buttons[3].1, Rect::new(8, 1, 3, 1));
        assert_eq!(pagination_height(20, 10), 4);
        assert_eq!(pagination_height(80, 10), 1);
        assert_eq!(pagination_height(80, 0), 1);
    }

    #[test]
    fn test_regions_grow_for_many_pages() {
        let area = Rect::new(0, 0, 80, 30);
        assert_eq!(regions(area, 3).pagination.height, 1);
        let many = regions(area, 34);
        assert_eq!(many.pagination.height, pagination_height(80, 34));
        assert!(many.pagination.height > 1);
        assert_eq!(many.status.y, 29);
        assert_eq!(page_button_rects(many.pagination, 34).len(), 34);
    }
}
