use super::centered_rect;
use crate::app::App;
use crate::contact::{ACK_NOTICE, ContactField};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Where the contact form is drawn; clicks outside it close it.
pub fn overlay_area(area: Rect) -> Rect {
    centered_rect(60, 60, area)
}

/// Render the contact form overlay
pub fn render(app: &App, frame: &mut Frame) {
    let area = overlay_area(frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Contact ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let form = &app.contact;
    for (field, chunk) in ContactField::ALL.iter().zip(chunks.iter()) {
        let focused = *field == form.focus;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(form.value(*field))
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(format!(" {} ", field.label())),
            );
        frame.render_widget(input, *chunk);

        if focused && *field != ContactField::Message {
            let cursor_x = chunk.x + 1 + form.value(*field).width() as u16;
            frame.set_cursor_position((cursor_x.min(chunk.right().saturating_sub(2)), chunk.y + 1));
        }
    }

    // Acknowledgment if present
    if form.ack_visible() {
        let ack = Paragraph::new(ACK_NOTICE)
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(ack, chunks[3]);
    }

    let help = Paragraph::new("Tab: Next field | Enter: Send | Esc: Close")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}
