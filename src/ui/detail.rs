use super::centered_rect;
use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Where the detail overlay is drawn; clicks outside it dismiss it.
pub fn overlay_area(area: Rect) -> Rect {
    centered_rect(70, 80, area)
}

/// The `[x]` close control in the overlay's top-right corner.
pub fn close_button(overlay: Rect) -> Rect {
    Rect::new(overlay.right().saturating_sub(4), overlay.y, 3, 1)
}

fn field<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

pub fn render(app: &App, frame: &mut Frame) {
    let detail = match &app.detail {
        Some(d) => d,
        None => return,
    };
    let area = overlay_area(frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(" Cover: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                &detail.cover,
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(""),
        field(" Genre: ", &detail.genre),
        field(" Platform: ", &detail.platform),
        field(" Year: ", &detail.year),
        field(" Developer: ", &detail.developer),
        Line::from(""),
        Line::from(format!(" {}", detail.description)),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Tags: {}", detail.tags),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    format!(" {} ", detail.title),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ))
                .title_bottom(
                    Line::from(" Esc or click outside to close ")
                        .style(Style::default().fg(Color::DarkGray))
                        .alignment(Alignment::Right),
                ),
        );
    frame.render_widget(content, area);

    let close = Paragraph::new("[x]").style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(close, close_button(area));
}
