use super::centered_rect;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("Ctrl+C", "Quit application"),
            ("Esc", "Back / close overlay"),
        ],
    ),
    (
        "Catalog",
        &[
            ("←↑↓→/hjkl", "Select a card"),
            ("Enter", "Open game detail (or click a card)"),
            ("/", "Search title, description, developer, tags"),
            ("g/G", "Next/previous genre"),
            ("p/P", "Next/previous platform"),
            ("y/Y", "Next/previous year"),
            ("o/O", "Next/previous sort order"),
            ("r", "Reset filters"),
            ("[ ] 1-9", "Previous/next page, jump to page"),
            ("c", "Contact form"),
            ("q", "Quit application"),
        ],
    ),
    (
        "Detail",
        &[("Esc/q", "Close (or click outside, or [x])")],
    ),
    (
        "Contact",
        &[
            ("Tab", "Next field"),
            ("Enter", "Send"),
        ],
    ),
];

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (section, keys) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {}", section),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys.iter() {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {:<12}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(
                    Line::from(" Press ? or Esc to close ")
                        .style(Style::default().fg(Color::DarkGray))
                        .alignment(Alignment::Center),
                ),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str) -> &'static [(&'static str, &'static str)] {
        SECTIONS
            .iter()
            .find(|(title, _)| *title == name)
            .map(|(_, keys)| *keys)
            .unwrap()
    }

    #[test]
    fn test_q_listed_only_where_it_quits() {
        assert!(section("Global").iter().all(|(key, _)| *key != "q"));
        assert!(section("Catalog").contains(&("q", "Quit application")));
    }
}
