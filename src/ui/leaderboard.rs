use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::models::{ScoreEntry, format_prize};

/// Ranked list of the best scores.
pub fn render(frame: &mut Frame, area: Rect, entries: &[ScoreEntry]) {
    let lines: Vec<Line> = if entries.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Seja o primeiro a vencer!",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let rank_style = match index {
                    0 => Style::default().fg(Color::Yellow).bold(),
                    1 => Style::default().fg(Color::White),
                    2 => Style::default().fg(Color::LightRed),
                    _ => Style::default().fg(Color::DarkGray),
                };

                Line::from(vec![
                    Span::styled(format!("{}. ", index + 1), rank_style),
                    Span::styled(format!("{:<16}", entry.name), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{:>14}", format_prize(entry.score)),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(format!("  {}", entry.date), Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Top Jogadores ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
