use ratatui::{prelude::*, widgets::Paragraph};

use crate::session::Session;

use super::TITLE;

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Fill(1),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Yellow).bold())),
        Line::from("Teste seu inglês e ganhe milhões (virtuais)!".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Seu nome: ", Style::default().fg(Color::White)),
            Span::styled(session.name(), Style::default().fg(Color::Yellow)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    match session.message() {
        Some(message) => content.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "[Enter] jogar agora  ·  [Esc] sair",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);

    let board = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .split(chunks[2]);
    super::leaderboard::render(frame, board[1], session.leaderboard().top());
}
