use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::models::{Screen, format_prize};
use crate::session::Session;

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_summary(frame, chunks[1], session);

    let board = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .split(chunks[2]);
    super::leaderboard::render(frame, board[1], session.leaderboard().top());

    render_controls(frame, chunks[4]);
}

fn render_summary(frame: &mut Frame, area: Rect, session: &Session) {
    let (title, color) = match session.screen() {
        Screen::Victory => ("VOCÊ GANHOU O PRÊMIO MÁXIMO!", Color::Yellow),
        _ => ("FIM DE JOGO", Color::Red),
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(color).bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Prêmio total",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format_prize(session.final_prize()),
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(""),
    ];

    if session.is_new_record() {
        content.push(Line::from(Span::styled(
            "NOVO RECORDE!",
            Style::default().fg(Color::Yellow).bold(),
        )));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("r jogar novamente  ·  q sair")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
