mod leaderboard;
mod quiz;
mod result;
mod start;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::models::Screen;
use crate::session::Session;

pub const TITLE: &str = "SHOW DO INGLÊS";

pub fn render(frame: &mut Frame, session: &Session) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match session.screen() {
        Screen::Start => start::render(frame, area, session),
        Screen::Loading => render_loading(frame, area),
        Screen::Playing | Screen::Feedback => quiz::render(frame, area, session),
        Screen::GameOver | Screen::Victory => result::render(frame, area, session),
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(5),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Yellow).bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Preparando perguntas...",
            Style::default().fg(Color::Cyan),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
