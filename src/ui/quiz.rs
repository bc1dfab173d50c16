use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::models::{PRIZE_LADDER, Question, Screen, format_prize};
use crate::session::Session;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];
const LADDER_WIDTH: u16 = 22;

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(LADDER_WIDTH)])
        .margin(1)
        .split(area);
    render_ladder(frame, columns[1], session.position());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(columns[0]);

    render_progress(frame, chunks[0], session);

    match session.current_question() {
        Some(question) if !session.is_swapping() => {
            render_question_text(frame, chunks[1], &question.text);
            render_options(frame, chunks[2], question, session);
        }
        _ => render_notice(frame, chunks[1], session),
    }

    if session.screen() == Screen::Feedback {
        render_feedback(frame, chunks[3], session);
    } else {
        render_hint(frame, chunks[3], session);
    }

    render_lifelines(frame, chunks[4], session);
    render_controls(frame, chunks[5], session.screen());
}

fn render_progress(frame: &mut Frame, area: Rect, session: &Session) {
    let tier = session
        .current_question()
        .map(|question| question.tier.as_str())
        .unwrap_or("");
    let line = Line::from(vec![
        Span::styled(
            format!("Questão {} de {}", session.position() + 1, PRIZE_LADDER.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("  ·  {}", tier), Style::default().fg(Color::DarkGray)),
        Span::styled("  ·  Valendo ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_prize(session.prize_at_stake()),
            Style::default().fg(Color::Yellow).bold(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, session: &Session) {
    let text = if session.is_swapping() {
        "Trocando pergunta..."
    } else {
        "Carregando pergunta..."
    };
    let widget = Paragraph::new(text).fg(Color::Cyan).italic();
    frame.render_widget(widget, area);
}

fn option_style(index: usize, question: &Question, session: &Session) -> Style {
    if session.screen() == Screen::Feedback {
        if index == question.correct_index {
            return Style::default().fg(Color::Green).bold();
        }
        if session.selected() == Some(index) {
            return Style::default().fg(Color::Red).bold();
        }
        return Style::default().fg(Color::DarkGray);
    }

    if session.is_hidden(index) {
        Style::default().fg(Color::DarkGray).crossed_out()
    } else if index == session.cursor() {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, session: &Session) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let style = option_style(index, question, session);
        let is_cursor = session.screen() == Screen::Playing && index == session.cursor();
        let marker = if is_cursor { ">" } else { " " };
        let text = if session.is_hidden(index) { "" } else { option.as_str() };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(text, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_hint(frame: &mut Frame, area: Rect, session: &Session) {
    let text = match session.hint() {
        Some(hint) => hint,
        None if session.is_hint_pending() => "Pensando em uma dica...",
        None => return,
    };

    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::Yellow)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .title(" Dica ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, session: &Session) {
    let Some(question) = session.current_question() else {
        return;
    };
    let (verdict, color) = match session.answered_correctly() {
        Some(true) => ("Resposta certa!", Color::Green),
        _ => ("Resposta errada!", Color::Red),
    };

    let content = vec![
        Line::from(Span::styled(verdict, Style::default().fg(color).bold())),
        Line::from(Span::styled(
            question.explanation.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .title(" Explicação ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn lifeline_span(label: String, available: bool) -> Span<'static> {
    let style = if available {
        Style::default().fg(Color::Magenta).bold()
    } else {
        Style::default().fg(Color::DarkGray).crossed_out()
    };
    Span::styled(label, style)
}

fn render_lifelines(frame: &mut Frame, area: Rect, session: &Session) {
    let lifelines = session.lifelines();
    let idle = !session.is_swapping();

    let line = Line::from(vec![
        lifeline_span("[1] 50:50".to_string(), lifelines.fifty_fifty && idle),
        Span::raw("   "),
        lifeline_span(format!("[2] Pular ({})", lifelines.skips), lifelines.can_skip() && idle),
        Span::raw("   "),
        lifeline_span("[3] Dica".to_string(), lifelines.hint && idle),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_ladder(frame: &mut Frame, area: Rect, position: usize) {
    let lines: Vec<Line> = PRIZE_LADDER
        .iter()
        .enumerate()
        .rev()
        .map(|(index, prize)| {
            let style = if index == position {
                Style::default().fg(Color::Black).bg(Color::Yellow).bold()
            } else if index < position {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(
                format!("{:>2} {:>15}", index + 1, format_prize(*prize)),
                style,
            ))
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, screen: Screen) {
    let text = match screen {
        Screen::Feedback => "enter continuar  ·  esc sair",
        _ => "j/k navegar  ·  a-d responder  ·  enter confirmar  ·  esc sair",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
