//! # show-do-milhao
//!
//! A terminal quiz show: ten multiple-choice questions of rising difficulty,
//! a prize ladder from R$ 1.000 to R$ 1.000.000, three lifelines and a local
//! leaderboard.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use show_do_milhao::{FileStore, Leaderboard, Session, Show, ShowError, StaticSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ShowError> {
//!     let questions = show_do_milhao::builtin_questions()?;
//!     let source = StaticSource::new(questions, StdRng::from_entropy());
//!     let leaderboard = Leaderboard::load(Box::new(FileStore::new(".")));
//!     let session = Session::new(leaderboard, StdRng::from_entropy());
//!
//!     Show::new(session, Arc::new(source)).run().await
//! }
//! ```

mod data;
mod leaderboard;
mod lifelines;
mod models;
mod session;
mod source;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;
use tokio::sync::mpsc;

pub use data::{LoadError, builtin_questions, load_questions_from_json, parse_questions};
pub use leaderboard::{
    BlobStore, DEFAULT_NAME, FileStore, LEADERBOARD_KEY, Leaderboard, MemoryStore, StoreError,
};
pub use lifelines::{Lifelines, pick_hidden_options};
pub use models::{
    PRIZE_LADDER, Question, QuestionError, QuestionRecord, ScoreEntry, Screen, Tier, format_prize,
    guaranteed_prize, prize_at, top_prize,
};
pub use session::{HINT_FALLBACK, LOAD_FAILED, NAME_REQUIRED, Outcome, Purpose, Request, Session, Ticket};
pub use source::{
    CommandGenerator, FetchError, FetchKind, GeneratedSource, QuestionQuery, QuestionSource,
    StaticDelays, StaticSource, TextGenerator, extract_json_object, parse_generated_question,
    select_question,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for running the game.
#[derive(Debug, Error)]
pub enum ShowError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A game wired to its question source, ready to run in the terminal.
pub struct Show {
    session: Session,
    source: Arc<dyn QuestionSource>,
}

impl Show {
    pub fn new(session: Session, source: Arc<dyn QuestionSource>) -> Self {
        Self { session, source }
    }

    /// Takes over the terminal until the player quits.
    pub async fn run(mut self) -> Result<(), ShowError> {
        let mut term = terminal::TerminalGuard::new()?;
        run_event_loop(&mut term, &mut self.session, self.source).await
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Dispatch(Request),
    Quit,
}

impl From<Option<Request>> for Action {
    fn from(request: Option<Request>) -> Self {
        request.map_or(Action::Continue, Action::Dispatch)
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    session: &mut Session,
    source: Arc<dyn QuestionSource>,
) -> Result<(), ShowError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    loop {
        while let Ok(outcome) = rx.try_recv() {
            session.apply(outcome);
        }
        if let Some(request) = session.prefetch() {
            dispatch(&source, &tx, request);
        }

        terminal.draw(|frame| ui::render(frame, session))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_input(session, key.code) {
                    Action::Continue => {}
                    Action::Dispatch(request) => dispatch(&source, &tx, request),
                    Action::Quit => break,
                }
            }
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Runs `request` in the background and posts the outcome back to the loop.
fn dispatch(
    source: &Arc<dyn QuestionSource>,
    tx: &mpsc::UnboundedSender<Outcome>,
    request: Request,
) {
    log::debug!("dispatching {:?}", request.ticket());
    let source = Arc::clone(source);
    let tx = tx.clone();

    tokio::spawn(async move {
        let outcome = request.run(source.as_ref()).await;
        if tx.send(outcome).is_err() {
            log::debug!("event loop closed before a fetch finished");
        }
    });
}

fn handle_input(session: &mut Session, key: KeyCode) -> Action {
    match session.screen() {
        Screen::Start => handle_start_input(session, key),
        Screen::Loading => handle_loading_input(key),
        Screen::Playing => handle_playing_input(session, key),
        Screen::Feedback => handle_feedback_input(session, key),
        Screen::GameOver | Screen::Victory => handle_result_input(session, key),
    }
}

fn is_quit(key: KeyCode) -> bool {
    matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
}

fn handle_start_input(session: &mut Session, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => session.start().into(),
        KeyCode::Backspace => {
            session.pop_name_char();
            Action::Continue
        }
        KeyCode::Char(c) => {
            session.push_name_char(c);
            Action::Continue
        }
        KeyCode::Esc => Action::Quit,
        _ => Action::Continue,
    }
}

fn handle_loading_input(key: KeyCode) -> Action {
    if is_quit(key) {
        Action::Quit
    } else {
        Action::Continue
    }
}

fn handle_playing_input(session: &mut Session, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => session.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => session.move_cursor_down(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            session.confirm();
        }
        KeyCode::Char(c @ 'a'..='d') => {
            session.select(c as usize - 'a' as usize);
        }
        KeyCode::Char('1') => {
            session.eliminate_two();
        }
        KeyCode::Char('2') => return session.replace_question().into(),
        KeyCode::Char('3') => return session.reveal_hint().into(),
        key if is_quit(key) => return Action::Quit,
        _ => {}
    }
    Action::Continue
}

fn handle_feedback_input(session: &mut Session, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter | KeyCode::Char(' ') => {
            session.advance();
            Action::Continue
        }
        key if is_quit(key) => Action::Quit,
        _ => Action::Continue,
    }
}

fn handle_result_input(session: &mut Session, key: KeyCode) -> Action {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
            session.restart();
            Action::Continue
        }
        key if is_quit(key) => Action::Quit,
        _ => Action::Continue,
    }
}
