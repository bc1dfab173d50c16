//! The game flow: Start → Loading → Playing ⇄ Feedback → GameOver | Victory.
//!
//! [`Session`] never waits on anything itself. Whenever it needs a question
//! or a hint it hands back a [`Request`]; the caller runs it against a
//! [`QuestionSource`] and feeds the resulting [`Outcome`] to
//! [`Session::apply`]. Every request carries a [`Ticket`] naming the game
//! and ladder position it was made for, so answers that arrive after a
//! restart or a move to another position are dropped instead of applied.

use std::collections::HashSet;

use rand::rngs::StdRng;

use crate::leaderboard::Leaderboard;
use crate::lifelines::{Lifelines, pick_hidden_options};
use crate::models::{PRIZE_LADDER, Question, Screen, guaranteed_prize, prize_at, top_prize};
use crate::source::{FetchError, FetchKind, QuestionQuery, QuestionSource};

pub const MAX_NAME_LEN: usize = 15;
pub const NAME_REQUIRED: &str = "Por favor, digite seu nome para começar.";
pub const LOAD_FAILED: &str = "Não foi possível carregar as perguntas. Tente novamente.";
pub const HINT_FALLBACK: &str = "Confie no seu instinto!";

const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Question(FetchKind),
    Hint,
}

/// Identifies what an asynchronous result was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub position: usize,
    pub purpose: Purpose,
}

/// Work the session needs done outside of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Question { ticket: Ticket, query: QuestionQuery },
    Hint { ticket: Ticket, question: Question },
}

impl Request {
    pub fn ticket(&self) -> Ticket {
        match self {
            Request::Question { ticket, .. } | Request::Hint { ticket, .. } => *ticket,
        }
    }

    /// Runs the request against `source`.
    pub async fn run(self, source: &dyn QuestionSource) -> Outcome {
        match self {
            Request::Question { ticket, query } => Outcome::Question {
                ticket,
                result: source.fetch(query).await,
            },
            Request::Hint { ticket, question } => Outcome::Hint {
                ticket,
                result: source.hint(&question).await,
            },
        }
    }
}

/// The result of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Question {
        ticket: Ticket,
        result: Result<Question, FetchError>,
    },
    Hint {
        ticket: Ticket,
        result: Result<String, FetchError>,
    },
}

impl Outcome {
    pub fn ticket(&self) -> Ticket {
        match self {
            Outcome::Question { ticket, .. } | Outcome::Hint { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HintState {
    Hidden,
    Pending,
    Shown(String),
}

pub struct Session {
    screen: Screen,
    name: String,
    message: Option<String>,
    generation: u64,
    questions: Vec<Question>,
    used_ids: Vec<String>,
    position: usize,
    cursor: usize,
    selected: Option<usize>,
    hidden: Vec<usize>,
    hint: HintState,
    lifelines: Lifelines,
    swapping: bool,
    in_flight: HashSet<usize>,
    final_prize: u32,
    leaderboard: Leaderboard,
    rng: StdRng,
}

impl Session {
    pub fn new(leaderboard: Leaderboard, rng: StdRng) -> Self {
        Self {
            screen: Screen::Start,
            name: String::new(),
            message: None,
            generation: 0,
            questions: Vec::new(),
            used_ids: Vec::new(),
            position: 0,
            cursor: 0,
            selected: None,
            hidden: Vec::new(),
            hint: HintState::Hidden,
            lifelines: Lifelines::default(),
            swapping: false,
            in_flight: HashSet::new(),
            final_prize: 0,
            leaderboard,
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validation or loading error to show on the start screen.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn prize_at_stake(&self) -> u32 {
        prize_at(self.position)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// Playing, but the question for this position has not arrived yet.
    pub fn is_waiting(&self) -> bool {
        self.screen == Screen::Playing && self.current_question().is_none()
    }

    pub fn is_swapping(&self) -> bool {
        self.swapping
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn hidden_options(&self) -> &[usize] {
        &self.hidden
    }

    pub fn is_hidden(&self, option: usize) -> bool {
        self.hidden.contains(&option)
    }

    pub fn hint(&self) -> Option<&str> {
        match &self.hint {
            HintState::Shown(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_hint_pending(&self) -> bool {
        self.hint == HintState::Pending
    }

    pub fn lifelines(&self) -> Lifelines {
        self.lifelines
    }

    /// Whether the recorded answer is right; `None` outside of feedback.
    pub fn answered_correctly(&self) -> Option<bool> {
        if self.screen != Screen::Feedback {
            return None;
        }
        let question = self.current_question()?;
        self.selected.map(|choice| question.is_correct(choice))
    }

    pub fn final_prize(&self) -> u32 {
        self.final_prize
    }

    /// The prize just won matches or beats every saved score.
    pub fn is_new_record(&self) -> bool {
        self.final_prize > 0
            && self
                .leaderboard
                .best_score()
                .is_some_and(|best| self.final_prize >= best)
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn push_name_char(&mut self, c: char) {
        if self.screen == Screen::Start && !c.is_control() && self.name.chars().count() < MAX_NAME_LEN {
            self.name.push(c);
            self.message = None;
        }
    }

    pub fn pop_name_char(&mut self) {
        if self.screen == Screen::Start {
            self.name.pop();
            self.message = None;
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(MAX_NAME_LEN).collect();
        self.message = None;
    }

    /// Begins a new game and asks for its first question.
    pub fn start(&mut self) -> Option<Request> {
        if self.screen != Screen::Start {
            return None;
        }
        if self.name.trim().is_empty() {
            self.message = Some(NAME_REQUIRED.to_string());
            return None;
        }

        self.reset_game();
        self.screen = Screen::Loading;
        log::info!("starting game {} for {}", self.generation, self.name.trim());
        Some(self.question_request(0, FetchKind::Opening))
    }

    /// Asks for the next position's question ahead of time, if it is due.
    pub fn prefetch(&mut self) -> Option<Request> {
        if self.screen != Screen::Playing {
            return None;
        }

        let next = self.questions.len();
        if next >= PRIZE_LADDER.len() || next >= self.position + 2 || self.in_flight.contains(&next) {
            return None;
        }

        Some(self.question_request(next, FetchKind::Prefetch))
    }

    pub fn move_cursor_down(&mut self) {
        self.step_cursor(1);
    }

    pub fn move_cursor_up(&mut self) {
        self.step_cursor(OPTION_COUNT - 1);
    }

    pub fn confirm(&mut self) -> bool {
        self.select(self.cursor)
    }

    /// Locks in an answer and shows the feedback.
    pub fn select(&mut self, option: usize) -> bool {
        if self.screen != Screen::Playing
            || self.swapping
            || option >= OPTION_COUNT
            || self.is_hidden(option)
            || self.current_question().is_none()
        {
            return false;
        }

        self.selected = Some(option);
        self.screen = Screen::Feedback;
        true
    }

    /// Leaves the feedback screen: next question, victory or game over.
    pub fn advance(&mut self) -> bool {
        if self.screen != Screen::Feedback {
            return false;
        }
        let Some(correct) = self.answered_correctly() else {
            return false;
        };

        if !correct {
            self.finish(guaranteed_prize(self.position), Screen::GameOver);
        } else if self.position + 1 >= PRIZE_LADDER.len() {
            self.finish(top_prize(), Screen::Victory);
        } else {
            self.position += 1;
            self.clear_question_state();
            self.screen = Screen::Playing;
        }
        true
    }

    /// 50:50 lifeline.
    pub fn eliminate_two(&mut self) -> bool {
        if !self.lifeline_usable() || !self.lifelines.fifty_fifty {
            return false;
        }
        let Some(correct) = self.current_question().map(|q| q.correct_index) else {
            return false;
        };

        self.hidden = pick_hidden_options(correct, &mut self.rng).to_vec();
        self.lifelines.fifty_fifty = false;
        if self.is_hidden(self.cursor) {
            self.cursor = correct;
        }
        true
    }

    /// Skip lifeline: asks for a different question at the same position.
    ///
    /// The skip is only spent once the replacement arrives.
    pub fn replace_question(&mut self) -> Option<Request> {
        if !self.lifeline_usable() || !self.lifelines.can_skip() {
            return None;
        }
        let replacing = self.current_question()?.id.clone();

        self.swapping = true;
        self.hint = HintState::Hidden;
        let query = QuestionQuery::new(self.position, FetchKind::Replacement)
            .excluding(self.used_ids.iter().cloned())
            .replacing(replacing);

        Some(Request::Question {
            ticket: self.ticket(self.position, Purpose::Question(FetchKind::Replacement)),
            query,
        })
    }

    /// Hint lifeline. Questions that carry their own hint show it right away.
    pub fn reveal_hint(&mut self) -> Option<Request> {
        if !self.lifeline_usable() || !self.lifelines.hint {
            return None;
        }
        let question = self.current_question()?.clone();

        self.lifelines.hint = false;
        match &question.hint {
            Some(text) => {
                self.hint = HintState::Shown(text.clone());
                None
            }
            None => {
                self.hint = HintState::Pending;
                Some(Request::Hint {
                    ticket: self.ticket(self.position, Purpose::Hint),
                    question,
                })
            }
        }
    }

    /// Back to the start screen after a finished game.
    pub fn restart(&mut self) -> bool {
        if !self.screen.is_terminal() {
            return false;
        }
        self.reset_game();
        self.screen = Screen::Start;
        true
    }

    /// Applies a finished request, unless it belongs to an older game or position.
    pub fn apply(&mut self, outcome: Outcome) {
        let ticket = outcome.ticket();
        if ticket.generation != self.generation {
            log::debug!(
                "dropping {:?} from game {} (current game {})",
                ticket.purpose,
                ticket.generation,
                self.generation
            );
            return;
        }

        match outcome {
            Outcome::Question { ticket, result } => match ticket.purpose {
                Purpose::Question(FetchKind::Opening) => self.apply_opening(result),
                Purpose::Question(FetchKind::Prefetch) => self.apply_prefetch(ticket.position, result),
                Purpose::Question(FetchKind::Replacement) => {
                    self.apply_replacement(ticket.position, result)
                }
                Purpose::Hint => log::warn!("question outcome with a hint ticket"),
            },
            Outcome::Hint { ticket, result } => self.apply_hint(ticket.position, result),
        }
    }

    fn apply_opening(&mut self, result: Result<Question, FetchError>) {
        self.in_flight.remove(&0);
        if self.screen != Screen::Loading {
            return;
        }

        match result {
            Ok(question) => {
                self.remember(&question);
                self.questions = vec![question];
                self.position = 0;
                self.lifelines = Lifelines::default();
                self.clear_question_state();
                self.screen = Screen::Playing;
            }
            Err(err) => {
                log::error!("could not load the first question: {}", err);
                self.reset_game();
                self.message = Some(LOAD_FAILED.to_string());
                self.screen = Screen::Start;
            }
        }
    }

    fn apply_prefetch(&mut self, position: usize, result: Result<Question, FetchError>) {
        self.in_flight.remove(&position);

        match result {
            Ok(question) if position == self.questions.len() => {
                log::debug!("question for position {} is ready", position);
                self.remember(&question);
                self.questions.push(question);
            }
            Ok(_) => log::debug!("dropping prefetched question for filled position {}", position),
            Err(err) => log::warn!("prefetch for position {} failed: {}", position, err),
        }
    }

    fn apply_replacement(&mut self, position: usize, result: Result<Question, FetchError>) {
        if !self.swapping || position != self.position {
            return;
        }
        self.swapping = false;

        match result {
            Ok(question) => {
                self.remember(&question);
                self.questions[position] = question;
                self.selected = None;
                self.hidden.clear();
                self.hint = HintState::Hidden;
                self.cursor = 0;
                self.lifelines.skips -= 1;
            }
            Err(err) => log::warn!("could not replace question {}: {}", position, err),
        }
    }

    fn apply_hint(&mut self, position: usize, result: Result<String, FetchError>) {
        if position != self.position || self.hint != HintState::Pending {
            return;
        }

        let text = result.unwrap_or_else(|err| {
            log::warn!("hint request failed: {}", err);
            HINT_FALLBACK.to_string()
        });
        self.hint = HintState::Shown(text);
    }

    fn lifeline_usable(&self) -> bool {
        self.screen == Screen::Playing && !self.swapping && self.current_question().is_some()
    }

    fn question_request(&mut self, position: usize, kind: FetchKind) -> Request {
        self.in_flight.insert(position);
        let query = QuestionQuery::new(position, kind).excluding(self.used_ids.iter().cloned());

        Request::Question {
            ticket: self.ticket(position, Purpose::Question(kind)),
            query,
        }
    }

    fn ticket(&self, position: usize, purpose: Purpose) -> Ticket {
        Ticket {
            generation: self.generation,
            position,
            purpose,
        }
    }

    fn remember(&mut self, question: &Question) {
        if let Some(id) = &question.id {
            if !self.used_ids.contains(id) {
                self.used_ids.push(id.clone());
            }
        }
    }

    fn step_cursor(&mut self, step: usize) {
        if self.screen != Screen::Playing {
            return;
        }
        for _ in 0..OPTION_COUNT {
            self.cursor = (self.cursor + step) % OPTION_COUNT;
            if !self.is_hidden(self.cursor) {
                break;
            }
        }
    }

    fn finish(&mut self, prize: u32, screen: Screen) {
        self.final_prize = prize;
        self.screen = screen;
        log::info!("game {} ended on {:?} with {}", self.generation, screen, prize);

        if let Err(err) = self.leaderboard.record(&self.name, prize) {
            log::error!("could not save the leaderboard: {}", err);
        }
    }

    fn clear_question_state(&mut self) {
        self.selected = None;
        self.cursor = 0;
        self.hidden.clear();
        self.hint = HintState::Hidden;
    }

    /// Drops everything tied to the current game. Bumps the generation so
    /// late results of the old game are ignored.
    fn reset_game(&mut self) {
        self.generation += 1;
        self.questions.clear();
        self.used_ids.clear();
        self.position = 0;
        self.lifelines = Lifelines::default();
        self.swapping = false;
        self.in_flight.clear();
        self.final_prize = 0;
        self.message = None;
        self.clear_question_state();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::data::builtin_questions;
    use crate::leaderboard::{LEADERBOARD_KEY, MemoryStore};
    use crate::models::{ScoreEntry, Tier};
    use crate::source::{StaticDelays, StaticSource};

    fn session() -> Session {
        session_with(MemoryStore::new())
    }

    fn session_with(store: MemoryStore) -> Session {
        let mut session = Session::new(
            Leaderboard::load(Box::new(store)),
            StdRng::seed_from_u64(42),
        );
        session.set_name("Ana");
        session
    }

    /// Answers a question request with a fresh question whose right answer is option 0.
    fn answer(request: Request) -> Outcome {
        let Request::Question { ticket, query } = request else {
            panic!("expected a question request");
        };
        let id = format!("p{}-{}", query.position, query.exclude.len());
        let question = Question::new(
            format!("Pergunta {}", query.position),
            ["certa", "errada 1", "errada 2", "errada 3"].map(String::from).to_vec(),
            0,
            "Explicação",
            Tier::for_position(query.position),
        )
        .unwrap()
        .with_id(id);

        Outcome::Question {
            ticket,
            result: Ok(question),
        }
    }

    fn failure(request: Request) -> Outcome {
        match request {
            Request::Question { ticket, .. } => Outcome::Question {
                ticket,
                result: Err(FetchError::Timeout),
            },
            Request::Hint { ticket, .. } => Outcome::Hint {
                ticket,
                result: Err(FetchError::Timeout),
            },
        }
    }

    fn begin(session: &mut Session) {
        let request = session.start().unwrap();
        session.apply(answer(request));
        assert_eq!(session.screen(), Screen::Playing);
    }

    fn fill_prefetch(session: &mut Session) {
        if let Some(request) = session.prefetch() {
            session.apply(answer(request));
        }
    }

    fn answer_current(session: &mut Session, correct: bool) {
        fill_prefetch(session);
        let choice = if correct { 0 } else { 1 };
        assert!(session.select(choice));
        assert!(session.advance());
    }

    fn saved_scores(session: &Session) -> Vec<ScoreEntry> {
        session
            .leaderboard()
            .store()
            .get(LEADERBOARD_KEY)
            .unwrap()
            .map(|blob| serde_json::from_str(&blob).unwrap())
            .unwrap_or_default()
    }

    #[test]
    fn blank_name_keeps_the_start_screen() {
        let mut session = session();
        session.set_name("   ");

        assert!(session.start().is_none());
        assert_eq!(session.screen(), Screen::Start);
        assert_eq!(session.message(), Some(NAME_REQUIRED));
    }

    #[test]
    fn name_is_capped() {
        let mut session = session();
        session.set_name("");
        for c in "abcdefghijklmnopqrstuvwxyz".chars() {
            session.push_name_char(c);
        }
        assert_eq!(session.name(), "abcdefghijklmno");
    }

    #[test]
    fn start_requests_the_first_question() {
        let mut session = session();
        let request = session.start().unwrap();

        assert_eq!(session.screen(), Screen::Loading);
        let Request::Question { ticket, query } = &request else {
            panic!("expected a question request");
        };
        assert_eq!(ticket.position, 0);
        assert_eq!(query.kind, FetchKind::Opening);
        assert!(query.exclude.is_empty());

        session.apply(answer(request));
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.position(), 0);
        assert_eq!(session.lifelines(), Lifelines::default());
    }

    #[test]
    fn failed_first_question_returns_to_start() {
        let mut session = session();
        let request = session.start().unwrap();
        session.apply(failure(request));

        assert_eq!(session.screen(), Screen::Start);
        assert_eq!(session.message(), Some(LOAD_FAILED));
        assert!(session.current_question().is_none());
    }

    #[test]
    fn prefetch_is_guarded_per_position() {
        let mut session = session();
        begin(&mut session);

        let request = session.prefetch().unwrap();
        assert_eq!(request.ticket().position, 1);
        assert!(session.prefetch().is_none());

        session.apply(answer(request));
        assert!(session.prefetch().is_none());
    }

    #[test]
    fn prefetch_excludes_used_questions() {
        let mut session = session();
        begin(&mut session);

        let Some(Request::Question { query, .. }) = session.prefetch() else {
            panic!("expected a prefetch");
        };
        assert_eq!(query.exclude, vec!["p0-0".to_string()]);
    }

    #[test]
    fn advancing_past_a_missing_question_waits() {
        let mut session = session();
        begin(&mut session);

        let pending = session.prefetch().unwrap();
        assert!(session.select(0));
        assert!(session.advance());

        assert!(session.is_waiting());
        assert!(!session.select(0));

        session.apply(answer(pending));
        assert!(!session.is_waiting());
        assert_eq!(session.current_question().unwrap().tier, Tier::Easy);
    }

    #[test]
    fn failing_third_question_keeps_second_prize() {
        let mut session = session();
        begin(&mut session);

        answer_current(&mut session, true);
        answer_current(&mut session, true);
        answer_current(&mut session, false);

        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.final_prize(), 2000);
        let saved = saved_scores(&session);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].score, 2000);
        assert_eq!(saved[0].name, "Ana");
        assert!(session.is_new_record());
    }

    #[test]
    fn failing_first_question_saves_nothing() {
        let mut session = session();
        begin(&mut session);
        answer_current(&mut session, false);

        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.final_prize(), 0);
        assert!(saved_scores(&session).is_empty());
        assert!(!session.is_new_record());
    }

    #[test]
    fn clearing_the_ladder_wins_the_top_prize() {
        let mut session = session();
        begin(&mut session);

        for _ in 0..PRIZE_LADDER.len() {
            answer_current(&mut session, true);
        }

        assert_eq!(session.screen(), Screen::Victory);
        assert_eq!(session.final_prize(), 1_000_000);
        assert_eq!(saved_scores(&session)[0].score, 1_000_000);
    }

    #[test]
    fn lower_prize_is_not_a_record() {
        let store = MemoryStore::new().with_blob(
            LEADERBOARD_KEY,
            r#"[{"name":"Bia","score":50000,"date":"01/01/2024"}]"#,
        );
        let mut session = session_with(store);
        begin(&mut session);
        answer_current(&mut session, true);
        answer_current(&mut session, false);

        assert_eq!(session.final_prize(), 1000);
        assert!(!session.is_new_record());
        assert_eq!(session.leaderboard().entries().len(), 2);
    }

    #[test]
    fn eliminate_two_hides_two_wrong_options_once() {
        let mut session = session();
        begin(&mut session);

        assert!(session.eliminate_two());
        let hidden = session.hidden_options().to_vec();
        assert_eq!(hidden.len(), 2);
        assert!(!hidden.contains(&0));
        assert!(!session.lifelines().fifty_fifty);

        assert!(!session.eliminate_two());
        assert_eq!(session.hidden_options(), hidden.as_slice());
        assert!(!session.select(hidden[0]));
    }

    #[test]
    fn cursor_skips_hidden_options() {
        let mut session = session();
        begin(&mut session);
        session.eliminate_two();

        for _ in 0..8 {
            session.move_cursor_down();
            assert!(!session.is_hidden(session.cursor()));
        }
    }

    #[test]
    fn replace_swaps_question_and_spends_a_skip() {
        let mut session = session();
        begin(&mut session);
        session.eliminate_two();

        let request = session.replace_question().unwrap();
        assert!(session.is_swapping());
        assert!(!session.select(0));
        assert!(session.replace_question().is_none());
        assert!(session.reveal_hint().is_none());

        let Request::Question { query, .. } = &request else {
            panic!("expected a question request");
        };
        assert_eq!(query.replacing.as_deref(), Some("p0-0"));
        assert!(query.exclude.contains(&"p0-0".to_string()));

        session.apply(answer(request));
        assert!(!session.is_swapping());
        assert_eq!(session.lifelines().skips, 2);
        assert_eq!(session.current_question().unwrap().id.as_deref(), Some("p0-1"));
        assert!(session.hidden_options().is_empty());
    }

    #[test]
    fn failed_replace_keeps_the_skip() {
        let mut session = session();
        begin(&mut session);
        let before = session.current_question().cloned();

        let request = session.replace_question().unwrap();
        session.apply(failure(request));

        assert!(!session.is_swapping());
        assert_eq!(session.lifelines().skips, 3);
        assert_eq!(session.current_question().cloned(), before);
    }

    #[test]
    fn no_skips_left_changes_nothing() {
        let mut session = session();
        begin(&mut session);
        for _ in 0..3 {
            let request = session.replace_question().unwrap();
            session.apply(answer(request));
        }

        let before = session.current_question().cloned();
        let lifelines = session.lifelines();
        assert_eq!(lifelines.skips, 0);

        assert!(session.replace_question().is_none());
        assert_eq!(session.lifelines(), lifelines);
        assert_eq!(session.current_question().cloned(), before);
        assert!(!session.is_swapping());
    }

    #[test]
    fn requested_hint_falls_back_on_failure() {
        let mut session = session();
        begin(&mut session);

        let request = session.reveal_hint().unwrap();
        assert!(session.is_hint_pending());
        assert!(!session.lifelines().hint);

        session.apply(failure(request));
        assert_eq!(session.hint(), Some(HINT_FALLBACK));
        assert!(session.reveal_hint().is_none());
    }

    #[test]
    fn hint_arriving_after_the_player_moved_on_is_dropped() {
        let mut session = session();
        begin(&mut session);

        let request = session.reveal_hint().unwrap();
        answer_current(&mut session, true);
        assert_eq!(session.position(), 1);

        let Request::Hint { ticket, .. } = request else {
            panic!("expected a hint request");
        };
        session.apply(Outcome::Hint {
            ticket,
            result: Ok("Tarde demais.".to_string()),
        });

        assert_eq!(session.hint(), None);
        assert!(!session.is_hint_pending());
        assert_eq!(session.screen(), Screen::Playing);
    }

    #[test]
    fn replacement_for_another_position_is_dropped() {
        let mut session = session();
        begin(&mut session);
        let before = session.current_question().cloned();

        let Request::Question { mut ticket, query } = session.replace_question().unwrap() else {
            panic!("expected a question request");
        };
        let current = ticket;
        ticket.position += 1;
        session.apply(answer(Request::Question {
            ticket,
            query: query.clone(),
        }));

        assert!(session.is_swapping());
        assert_eq!(session.lifelines().skips, 3);
        assert_eq!(session.current_question().cloned(), before);

        session.apply(answer(Request::Question {
            ticket: current,
            query: query.clone(),
        }));
        assert!(!session.is_swapping());
        assert_eq!(session.lifelines().skips, 2);
        let replaced = session.current_question().cloned();

        // A second delivery for the same swap is no longer awaited.
        session.apply(answer(Request::Question {
            ticket: current,
            query: query.excluding(vec!["outra".to_string()]),
        }));
        assert_eq!(session.lifelines().skips, 2);
        assert_eq!(session.current_question().cloned(), replaced);
    }

    #[test]
    fn fifty_fifty_waits_for_a_swap_to_land() {
        let mut session = session();
        begin(&mut session);

        let request = session.replace_question().unwrap();
        assert!(!session.eliminate_two());
        assert!(session.hidden_options().is_empty());
        assert!(session.lifelines().fifty_fifty);

        session.apply(answer(request));
        assert_eq!(session.lifelines().skips, 2);
        assert!(session.hidden_options().is_empty());
        assert!(session.eliminate_two());
        assert_eq!(session.hidden_options().len(), 2);
    }

    #[test]
    fn stored_hint_shows_immediately() {
        let mut session = session();
        let request = session.start().unwrap();
        let Request::Question { ticket, .. } = request else {
            panic!("expected a question request");
        };
        let question = Question::new(
            "Cor do céu?",
            ["Blue", "Red", "Green", "Pink"].map(String::from).to_vec(),
            0,
            "",
            Tier::Easy,
        )
        .unwrap()
        .with_hint("Olhe para cima.");
        session.apply(Outcome::Question {
            ticket,
            result: Ok(question),
        });

        assert!(session.reveal_hint().is_none());
        assert_eq!(session.hint(), Some("Olhe para cima."));
    }

    #[test]
    fn results_from_an_old_game_are_dropped() {
        let mut session = session();
        begin(&mut session);
        let stale = session.prefetch().unwrap();
        answer_current(&mut session, false);
        assert!(session.restart());

        let request = session.start().unwrap();
        session.apply(answer(stale));
        assert_eq!(session.screen(), Screen::Loading);

        session.apply(answer(request));
        assert_eq!(session.screen(), Screen::Playing);
        assert!(session.prefetch().is_some());
    }

    #[test]
    fn restart_clears_the_game_but_not_the_board() {
        let mut session = session();
        begin(&mut session);
        session.eliminate_two();
        answer_current(&mut session, true);
        answer_current(&mut session, false);

        assert!(session.restart());
        assert_eq!(session.screen(), Screen::Start);
        assert_eq!(session.position(), 0);
        assert_eq!(session.lifelines(), Lifelines::default());
        assert!(session.current_question().is_none());
        assert_eq!(session.final_prize(), 0);
        assert_eq!(session.leaderboard().entries().len(), 1);
        assert_eq!(session.name(), "Ana");
    }

    #[test]
    fn restart_only_from_a_finished_game() {
        let mut session = session();
        begin(&mut session);
        assert!(!session.restart());
        assert_eq!(session.screen(), Screen::Playing);
    }

    #[tokio::test]
    async fn plays_against_the_builtin_bank() {
        let source = StaticSource::new(builtin_questions().unwrap(), StdRng::seed_from_u64(8))
            .with_delays(StaticDelays::none());
        let mut session = session();

        let request = session.start().unwrap();
        session.apply(request.run(&source).await);

        let mut seen = HashSet::new();
        for position in 0..PRIZE_LADDER.len() {
            while let Some(request) = session.prefetch() {
                session.apply(request.run(&source).await);
            }
            let question = session.current_question().unwrap().clone();
            assert_eq!(question.tier, Tier::for_position(position));
            assert!(seen.insert(question.id.clone()));

            assert!(session.select(question.correct_index));
            assert!(session.advance());
        }

        assert_eq!(session.screen(), Screen::Victory);
        assert_eq!(session.leaderboard().best_score(), Some(1_000_000));
    }
}
