mod prize;
mod question;
mod score;

pub use prize::{PRIZE_LADDER, format_prize, guaranteed_prize, prize_at, top_prize};
pub use question::{Question, QuestionError, QuestionRecord, Tier};
pub use score::ScoreEntry;

/// The screen the game is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Loading,
    Playing,
    Feedback,
    GameOver,
    Victory,
}

impl Screen {
    /// Whether the game has ended and only a restart is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Screen::GameOver | Screen::Victory)
    }
}
