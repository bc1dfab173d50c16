//! Where questions come from.
//!
//! A [`QuestionSource`] hands out one question per ladder position. The
//! built-in bank is served by [`StaticSource`]; [`GeneratedSource`] asks an
//! external text generator instead and validates whatever comes back.

mod command;
mod generator;
mod pool;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Question, QuestionError, Tier};

pub use command::CommandGenerator;
pub use generator::{GeneratedSource, TextGenerator, extract_json_object, parse_generated_question};
pub use pool::{StaticDelays, StaticSource, select_question};

/// Why a question or hint could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("text generator failed: {0}")]
    Generator(String),
    #[error("text generator timed out")]
    Timeout,
    #[error("reply contains no JSON object")]
    NoJson,
    #[error("reply is not a question: {0}")]
    Malformed(String),
    #[error("generated question is invalid: {0}")]
    Invalid(#[from] QuestionError),
    #[error("no {0} questions available")]
    EmptyTier(Tier),
    #[error("question has no hint")]
    NoHint,
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<FetchError>,
    },
}

/// Why a question is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First question of a new game.
    Opening,
    /// Next position, fetched ahead of time while the player is answering.
    Prefetch,
    /// Replacement for the current question (skip lifeline).
    Replacement,
}

/// A request for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub position: usize,
    /// Ids that should not be handed out again.
    pub exclude: Vec<String>,
    /// Id of the question being swapped out, if any.
    pub replacing: Option<String>,
    pub kind: FetchKind,
}

impl QuestionQuery {
    pub fn new(position: usize, kind: FetchKind) -> Self {
        Self {
            position,
            exclude: Vec::new(),
            replacing: None,
            kind,
        }
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.exclude.extend(ids);
        self
    }

    pub fn replacing(mut self, id: Option<String>) -> Self {
        if let Some(id) = &id {
            if !self.exclude.contains(id) {
                self.exclude.push(id.clone());
            }
        }
        self.replacing = id;
        self
    }

    pub fn tier(&self) -> Tier {
        Tier::for_position(self.position)
    }
}

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Produces a question suited to `query.position`.
    async fn fetch(&self, query: QuestionQuery) -> Result<Question, FetchError>;

    /// Produces a short tip for `question` that does not give the answer away.
    async fn hint(&self, question: &Question) -> Result<String, FetchError>;
}
