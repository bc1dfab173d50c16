use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Difficulty levels, in ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Easy, Tier::Medium, Tier::Hard, Tier::Expert];

    /// Difficulty for a ladder position: 0-2 easy, 3-5 medium, 6-8 hard, 9 and up expert.
    pub fn for_position(position: usize) -> Self {
        match position {
            0..=2 => Tier::Easy,
            3..=5 => Tier::Medium,
            6..=8 => Tier::Hard,
            _ => Tier::Expert,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
            Tier::Expert => "expert",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a question record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,
    #[error("expected 4 options, found {0}")]
    OptionCount(usize),
    #[error("option {0} is empty")]
    EmptyOption(usize),
    #[error("correct index {0} is out of range")]
    CorrectIndex(usize),
}

/// Unvalidated question as it appears in JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "question")]
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(rename = "level")]
    pub tier: Tier,
}

/// A validated multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    pub id: Option<String>,
    pub text: String,
    pub options: [String; 4],
    pub correct_index: usize,
    pub explanation: String,
    pub hint: Option<String>,
    pub tier: Tier,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
        tier: Tier,
    ) -> Result<Self, QuestionError> {
        QuestionRecord {
            id: None,
            text: text.into(),
            options,
            correct_index,
            explanation: explanation.into(),
            hint: None,
            tier,
        }
        .try_into()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    /// Indices of the three wrong options.
    pub fn wrong_options(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.options.len()).filter(move |&index| index != self.correct_index)
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let text = record.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let count = record.options.len();
        let options: [String; 4] = record
            .options
            .try_into()
            .map_err(|_| QuestionError::OptionCount(count))?;
        if let Some(index) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption(index));
        }

        if record.correct_index >= options.len() {
            return Err(QuestionError::CorrectIndex(record.correct_index));
        }

        Ok(Self {
            id: record.id,
            text,
            options,
            correct_index: record.correct_index,
            explanation: record.explanation,
            hint: record.hint.filter(|hint| !hint.trim().is_empty()),
            tier: record.tier,
        })
    }
}
