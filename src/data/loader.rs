use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Question, Tier};

const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.json");

/// Errors raised while loading a question pool.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse question pool: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question pool is empty")]
    Empty,
    #[error("question pool has no {0} questions")]
    MissingTier(Tier),
    #[error("question id {0:?} appears more than once")]
    DuplicateId(String),
    #[error("every pooled question needs an id")]
    MissingId,
}

/// The question bank shipped with the game.
pub fn builtin_questions() -> Result<Vec<Question>, LoadError> {
    parse_questions(BUILTIN_QUESTIONS)
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();
    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = parse_questions(&json_content)?;
    log::info!("loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

/// Parses and checks a pool: ids present and unique, every tier covered.
pub fn parse_questions(json_content: &str) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> = serde_json::from_str(json_content)?;

    if questions.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut seen = HashSet::new();
    for question in &questions {
        let id = question.id.as_deref().ok_or(LoadError::MissingId)?;
        if !seen.insert(id) {
            return Err(LoadError::DuplicateId(id.to_string()));
        }
    }

    if let Some(tier) = Tier::ALL
        .into_iter()
        .find(|tier| !questions.iter().any(|question| question.tier == *tier))
    {
        return Err(LoadError::MissingTier(tier));
    }

    Ok(questions)
}
