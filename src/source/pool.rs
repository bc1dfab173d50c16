use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::Mutex;

use crate::models::{Question, Tier};

use super::{FetchError, FetchKind, QuestionQuery, QuestionSource};

/// Picks a question for `position` at random.
///
/// Questions whose id is in `exclude` are skipped. When that leaves nothing
/// in the tier, the whole tier is eligible again and repeats are allowed.
/// Returns `None` only when the pool has no question of the tier at all.
pub fn select_question<'a, R: Rng + ?Sized>(
    pool: &'a [Question],
    position: usize,
    exclude: &[String],
    rng: &mut R,
) -> Option<&'a Question> {
    let tier = Tier::for_position(position);
    let tier_pool: Vec<&Question> = pool.iter().filter(|q| q.tier == tier).collect();

    let fresh: Vec<&Question> = tier_pool
        .iter()
        .copied()
        .filter(|q| q.id.as_ref().is_none_or(|id| !exclude.contains(id)))
        .collect();

    let candidates = if fresh.is_empty() { tier_pool } else { fresh };
    candidates.choose(rng).copied()
}

/// Artificial pauses that give the player a moment before a question shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticDelays {
    pub opening: Duration,
    pub replacement: Duration,
}

impl StaticDelays {
    pub fn none() -> Self {
        Self {
            opening: Duration::ZERO,
            replacement: Duration::ZERO,
        }
    }

    fn for_kind(&self, kind: FetchKind) -> Duration {
        match kind {
            FetchKind::Opening => self.opening,
            FetchKind::Replacement => self.replacement,
            FetchKind::Prefetch => Duration::ZERO,
        }
    }
}

impl Default for StaticDelays {
    fn default() -> Self {
        Self {
            opening: Duration::from_millis(1500),
            replacement: Duration::from_millis(1000),
        }
    }
}

/// Serves questions from an in-memory bank.
pub struct StaticSource {
    pool: Vec<Question>,
    rng: Mutex<StdRng>,
    delays: StaticDelays,
}

impl StaticSource {
    pub fn new(pool: Vec<Question>, rng: StdRng) -> Self {
        Self {
            pool,
            rng: Mutex::new(rng),
            delays: StaticDelays::default(),
        }
    }

    pub fn with_delays(mut self, delays: StaticDelays) -> Self {
        self.delays = delays;
        self
    }

    async fn pick(&self, query: &QuestionQuery) -> Result<Question, FetchError> {
        let mut rng = self.rng.lock().await;
        let picked = select_question(&self.pool, query.position, &query.exclude, &mut *rng)
            .ok_or(FetchError::EmptyTier(query.tier()))?;

        // A drained tier may hand back the very question being replaced.
        if let Some(replacing) = &query.replacing {
            if picked.id.as_ref() == Some(replacing) {
                let others = [replacing.clone()];
                if let Some(other) = select_question(&self.pool, query.position, &others, &mut *rng)
                    .filter(|q| q.id.as_ref() != Some(replacing))
                {
                    return Ok(other.clone());
                }
            }
        }

        Ok(picked.clone())
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    async fn fetch(&self, query: QuestionQuery) -> Result<Question, FetchError> {
        let question = self.pick(&query).await?;
        log::debug!(
            "picked {:?} for position {} ({:?})",
            question.id,
            query.position,
            query.kind
        );

        let delay = self.delays.for_kind(query.kind);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(question)
    }

    async fn hint(&self, question: &Question) -> Result<String, FetchError> {
        question.hint.clone().ok_or(FetchError::NoHint)
    }
}
