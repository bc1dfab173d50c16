use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::models::{Question, Tier};

use super::{FetchError, QuestionQuery, QuestionSource};

/// Attempts made for one question before giving up.
pub const MAX_ATTEMPTS: u32 = 3;

const BACKOFF_STEP: Duration = Duration::from_millis(500);

/// The external text-generation call, treated as an opaque function.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, FetchError>;
}

/// Delay before retrying after the given (1-based) failed attempt.
pub fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_STEP * attempt
}

/// Topics the generator is asked to draw from at each tier.
pub fn topics(tier: Tier) -> &'static [&'static str] {
    match tier {
        Tier::Easy => &[
            "cores",
            "animais",
            "números",
            "saudações",
            "família",
            "frutas e comidas",
        ],
        Tier::Medium => &[
            "verbos no passado simples",
            "preposições de lugar e tempo",
            "rotina diária",
            "profissões",
            "comparativos e superlativos",
            "perguntas com do/does",
        ],
        Tier::Hard => &[
            "phrasal verbs",
            "falsos cognatos",
            "present perfect",
            "orações condicionais",
            "tag questions",
            "voz passiva",
        ],
        Tier::Expert => &[
            "expressões idiomáticas",
            "inversão enfática",
            "vocabulário avançado",
            "provérbios",
            "terceira condicional",
            "nuances entre sinônimos",
        ],
    }
}

fn proficiency(tier: Tier) -> &'static str {
    match tier {
        Tier::Easy => "iniciante (A1)",
        Tier::Medium => "básico (A2-B1)",
        Tier::Hard => "intermediário (B2)",
        Tier::Expert => "avançado (C1-C2)",
    }
}

fn question_prompt(tier: Tier, topic: &str) -> String {
    format!(
        "Crie uma pergunta de múltipla escolha para brasileiros que estudam inglês.\n\
         Nível de proficiência: {level}. Tema: {topic}.\n\
         A pergunta deve ter exatamente 4 alternativas e apenas uma correta.\n\
         Responda somente com um objeto JSON neste formato:\n\
         {{\"question\": \"...\", \"options\": [\"...\", \"...\", \"...\", \"...\"], \
         \"correctIndex\": 0, \"explanation\": \"...\"}}",
        level = proficiency(tier),
        topic = topic,
    )
}

fn hint_prompt(question: &Question) -> String {
    format!(
        "Dê uma dica curta, de uma frase, para ajudar a responder a pergunta abaixo \
         sem revelar a resposta.\nPergunta: {}\nAlternativas: {}",
        question.text,
        question.options.join(" | "),
    )
}

/// Returns the first balanced `{...}` block in `reply`, skipping braces
/// that appear inside JSON strings.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in reply[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&reply[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    #[serde(alias = "text")]
    question: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

/// Decodes a generator reply into a validated question of the given tier.
pub fn parse_generated_question(reply: &str, tier: Tier) -> Result<Question, FetchError> {
    let json = extract_json_object(reply).ok_or(FetchError::NoJson)?;
    let generated: GeneratedQuestion =
        serde_json::from_str(json).map_err(|e| FetchError::Malformed(e.to_string()))?;

    Ok(Question::new(
        generated.question,
        generated.options,
        generated.correct_index,
        generated.explanation,
        tier,
    )?)
}

/// Asks a [`TextGenerator`] for every question.
pub struct GeneratedSource<G> {
    generator: G,
    rng: Mutex<StdRng>,
}

impl<G: TextGenerator> GeneratedSource<G> {
    pub fn new(generator: G, rng: StdRng) -> Self {
        Self {
            generator,
            rng: Mutex::new(rng),
        }
    }

    async fn pick_topic(&self, tier: Tier) -> &'static str {
        let mut rng = self.rng.lock().await;
        topics(tier).choose(&mut *rng).copied().unwrap_or("vocabulário")
    }

    async fn attempt(&self, tier: Tier) -> Result<Question, FetchError> {
        let topic = self.pick_topic(tier).await;
        let reply = self.generator.generate(&question_prompt(tier, topic)).await?;
        parse_generated_question(&reply, tier)
    }
}

#[async_trait]
impl<G: TextGenerator> QuestionSource for GeneratedSource<G> {
    async fn fetch(&self, query: QuestionQuery) -> Result<Question, FetchError> {
        let tier = query.tier();
        let mut attempt = 1;

        loop {
            match self.attempt(tier).await {
                Ok(question) => return Ok(question),
                Err(err) if attempt >= MAX_ATTEMPTS => {
                    log::error!(
                        "giving up on position {} after {} attempts: {}",
                        query.position,
                        attempt,
                        err
                    );
                    return Err(FetchError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    log::warn!(
                        "attempt {} for position {} failed: {}",
                        attempt,
                        query.position,
                        err
                    );
                    tokio::time::sleep(backoff_delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn hint(&self, question: &Question) -> Result<String, FetchError> {
        let reply = self.generator.generate(&hint_prompt(question)).await?;
        let tip = reply.trim();
        if tip.is_empty() {
            return Err(FetchError::NoHint);
        }
        Ok(tip.to_string())
    }
}
