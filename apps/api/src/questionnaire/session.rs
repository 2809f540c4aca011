//! Per-user questionnaire state.
//!
//! A session moves `Asking(0) → … → Asking(N-1) → AwaitingGeneration →
//! Generating → Showing | Failed`, and back to `Asking(0)` on reset.
//! `answers.len() == question_index` holds whenever the session is not
//! borrowed mutably.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::questionnaire::catalog::{Question, QuestionKind};
use crate::recommendations::prompts::build_prompt;

pub const BLANK_ANSWER_MESSAGE: &str = "Please share your thoughts before continuing! 💭";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Asking { index: usize },
    AwaitingGeneration,
    Generating,
    Showing,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please share your thoughts before continuing! 💭")]
    BlankAnswer,

    #[error("'{answer}' is not one of the options for this question")]
    UnknownOption { answer: String },

    #[error("All questions have already been answered")]
    NotAsking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Generation {
    Idle,
    InFlight,
    Failed(String),
}

/// Handed out by [`Session::begin_generation`]. Carries the prompt to send
/// and the journey it belongs to, so a result that arrives after a reset
/// can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub journey: u64,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    catalog: &'static [Question],
    question_index: usize,
    answers: Vec<String>,
    raw_recommendation_text: Option<String>,
    generation: Generation,
    journey: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(catalog: &'static [Question]) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            catalog,
            question_index: 0,
            answers: Vec::new(),
            raw_recommendation_text: None,
            generation: Generation::Idle,
            journey: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn catalog(&self) -> &'static [Question] {
        self.catalog
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn raw_recommendation_text(&self) -> Option<&str> {
        self.raw_recommendation_text.as_deref()
    }

    /// The question currently awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&'static Question> {
        self.catalog.get(self.question_index)
    }

    pub fn phase(&self) -> Phase {
        if self.question_index < self.catalog.len() {
            return Phase::Asking {
                index: self.question_index,
            };
        }
        if self.raw_recommendation_text.is_some() {
            return Phase::Showing;
        }
        match &self.generation {
            Generation::Idle => Phase::AwaitingGeneration,
            Generation::InFlight => Phase::Generating,
            Generation::Failed(message) => Phase::Failed {
                message: message.clone(),
            },
        }
    }

    /// Validates `answer` against the current question and, if accepted,
    /// appends it and advances by exactly one question.
    pub fn submit(&mut self, answer: &str) -> Result<Phase, SubmitError> {
        let question = self.current_question().ok_or(SubmitError::NotAsking)?;

        match question.kind {
            QuestionKind::FreeText { .. } if answer.trim().is_empty() => {
                return Err(SubmitError::BlankAnswer);
            }
            QuestionKind::SingleChoice { options } if !options.iter().any(|o| *o == answer) => {
                return Err(SubmitError::UnknownOption {
                    answer: answer.to_string(),
                });
            }
            _ => {}
        }

        self.answers.push(answer.to_string());
        self.question_index += 1;
        self.touch();
        Ok(self.phase())
    }

    /// Marks the session as generating and returns the prompt to send.
    /// Returns `None` unless the session is `AwaitingGeneration`, which
    /// keeps the outbound call to at most one per journey.
    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        if self.phase() != Phase::AwaitingGeneration {
            return None;
        }
        self.generation = Generation::InFlight;
        self.touch();
        Some(GenerationTicket {
            journey: self.journey,
            prompt: build_prompt(&self.answers, self.catalog),
        })
    }

    /// Stores the outcome of a generation started with `begin_generation`.
    /// Returns `false` when the ticket is stale (the session was reset in
    /// the meantime) and the outcome was discarded.
    pub fn finish_generation(&mut self, journey: u64, outcome: Result<String, String>) -> bool {
        if journey != self.journey || self.generation != Generation::InFlight {
            return false;
        }
        match outcome {
            Ok(text) => {
                self.raw_recommendation_text = Some(text);
                self.generation = Generation::Idle;
            }
            Err(message) => self.generation = Generation::Failed(message),
        }
        self.touch();
        true
    }

    /// Restores the initial state: `Asking(0)`, no answers, no cached text.
    pub fn reset(&mut self) {
        self.question_index = 0;
        self.answers.clear();
        self.raw_recommendation_text = None;
        self.generation = Generation::Idle;
        self.journey += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
