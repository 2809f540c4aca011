//! Presentation: turns a session into the JSON view a client renders.
//!
//! Rendering is a pure function of session state, so the same state always
//! produces the same view. Recommendation cards are re-parsed from the cached
//! raw reply on every render.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::questionnaire::catalog::QuestionKind;
use crate::questionnaire::session::{Phase, Session};
use crate::recommendations::parser::{parse_recommendations, Recommendation};

pub const TITLE: &str = "✨ Story Genie";
pub const SUBTITLE: &str = "Your personal curator for amazing books & movies";
pub const GENIE_LABEL: &str = "🧞‍♂️ Genie";
pub const USER_LABEL: &str = "You";

pub const NEXT_ACTION: &str = "✨ Next";
pub const RESET_ACTION: &str = "🔄 Start New Journey";

pub const LOADING_MESSAGE: &str = "🔮 The Genie is consulting the mystical library...";
pub const READY_MESSAGE: &str = "🎉 Your personalized recommendations are ready!";
pub const AWAITING_MESSAGE: &str = "All questions answered! Ask the Genie for your recommendations.";
pub const EMPTY_RESULT_MESSAGE: &str =
    "The Genie's reply did not contain any recommendations. Start a new journey to try again.";
pub const MATCHES_HEADING: &str = "🎯 Your Perfect Matches";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionView {
    pub session_id: Uuid,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub phase: &'static str,
    pub progress: Progress,
    pub transcript: Vec<ChatMessage>,
    pub current_question: Option<CurrentQuestion>,
    pub status: Option<StatusNotice>,
    pub recommendations: Option<RecommendationSection>,
    pub actions: Vec<&'static str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub fraction: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Genie,
    User,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub label: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum InputControl {
    Choice {
        label: &'static str,
        options: &'static [&'static str],
    },
    Text {
        label: &'static str,
        placeholder: &'static str,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CurrentQuestion {
    pub index: usize,
    pub message: ChatMessage,
    pub input: InputControl,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusNotice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecommendationSection {
    pub heading: &'static str,
    pub cards: Vec<RecommendationCard>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecommendationCard {
    /// 1-based position in the model's reply.
    pub number: usize,
    pub icon: String,
    pub title: String,
    /// format, genre, year
    pub badges: Vec<String>,
    pub description: String,
}

impl From<(usize, Recommendation)> for RecommendationCard {
    fn from((number, rec): (usize, Recommendation)) -> Self {
        RecommendationCard {
            number,
            icon: rec.icon,
            title: rec.title,
            badges: vec![rec.format, rec.genre, rec.year],
            description: rec.description,
        }
    }
}

fn phase_name(phase: &Phase) -> &'static str {
    match phase {
        Phase::Asking { .. } => "asking",
        Phase::AwaitingGeneration => "awaiting_generation",
        Phase::Generating => "generating",
        Phase::Showing => "showing",
        Phase::Failed { .. } => "failed",
    }
}

fn genie(text: &str) -> ChatMessage {
    ChatMessage {
        speaker: Speaker::Genie,
        label: GENIE_LABEL,
        text: text.to_string(),
    }
}

fn user(text: &str) -> ChatMessage {
    ChatMessage {
        speaker: Speaker::User,
        label: USER_LABEL,
        text: text.to_string(),
    }
}

fn progress(session: &Session) -> Progress {
    let total = session.catalog().len();
    let answered = session.question_index();
    let fraction = if total == 0 {
        1.0
    } else {
        answered as f64 / total as f64
    };
    Progress {
        answered,
        total,
        fraction,
        label: format!("✨ Question {} of {}", (answered + 1).min(total), total),
    }
}

fn current_question(session: &Session) -> Option<CurrentQuestion> {
    let question = session.current_question()?;
    let input = match question.kind {
        QuestionKind::SingleChoice { options } => InputControl::Choice {
            label: "Choose your answer:",
            options,
        },
        QuestionKind::FreeText { .. } => InputControl::Text {
            label: "Your answer:",
            placeholder: question.placeholder().unwrap_or_default(),
        },
    };
    Some(CurrentQuestion {
        index: session.question_index(),
        message: genie(question.text),
        input,
    })
}

fn notice(level: NoticeLevel, message: &str) -> Option<StatusNotice> {
    Some(StatusNotice {
        level,
        message: message.to_string(),
    })
}

/// Renders the full view for `session`.
pub fn render(session: &Session) -> SessionView {
    let phase = session.phase();

    let transcript = session
        .catalog()
        .iter()
        .zip(session.answers())
        .flat_map(|(q, a)| [genie(q.text), user(a)])
        .collect();

    let recommendations = session.raw_recommendation_text().map(|raw| {
        let cards = parse_recommendations(raw)
            .into_iter()
            .enumerate()
            .map(|(i, rec)| RecommendationCard::from((i + 1, rec)))
            .collect();
        RecommendationSection {
            heading: MATCHES_HEADING,
            cards,
        }
    });

    let status = match &phase {
        Phase::Asking { .. } => None,
        Phase::AwaitingGeneration => notice(NoticeLevel::Info, AWAITING_MESSAGE),
        Phase::Generating => notice(NoticeLevel::Loading, LOADING_MESSAGE),
        Phase::Showing => match &recommendations {
            Some(section) if section.cards.is_empty() => {
                notice(NoticeLevel::Info, EMPTY_RESULT_MESSAGE)
            }
            _ => notice(NoticeLevel::Success, READY_MESSAGE),
        },
        Phase::Failed { message } => notice(NoticeLevel::Error, message),
    };

    let mut actions = Vec::with_capacity(2);
    if matches!(phase, Phase::Asking { .. }) {
        actions.push(NEXT_ACTION);
    }
    actions.push(RESET_ACTION);

    SessionView {
        session_id: session.id,
        title: TITLE,
        subtitle: SUBTITLE,
        phase: phase_name(&phase),
        progress: progress(session),
        transcript,
        current_question: current_question(session),
        status,
        recommendations,
        actions,
        created_at: session.created_at,
        updated_at: session.updated_at,
    }
}
