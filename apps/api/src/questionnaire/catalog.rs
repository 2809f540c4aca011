//! The fixed, ordered question catalog presented to every user.

use serde::Serialize;

/// Placeholder shown for free-text questions that do not define their own.
pub const DEFAULT_PLACEHOLDER: &str = "Type your answer here...";

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick exactly one entry from a closed, non-empty option list.
    SingleChoice { options: &'static [&'static str] },
    /// Arbitrary non-blank text.
    FreeText { placeholder: Option<&'static str> },
}

/// A single catalog entry. Identified by its position in [`QUESTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub text: &'static str,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self.kind {
            QuestionKind::FreeText { placeholder } => {
                Some(placeholder.unwrap_or(DEFAULT_PLACEHOLDER))
            }
            QuestionKind::SingleChoice { .. } => None,
        }
    }
}

pub const QUESTIONS: &[Question] = &[
    Question {
        text: "Do you prefer 📚 books or 🎬 movies?",
        kind: QuestionKind::SingleChoice {
            options: &["Books", "Movies", "Both equally"],
        },
    },
    Question {
        text: "Which genre speaks to your soul?",
        kind: QuestionKind::SingleChoice {
            options: &[
                "🚀 Sci-Fi",
                "🎭 Drama",
                "😱 Thriller",
                "😂 Comedy",
                "💕 Romance",
                "⚡ Action",
                "🧙 Fantasy",
                "🔍 Mystery",
            ],
        },
    },
    Question {
        text: "What's your preferred story pace?",
        kind: QuestionKind::SingleChoice {
            options: &[
                "⚡ Fast-paced & exciting",
                "🐌 Slow & contemplative",
                "🎯 Balanced mix",
            ],
        },
    },
    Question {
        text: "Do you lean towards classics or modern works?",
        kind: QuestionKind::SingleChoice {
            options: &[
                "📜 Timeless classics",
                "🆕 Modern masterpieces",
                "🎭 Mix of both",
            ],
        },
    },
    Question {
        text: "What themes resonate with you most?",
        kind: QuestionKind::FreeText {
            placeholder: Some("e.g., adventure, self-discovery, family, technology..."),
        },
    },
    Question {
        text: "How do you like your stories to end?",
        kind: QuestionKind::SingleChoice {
            options: &[
                "😊 Happy & satisfying",
                "🤔 Open-ended & thought-provoking",
                "😢 Bittersweet & realistic",
            ],
        },
    },
];
