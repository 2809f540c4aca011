// Prompt text for the recommendation call.
// The reply template below is the contract `parser::parse_recommendations` relies on.

use crate::questionnaire::catalog::Question;

pub const CURATOR_PREAMBLE: &str = "You are a passionate book and movie curator. \
    Based on the user's preferences, recommend exactly 3 titles in this format:\n\n\
    1. Title (Book/Movie, Genre, Year): Description.\n\
    2. Title (Book/Movie, Genre, Year): Description.\n\
    3. Title (Book/Movie, Genre, Year): Description.\n\n\
    User Preferences:\n";

pub const CURATOR_CLOSING: &str = "\nProvide exactly 3 recommendations in the specified format.";

/// Builds the curator prompt from the answers given so far, pairing each
/// answer with the catalog question at the same position.
///
/// Callers only invoke this once every question has been answered.
pub fn build_prompt(answers: &[String], catalog: &[Question]) -> String {
    let mut prompt = String::from(CURATOR_PREAMBLE);
    for (question, answer) in catalog.iter().zip(answers) {
        prompt.push_str(&format!("• {} → {}\n", question.text, answer));
    }
    prompt.push_str(CURATOR_CLOSING);
    prompt
}
