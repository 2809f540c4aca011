// Recommendations: curator prompt, model call, and reply parsing.
// All model calls go through llm_client via the RecommendationService trait.

pub mod parser;
pub mod prompts;
pub mod service;
