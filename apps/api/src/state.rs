use std::sync::Arc;

use crate::questionnaire::catalog::Question;
use crate::questionnaire::store::SessionStore;
use crate::recommendations::service::RecommendationService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Pluggable recommendation backend. Default: GeminiRecommender.
    pub recommender: Arc<dyn RecommendationService>,
    /// Questions asked in every session, in order.
    pub catalog: &'static [Question],
}
