pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::questionnaire::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/questions", get(handlers::handle_list_questions))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/recommendations",
            post(handlers::handle_generate),
        )
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::questionnaire::catalog::QUESTIONS;
    use crate::questionnaire::handlers::GENERATION_FAILED_MESSAGE;
    use crate::questionnaire::store::SessionStore;
    use crate::recommendations::service::RecommendationService;

    const REPLY: &str = "1. Dune (Book, Sci-Fi, 1965): A desert planet saga.\n\
        2. Arrival (Movie, Sci-Fi, 2016): First contact drama.\n\
        3. Neuromancer (Book, Sci-Fi, N/A): Cyberpunk classic.";

    const ANSWERS: [&str; 6] = [
        "Books",
        "🚀 Sci-Fi",
        "🎯 Balanced mix",
        "🆕 Modern masterpieces",
        "first contact",
        "😊 Happy & satisfying",
    ];

    /// Fake backend that counts calls and replays a canned outcome.
    struct FakeRecommender {
        calls: AtomicUsize,
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl RecommendationService for FakeRecommender {
        async fn recommend(&self, prompt: &str) -> Result<String, LlmError> {
            assert!(prompt.contains("User Preferences:"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.map(str::to_string).ok_or(LlmError::EmptyContent)
        }
    }

    fn app(reply: Option<&'static str>) -> (Router, Arc<FakeRecommender>) {
        let fake = Arc::new(FakeRecommender {
            calls: AtomicUsize::new(0),
            reply,
        });
        let state = AppState {
            sessions: SessionStore::new(chrono::Duration::minutes(30)),
            recommender: fake.clone(),
            catalog: QUESTIONS,
        };
        (build_router(state), fake)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_session(app: &Router) -> String {
        let (status, view) = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        view["session_id"].as_str().unwrap().to_string()
    }

    async fn answer_all(app: &Router, id: &str) {
        for answer in ANSWERS {
            let (status, _) = send(
                app,
                Method::POST,
                &format!("/api/v1/sessions/{id}/answers"),
                Some(json!({ "answer": answer })),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "answer {answer:?} rejected");
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(Some(REPLY));
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_list_questions() {
        let (app, _) = app(Some(REPLY));
        let (status, body) = send(&app, Method::GET, "/api/v1/questions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), QUESTIONS.len());
        assert_eq!(body[4]["kind"], "free_text");
    }

    #[tokio::test]
    async fn test_full_journey_calls_service_once() {
        let (app, fake) = app(Some(REPLY));
        let id = create_session(&app).await;
        answer_all(&app, &id).await;

        let uri = format!("/api/v1/sessions/{id}/recommendations");
        let (status, view) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"], "showing");
        let cards = view["recommendations"]["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0]["title"], "Dune");
        assert_eq!(cards[0]["icon"], "📚");
        assert_eq!(cards[2]["badges"][2], "N/A");

        // Re-requesting and re-rendering reuse the cached reply.
        let (_, again) = send(&app, Method::POST, &uri, None).await;
        let (_, rendered) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(again, view);
        assert_eq!(rendered, view);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_free_text_is_rejected() {
        let (app, _) = app(Some(REPLY));
        let id = create_session(&app).await;
        for answer in &ANSWERS[..4] {
            send(
                &app,
                Method::POST,
                &format!("/api/v1/sessions/{id}/answers"),
                Some(json!({ "answer": answer })),
            )
            .await;
        }

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/answers"),
            Some(json!({ "answer": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please share your thoughts before continuing! 💭"
        );

        let (_, view) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["progress"]["answered"], 4);
        assert_eq!(view["transcript"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_unknown_option_is_rejected() {
        let (app, _) = app(Some(REPLY));
        let id = create_session(&app).await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/answers"),
            Some(json!({ "answer": "Podcasts" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_before_finishing_is_conflict() {
        let (app, fake) = app(Some(REPLY));
        let id = create_session(&app).await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/recommendations"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_answer_after_last_question_is_conflict() {
        let (app, _) = app(Some(REPLY));
        let id = create_session(&app).await;
        answer_all(&app, &id).await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/answers"),
            Some(json!({ "answer": "Books" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_service_failure_renders_error_state() {
        let (app, fake) = app(None);
        let id = create_session(&app).await;
        answer_all(&app, &id).await;

        let uri = format!("/api/v1/sessions/{id}/recommendations");
        let (status, view) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"], "failed");
        assert_eq!(view["status"]["level"], "error");
        assert_eq!(view["status"]["message"], GENERATION_FAILED_MESSAGE);

        send(&app, Method::POST, &uri, None).await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_returns_to_first_question() {
        let (app, fake) = app(Some(REPLY));
        let id = create_session(&app).await;
        answer_all(&app, &id).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/recommendations"),
            None,
        )
        .await;

        let (status, view) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/reset"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"], "asking");
        assert_eq!(view["progress"]["answered"], 0);
        assert_eq!(view["transcript"], json!([]));
        assert_eq!(view["recommendations"], Value::Null);

        // A new journey may consult the service again.
        answer_all(&app, &id).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/recommendations"),
            None,
        )
        .await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _) = app(Some(REPLY));
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (app, _) = app(Some(REPLY));
        let id = create_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
