pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;

use crate::analytics::handlers as analytics;
use crate::priority::handlers as priority;
use crate::silver_medalists::handlers as silver;
use crate::state::AppState;
use crate::vacancies::handlers as vacancies;

/// `?refresh=true` bypasses the ATS cache.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Dashboard
        .route("/api/v1/dashboard", get(vacancies::handle_dashboard))
        .route("/api/v1/vacancies", get(vacancies::handle_list_vacancies))
        .route(
            "/api/v1/vacancies/:job_id/visibility",
            put(vacancies::handle_put_visibility),
        )
        // Priorities
        .route("/api/v1/priorities", get(priority::handle_list_priorities))
        .route(
            "/api/v1/priorities/:job_id/:company_id",
            get(priority::handle_get_priority).put(priority::handle_put_priority),
        )
        // Analytics
        .route("/api/v1/analytics", get(analytics::handle_overview))
        .route(
            "/api/v1/analytics/vacancies/:job_id",
            get(analytics::handle_vacancy_metrics),
        )
        // Silver medalists
        .route(
            "/api/v1/silver-medalists/:job_id",
            get(silver::handle_list_silver_medalists),
        )
        .route(
            "/api/v1/silver-medalists/:job_id/match",
            post(silver::handle_match_silver_medalists),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::ats::fixture::StaticSource;
    use crate::ats::models::{Company, StageCategory, Vacancy, VacancyStatus};
    use crate::auth::STAFF_EMAIL_HEADER;
    use crate::config::Config;
    use crate::priority::store::memory::InMemoryAnnotationStore;
    use crate::rate_limit::RateLimiter;
    use crate::silver_medalists::detection::fixtures::{candidate, placement};
    use crate::silver_medalists::matcher::stub::StubMatcher;
    use crate::vacancies::store::memory::InMemoryVisibilityStore;

    const ADMIN: &str = "admin@example.com";
    const STAFF: &str = "staff@example.com";

    fn vacancy(job_id: i64, company_id: i64, company: &str, title: &str) -> Vacancy {
        Vacancy {
            job_id,
            company_id,
            title: title.to_string(),
            company: Some(Company {
                company_id,
                name: company.to_string(),
            }),
            status: VacancyStatus::Published,
            created_at: None,
        }
    }

    fn app(matcher: StubMatcher) -> Router {
        let config = Config::for_tests();
        let source = StaticSource {
            vacancies: vec![
                vacancy(1, 10, "Globex", "Buyer"),
                vacancy(2, 20, "Kader Group", "Planner"),
                vacancy(3, 21, "Kader", "Senior Planner"),
            ],
            candidates: vec![
                candidate(100, "Anna", vec![placement(2, StageCategory::Interview)]),
                candidate(101, "Bram", vec![placement(1, StageCategory::Offer)]),
                candidate(102, "Cees", vec![placement(2, StageCategory::Applied)]),
            ],
        };

        let state = AppState {
            limiter: Arc::new(RateLimiter::per_minute(config.match_rate_limit_per_minute)),
            config,
            source: Arc::new(source),
            annotations: Arc::new(InMemoryAnnotationStore::default()),
            visibility: Arc::new(InMemoryVisibilityStore::default()),
            matcher: Arc::new(matcher),
        };
        build_router(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        email: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = email {
            builder = builder.header(STAFF_EMAIL_HEADER, email);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn red_body() -> Value {
        json!({
            "client_pain_level": "Ja",
            "time_criticality": "Tegen het einde van samenwerking",
            "strategic_value": "A-klant",
            "account_health": "Onrustige stakeholder",
            "notes": "client escalated"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(StubMatcher::default());
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_requires_staff_header() {
        let app = app(StubMatcher::default());
        let (status, body) = send(&app, Method::GET, "/api/v1/dashboard", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_non_admin_cannot_write_priority() {
        let app = app(StubMatcher::default());
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/priorities/3/21",
            Some(STAFF),
            Some(red_body()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_priority_upsert_flows_into_dashboard() {
        let app = app(StubMatcher::default());

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/priorities/3/21",
            Some(ADMIN),
            Some(red_body()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calculated_priority"], "Red");
        assert_eq!(body["display_priority"], "Red");
        assert_eq!(body["updated_by"], ADMIN);

        let (status, dashboard) = send(&app, Method::GET, "/api/v1/dashboard", Some(STAFF), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["groups"][0]["company_name"], "Kader Group");
        assert_eq!(dashboard["groups"][0]["top_priority"], "Red");
        assert_eq!(dashboard["groups"][0]["vacancies"][0]["job_id"], 3);
        assert_eq!(dashboard["groups"][1]["company_name"], "Globex");

        let (status, list) = send(&app, Method::GET, "/api/v1/priorities", Some(STAFF), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_calculated_priority_cannot_be_set_by_client() {
        let app = app(StubMatcher::default());
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/priorities/1/10",
            Some(ADMIN),
            Some(json!({"calculated_priority": "Red", "manual_override": "Orange"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calculated_priority"], "Green");
        assert_eq!(body["display_priority"], "Orange");
    }

    #[tokio::test]
    async fn test_invalid_label_is_rejected() {
        let app = app(StubMatcher::default());
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/priorities/1/10",
            Some(ADMIN),
            Some(json!({"strategic_value": "D-klant"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_priority_is_not_found() {
        let app = app(StubMatcher::default());
        let (status, _) = send(&app, Method::GET, "/api/v1/priorities/1/10", Some(STAFF), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hidden_vacancy_leaves_dashboard() {
        let app = app(StubMatcher::default());
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/vacancies/1/visibility",
            Some(ADMIN),
            Some(json!({"hidden": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hidden"], true);

        let (_, dashboard) = send(&app, Method::GET, "/api/v1/dashboard", Some(STAFF), None).await;
        assert_eq!(dashboard["total_vacancies"], 2);

        let (_, all) = send(
            &app,
            Method::GET,
            "/api/v1/dashboard?include_hidden=true",
            Some(STAFF),
            None,
        )
        .await;
        assert_eq!(all["total_vacancies"], 3);
    }

    #[tokio::test]
    async fn test_blank_assignment_is_rejected() {
        let app = app(StubMatcher::default());
        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/vacancies/1/visibility",
            Some(ADMIN),
            Some(json!({"assigned_company_name": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analytics_overview() {
        let app = app(StubMatcher::default());
        let (status, body) = send(&app, Method::GET, "/api/v1/analytics", Some(STAFF), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_vacancies"], 3);
        assert_eq!(body["total_placements"], 3);
        assert_eq!(body["silver_medalists"], 2);

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/v1/analytics/vacancies/404",
            Some(STAFF),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_silver_medalists_for_vacancy() {
        let app = app(StubMatcher::default());
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/silver-medalists/3",
            Some(STAFF),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body["candidates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["candidate_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![101, 100]);
    }

    #[tokio::test]
    async fn test_match_reports_matched_mode() {
        let app = app(StubMatcher {
            matches: vec![(100, 91.0)],
            ..Default::default()
        });
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/silver-medalists/3/match",
            Some(STAFF),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "matched");
        assert_eq!(body["pool_size"], 2);
        assert_eq!(body["matches"][0]["candidate_id"], 100);
        assert_eq!(body["matches"][0]["score"], 91);
    }

    #[tokio::test]
    async fn test_match_falls_back_explicitly_then_rate_limits() {
        let app = app(StubMatcher::default());
        let uri = "/api/v1/silver-medalists/3/match";

        let (status, body) = send(&app, Method::POST, uri, Some(STAFF), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "unfiltered");
        assert_eq!(body["matches"].as_array().unwrap().len(), 2);
        assert_eq!(body["matches"][0]["score"], 50);

        let (status, _) = send(&app, Method::POST, uri, Some(STAFF), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, uri, Some(STAFF), None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }
}
