//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    AppState,
    auth::{post_log_in, register_user},
    endpoints,
    entry::{
        create_entry_endpoint, delete_entry_endpoint, edit_entry_endpoint, get_entry_endpoint,
        get_summary_endpoint, list_entries_endpoint,
    },
    health::{get_debug_env, get_health},
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
///
/// The entry routes require a bearer token, which is checked by the
/// [crate::AuthenticatedUser] extractor in each handler.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    let unprotected_routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::DEBUG_ENV, get(get_debug_env))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(
            endpoints::ENTRIES,
            get(list_entries_endpoint).post(create_entry_endpoint),
        )
        .route(endpoints::ENTRIES_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::ENTRY,
            get(get_entry_endpoint)
                .put(edit_entry_endpoint)
                .delete(delete_entry_endpoint),
        );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(cors)
        .with_state(state)
}

/// Allow the configured frontend origins to call the API with credentials.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(error) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}: {error}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use axum::http::{
        HeaderValue, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN},
    };
    use serde_json::{Value, json};

    use crate::{
        config::{HOSTED_FRONTEND_URL, LOCAL_FRONTEND_URL},
        endpoints,
        test_utils::TestApp,
    };

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let app = TestApp::new();

        let response = app.server.get("/api/nothing-here").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "Route not found" }));
    }

    #[tokio::test]
    async fn health_does_not_need_token() {
        let app = TestApp::new();

        app.server.get(endpoints::HEALTH).await.assert_status_ok();
    }

    #[tokio::test]
    async fn entry_routes_require_token() {
        let app = TestApp::new();

        app.server
            .get(endpoints::ENTRIES)
            .await
            .assert_status_unauthorized();
        app.server
            .get("/api/entries/1")
            .await
            .assert_status_unauthorized();
        app.server
            .put("/api/entries/1")
            .await
            .assert_status_unauthorized();
        app.server
            .delete("/api/entries/1")
            .await
            .assert_status_unauthorized();
        app.server
            .get(endpoints::ENTRIES)
            .authorization_bearer("forged.token.value")
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn cors_allows_known_origins_only() {
        let app = TestApp::new();

        for origin in [LOCAL_FRONTEND_URL, HOSTED_FRONTEND_URL] {
            let response = app
                .server
                .get(endpoints::HEALTH)
                .add_header(ORIGIN, HeaderValue::from_static(origin))
                .await;

            assert_eq!(response.header(ACCESS_CONTROL_ALLOW_ORIGIN), origin);
        }

        let response = app
            .server
            .get(endpoints::HEALTH)
            .add_header(ORIGIN, HeaderValue::from_static("https://evil.example.com"))
            .await;

        assert!(response.maybe_header(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn register_then_manage_entries() {
        let app = TestApp::new();

        let response = app
            .server
            .post(endpoints::REGISTER)
            .json(&json!({ "email": "carol@example.com", "password": "Xk9#vLq2!mPz7&Rw" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let token = body["token"].as_str().unwrap().to_owned();

        let response = app
            .server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "carol@example.com", "password": "Xk9#vLq2!mPz7&Rw" }))
            .await;
        response.assert_status_ok();

        let coffee = app
            .create_entry(&token, "Coffee", "food", "expense", 5.0, "2025-01-15")
            .await;
        app.create_entry(&token, "Pay", "salary", "income", 2000.0, "2025-01-31")
            .await;

        let entries: Value = app
            .server
            .get(endpoints::ENTRIES)
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(entries.as_array().map(Vec::len), Some(2));

        app.server
            .delete(&TestApp::entry_path(&coffee))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let summary: Value = app
            .server
            .get(endpoints::ENTRIES_SUMMARY)
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(summary["balance"], 2000.0);
        assert_eq!(summary["entriesCount"], 1);
    }
}
