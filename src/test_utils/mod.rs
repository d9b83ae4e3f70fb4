//! Helpers for testing the HTTP API against an in-memory database.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, PasswordHash, ServerConfig, build_router,
    endpoints::{self, format_endpoint},
    user::create_user,
};

/// The full application router served over an in-memory database.
pub(crate) struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(
            Connection::open_in_memory().expect("Could not open database in memory."),
            "foobar",
            ServerConfig {
                password_hash_cost: 4,
                ..Default::default()
            },
        )
        .expect("Could not create app state.");
        let server = TestServer::new(build_router(state.clone()));

        Self { server, state }
    }

    /// Insert a user directly into the database and return a bearer token for them.
    #[track_caller]
    pub fn register(&self, email: &str) -> String {
        let user = create_user(
            email,
            PasswordHash::from_stored("not a real hash".to_owned()),
            &self.state.db_connection.lock().unwrap(),
        )
        .expect("Could not create user");

        self.state
            .jwt_keys
            .issue(user.id)
            .expect("Could not issue token")
    }

    /// Create an entry through the API and return the response body.
    pub async fn create_entry(
        &self,
        token: &str,
        description: &str,
        category: &str,
        entry_type: &str,
        amount: f64,
        date: &str,
    ) -> Value {
        let response = self
            .server
            .post(endpoints::ENTRIES)
            .authorization_bearer(token)
            .json(&json!({
                "description": description,
                "category": category,
                "type": entry_type,
                "amount": amount,
                "date": date,
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);

        response.json()
    }

    /// The path of an entry returned by the API.
    #[track_caller]
    pub fn entry_path(entry: &Value) -> String {
        let id = entry["id"].as_i64().expect("entry should have an integer id");

        format_endpoint(endpoints::ENTRY, id)
    }
}
