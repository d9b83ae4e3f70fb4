//! Settings that change how the server behaves between deployments.

use std::fmt::Display;

use clap::ValueEnum;
use serde::Serialize;
use time::Duration;

use crate::PasswordHash;

/// The deployment the server is running in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development. Internal error details are sent to clients.
    #[default]
    Development,
    /// A public deployment. Internal error details are only logged.
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// The lowercase name of the environment.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The origin of the hosted frontend, which is always allowed by CORS.
pub const HOSTED_FRONTEND_URL: &str = "https://finance-diary-frontend.vercel.app";

/// The origin of the frontend development server.
pub const LOCAL_FRONTEND_URL: &str = "http://localhost:3000";

/// How long a bearer token is valid for if not otherwise specified.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(7);

/// Server settings that do not depend on the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// The deployment the server is running in.
    pub environment: Environment,
    /// An extra origin allowed to make cross-origin requests.
    pub frontend_url: String,
    /// How long an issued bearer token is valid for.
    pub token_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            frontend_url: LOCAL_FRONTEND_URL.to_owned(),
            token_duration: DEFAULT_TOKEN_DURATION,
            password_hash_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    /// The origins allowed to make cross-origin requests, without duplicates.
    pub fn allowed_origins(&self) -> Vec<&str> {
        let mut origins = vec![self.frontend_url.as_str()];

        for origin in [HOSTED_FRONTEND_URL, LOCAL_FRONTEND_URL] {
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }

        origins
    }
}
