//! Issues and verifies the JSON Web Tokens used as bearer tokens.

use std::fmt::Debug;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::AuthError, user::UserID};

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The user the token was issued to.
    #[serde(rename = "userId")]
    pub user_id: UserID,
    /// The expiry time of the token as a Unix timestamp.
    pub exp: u64,
    /// The time the token was issued as a Unix timestamp.
    pub iat: u64,
}

/// The keys for signing and verifying bearer tokens, derived from one secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
    has_secret: bool,
}

impl Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("token_duration", &self.token_duration)
            .field("has_secret", &self.has_secret)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Create keys from `secret`. Issued tokens are valid for `token_duration`.
    pub fn new(secret: &str, token_duration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration,
            has_secret: !secret.is_empty(),
        }
    }

    /// Whether the keys were derived from a non-empty secret.
    pub fn has_secret(&self) -> bool {
        self.has_secret
    }

    /// Create a signed token for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::TokenCreation] if the expiry time is out of range or
    /// the token could not be encoded.
    pub fn issue(&self, user_id: UserID) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now.checked_add(self.token_duration).ok_or_else(|| {
            Error::TokenCreation(format!(
                "token duration {} is out of range",
                self.token_duration
            ))
        })?;
        let claims = Claims {
            user_id,
            exp: unix_seconds(expires_at),
            iat: unix_seconds(now),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|error| Error::TokenCreation(error.to_string()))
    }

    /// Get the user a token was issued to.
    ///
    /// # Errors
    /// Returns [AuthError::InvalidToken] if the token was not signed with these
    /// keys, is malformed or has expired.
    pub fn authenticate(&self, token: &str) -> Result<UserID, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims.user_id)
            .map_err(|error| {
                tracing::debug!("Rejected bearer token: {error}");
                AuthError::InvalidToken
            })
    }
}

fn unix_seconds(date_time: OffsetDateTime) -> u64 {
    date_time.unix_timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use crate::{AuthError, Error, JwtKeys, UserID};

    #[test]
    fn issued_token_authenticates_user() {
        let keys = JwtKeys::new("foobar", Duration::hours(1));
        let user_id = UserID::new(42);

        let token = keys.issue(user_id).unwrap();

        assert_eq!(keys.authenticate(&token), Ok(user_id));
    }

    #[test]
    fn issue_fails_for_out_of_range_duration() {
        let keys = JwtKeys::new("foobar", Duration::MAX);

        let result = keys.issue(UserID::new(1));

        assert!(matches!(result, Err(Error::TokenCreation(_))));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let keys = JwtKeys::new("foobar", Duration::hours(1));
        let other_keys = JwtKeys::new("bazqux", Duration::hours(1));

        let token = other_keys.issue(UserID::new(1)).unwrap();

        assert_eq!(keys.authenticate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid() {
        let keys = JwtKeys::new("foobar", Duration::hours(-1));

        let token = keys.issue(UserID::new(1)).unwrap();

        assert_eq!(keys.authenticate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let keys = JwtKeys::new("foobar", Duration::hours(1));

        assert_eq!(
            keys.authenticate("not.a.token"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn debug_does_not_print_keys() {
        let keys = JwtKeys::new("supersecret", Duration::hours(1));

        assert!(!format!("{keys:?}").contains("supersecret"));
    }
}
