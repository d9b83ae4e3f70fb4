//! Password strength checks and bcrypt hashing for user accounts.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A plain text password that passed the strength check but is not hashed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`, also penalising passwords that
    /// contain any of `user_inputs` such as the user's email address.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's suggestions if the password is
    /// easy to guess.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Skip the strength check. Only meant for test fixtures.
    #[cfg(test)]
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's recommended cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. due to an invalid
    /// `cost`.
    pub fn new(password: &ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash loaded from the database.
    pub fn from_stored(stored_hash: String) -> Self {
        Self(stored_hash)
    }

    /// Check whether `raw_password` produces this hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, PasswordHash, ValidatedPassword};

    #[test]
    fn rejects_empty_and_common_passwords() {
        assert!(matches!(
            ValidatedPassword::new("", &[]),
            Err(Error::TooWeak(_))
        ));
        assert!(matches!(
            ValidatedPassword::new("password123", &[]),
            Err(Error::TooWeak(_))
        ));
    }

    #[test]
    fn rejects_password_made_of_user_inputs() {
        let result = ValidatedPassword::new("jane.doe@example.com", &["jane.doe@example.com"]);

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn accepts_strong_password() {
        assert!(ValidatedPassword::new("correct horse battery staple", &[]).is_ok());
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let password = ValidatedPassword::new_unchecked("correct horse battery staple");
        let hash = PasswordHash::new(&password, 4).unwrap();

        assert!(hash.verify("correct horse battery staple").unwrap());
        assert!(!hash.verify("incorrect horse battery staple").unwrap());
    }
}
