//! Local email/password accounts
//!
//! Accounts and the current session live in the same key-value store as
//! conversations, under their own keys. Passwords are kept as salted
//! SHA-256 digests. Every failure maps to a short user-facing message.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::helpers;
use crate::storage::persistence::{format_instant, parse_instant};
use crate::storage::KeyValueStore;

/// Key of the account list
pub const USERS_KEY: &str = "chatdesk-users";

/// Key of the current session
pub const SESSION_KEY: &str = "chatdesk-session";

const MIN_PASSWORD_CHARS: usize = 6;
const SALT_BYTES: usize = 16;

/// Authentication failures, displayed as user-facing text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("This email is already registered. Please sign in instead.")]
    AlreadyRegistered,

    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,

    /// Anything else; the detail is logged, not shown
    #[error("Something went wrong. Please try again.")]
    Unexpected { detail: String },
}

impl AuthError {
    fn unexpected(detail: impl std::fmt::Display) -> Self {
        let detail = detail.to_string();
        warn!("Auth storage failure: {}", detail);
        AuthError::Unexpected { detail }
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    email: String,
    salt: String,
    password_hash: String,
    created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    user_id: String,
    signed_in_at: String,
}

impl UserRecord {
    fn to_user(&self) -> Result<User, AuthError> {
        Ok(User {
            id: self.id.clone(),
            email: self.email.clone(),
            created_at: parse_instant(&self.created_at).map_err(AuthError::unexpected)?,
        })
    }
}

/// Checks the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn hash_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    BASE64.encode(hasher.finalize())
}

fn validate(email: &str, password: &str) -> Result<(), AuthError> {
    if !is_valid_email(email) {
        return Err(AuthError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

/// Sign-up, sign-in and session handling over a key-value store
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load_users(&self) -> Result<Vec<UserRecord>, AuthError> {
        match self.store.get(USERS_KEY).map_err(AuthError::unexpected)? {
            Some(data) => serde_json::from_str(&data).map_err(AuthError::unexpected),
            None => Ok(Vec::new()),
        }
    }

    fn save_users(&self, users: &[UserRecord]) -> Result<(), AuthError> {
        let data = serde_json::to_string(users).map_err(AuthError::unexpected)?;
        self.store
            .set(USERS_KEY, &data)
            .map_err(AuthError::unexpected)
    }

    fn start_session(&self, user: &UserRecord) -> Result<(), AuthError> {
        let session = SessionRecord {
            user_id: user.id.clone(),
            signed_in_at: format_instant(helpers::now()),
        };
        let data = serde_json::to_string(&session).map_err(AuthError::unexpected)?;
        self.store
            .set(SESSION_KEY, &data)
            .map_err(AuthError::unexpected)
    }

    /// Registers an account and signs it in
    ///
    /// The email is trimmed and lower-cased before use.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` or `PasswordTooShort` for bad input,
    /// `AlreadyRegistered` for a known email, `Unexpected` if storage fails
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chatdesk::auth::{AuthError, AuthService};
    /// use chatdesk::storage::MemoryStore;
    ///
    /// let auth = AuthService::new(Arc::new(MemoryStore::new()));
    /// let user = auth.sign_up("Ada@Example.com", "secret1").unwrap();
    /// assert_eq!(user.email, "ada@example.com");
    /// assert_eq!(
    ///     auth.sign_up("ada@example.com", "another1"),
    ///     Err(AuthError::AlreadyRegistered)
    /// );
    /// ```
    pub fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        validate(&email, password)?;

        let mut users = self.load_users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::AlreadyRegistered);
        }

        let mut salt = [0u8; SALT_BYTES];
        rand::rng().fill(&mut salt);
        let record = UserRecord {
            id: helpers::new_id(),
            email,
            salt: BASE64.encode(salt),
            password_hash: hash_password(&salt, password),
            created_at: format_instant(helpers::now()),
        };
        let user = record.to_user()?;

        users.push(record.clone());
        self.save_users(&users)?;
        self.start_session(&record)?;

        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Signs in with email and password
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown email or wrong password
    pub fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        validate(&email, password)?;

        let users = self.load_users()?;
        let record = users
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::InvalidCredentials)?;

        let salt = BASE64.decode(&record.salt).map_err(AuthError::unexpected)?;
        if hash_password(&salt, password) != record.password_hash {
            debug!("Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(record)?;
        info!(user_id = %record.id, "Signed in");
        record.to_user()
    }

    /// Ends the current session; signing out twice is fine
    pub fn sign_out(&self) -> Result<(), AuthError> {
        self.store
            .remove(SESSION_KEY)
            .map_err(AuthError::unexpected)?;
        info!("Signed out");
        Ok(())
    }

    /// The signed-in account, if any
    ///
    /// A session pointing at a missing account counts as signed out.
    pub fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(data) = self.store.get(SESSION_KEY).map_err(AuthError::unexpected)? else {
            return Ok(None);
        };
        let session: SessionRecord = serde_json::from_str(&data).map_err(AuthError::unexpected)?;

        self.load_users()?
            .iter()
            .find(|u| u.id == session.user_id)
            .map(UserRecord::to_user)
            .transpose()
    }

    /// True if a session exists for a known account
    pub fn is_authenticated(&self) -> bool {
        matches!(self.current_user(), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatdeskError;
    use crate::storage::{MemoryStore, MockKeyValueStore};

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b@c.co"));
    }

    #[test]
    fn test_sign_up_validates_input() {
        let auth = service();
        assert_eq!(auth.sign_up("nope", "secret1"), Err(AuthError::InvalidEmail));
        assert_eq!(
            auth.sign_up("a@b.co", "12345"),
            Err(AuthError::PasswordTooShort)
        );
    }

    #[test]
    fn test_sign_up_starts_session() {
        let auth = service();
        let user = auth.sign_up("a@b.co", "secret1").unwrap();
        assert_eq!(auth.current_user().unwrap(), Some(user));
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_duplicate_sign_up_is_rejected() {
        let auth = service();
        auth.sign_up("a@b.co", "secret1").unwrap();
        let err = auth.sign_up(" A@B.CO ", "secret2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "This email is already registered. Please sign in instead."
        );
    }

    #[test]
    fn test_sign_in_round_trip() {
        let auth = service();
        let created = auth.sign_up("a@b.co", "secret1").unwrap();
        auth.sign_out().unwrap();
        assert_eq!(auth.current_user().unwrap(), None);

        let signed_in = auth.sign_in("a@b.co", "secret1").unwrap();
        assert_eq!(signed_in, created);
        assert!(auth.is_authenticated());
    }

    #[test]
    fn test_sign_in_wrong_password_or_unknown_email() {
        let auth = service();
        auth.sign_up("a@b.co", "secret1").unwrap();
        auth.sign_out().unwrap();

        assert_eq!(
            auth.sign_in("a@b.co", "secret2"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.sign_in("x@b.co", "secret1"),
            Err(AuthError::InvalidCredentials)
        );
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_passwords_are_not_stored_in_clear() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone());
        auth.sign_up("a@b.co", "secret-password").unwrap();

        let raw = store.get(USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("secret-password"));
        assert!(raw.contains("passwordHash"));
    }

    #[test]
    fn test_same_password_gets_distinct_hashes() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone());
        auth.sign_up("a@b.co", "secret1").unwrap();
        auth.sign_up("c@d.co", "secret1").unwrap();

        let users: Vec<UserRecord> =
            serde_json::from_str(&store.get(USERS_KEY).unwrap().unwrap()).unwrap();
        assert_ne!(users[0].password_hash, users[1].password_hash);
    }

    #[test]
    fn test_sign_out_twice_is_ok() {
        let auth = service();
        assert!(auth.sign_out().is_ok());
        assert!(auth.sign_out().is_ok());
    }

    #[test]
    fn test_storage_failure_is_generic() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(ChatdeskError::Storage("disk gone".into()).into()));
        let auth = AuthService::new(Arc::new(mock));

        let err = auth.sign_in("a@b.co", "secret1").unwrap_err();
        assert!(matches!(err, AuthError::Unexpected { .. }));
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
    }
}
