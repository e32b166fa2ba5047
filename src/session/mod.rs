//! Session
//!
//! Mock authentication. The only accepted credentials are the demo account's,
//! and registration always succeeds. A signed-in session is kept in a
//! [`SessionStorage`] as an opaque token and a JSON user record.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{clock::Clock, validation::ValidationError};

mod models;
mod storage;

pub use models::{MIN_PASSWORD_LEN, NewUser, User};

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

#[cfg(test)]
pub use storage::MockSessionStorage;

/// Email of the demo account.
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Password of the demo account.
pub const DEMO_PASSWORD: &str = "password123";

/// Token issued to the demo account.
pub const DEMO_TOKEN: &str = "demo-jwt-token";

/// Prefix of tokens issued at registration.
pub const REGISTERED_TOKEN_PREFIX: &str = "mock-jwt-token-";

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email and password do not match the demo account
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration form failed validation
    #[error("invalid registration: {0}")]
    InvalidRegistration(#[from] ValidationError),

    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The user record could not be encoded
    #[error("failed to encode user record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The demo account's user record.
pub fn demo_user() -> User {
    User {
        id: 1,
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        email: DEMO_EMAIL.to_string(),
        phone: "+7 (999) 123-45-67".to_string(),
    }
}

/// Session
#[derive(Debug)]
pub struct Session<S> {
    storage: S,
    clock: Arc<dyn Clock>,
    token: Option<String>,
    user: Option<User>,
}

impl<S: SessionStorage> Session<S> {
    /// Resume the session kept in `storage`.
    ///
    /// The session is signed in only when both a token and a readable user
    /// record are present. A malformed user record is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn restore(storage: S, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let mut session = Self {
            storage,
            clock,
            token: None,
            user: None,
        };

        let token = session.storage.get(TOKEN_KEY)?;
        let user = session.storage.get(USER_KEY)?;

        if let (Some(token), Some(user)) = (token, user) {
            match serde_json::from_str::<User>(&user) {
                Ok(user) => {
                    debug!(user = user.id, "restored session");

                    session.token = Some(token);
                    session.user = Some(user);
                }
                Err(error) => {
                    warn!(%error, "ignoring malformed session user record");
                }
            }
        }

        Ok(session)
    }

    /// Sign in with the demo account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for anything but the demo
    /// credentials, or a storage error.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        if email.trim() != DEMO_EMAIL || password != DEMO_PASSWORD {
            debug!(email, "rejected login");

            return Err(AuthError::InvalidCredentials);
        }

        self.sign_in(DEMO_TOKEN.to_string(), demo_user())
    }

    /// Register a new account and sign in as it.
    ///
    /// The user id and the token are taken from the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidRegistration`] if the form is incomplete,
    /// or a storage error.
    pub fn register(&mut self, new_user: NewUser) -> Result<&User, AuthError> {
        new_user.validate()?;

        let millis = self.clock.now().as_millisecond();

        let user = User {
            id: u64::try_from(millis).unwrap_or_default(),
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            email: new_user.email.trim().to_string(),
            phone: new_user.phone.trim().to_string(),
        };

        self.sign_in(format!("{REGISTERED_TOKEN_PREFIX}{millis}"), user)
    }

    /// Sign out and forget the stored session.
    ///
    /// The session is signed out as soon as the token is gone, even if the
    /// user record cannot be removed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.storage.remove(TOKEN_KEY)?;

        self.token = None;

        if let Some(user) = self.user.take() {
            info!(user = user.id, "signed out");
        }

        self.storage.remove(USER_KEY)?;

        Ok(())
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The session token, if signed in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replace the stored session. The token is written last, so a failure
    /// part way leaves storage without a token and restores as signed out.
    fn sign_in(&mut self, token: String, user: User) -> Result<&User, AuthError> {
        let record = serde_json::to_string(&user)?;

        self.storage.remove(TOKEN_KEY)?;

        self.token = None;
        self.user = None;

        self.storage.set(USER_KEY, &record)?;
        self.storage.set(TOKEN_KEY, &token)?;

        info!(user = user.id, email = %user.email, "signed in");

        self.token = Some(token);

        Ok(&*self.user.insert(user))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mockall::Sequence;
    use testresult::TestResult;

    use crate::clock::FixedClock;

    use super::*;

    const NOW_MS: i64 = 1_734_516_000_000;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(
            Timestamp::from_millisecond(NOW_MS).unwrap_or(Timestamp::UNIX_EPOCH),
        ))
    }

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Anna".to_string(),
            last_name: "Petrova".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+7 (900) 000-00-00".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn fresh_storage_is_signed_out() -> TestResult {
        let session = Session::restore(MemoryStorage::new(), clock())?;

        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);

        Ok(())
    }

    #[test]
    fn demo_login_succeeds() -> TestResult {
        let mut session = Session::restore(MemoryStorage::new(), clock())?;

        let user = session.login(DEMO_EMAIL, DEMO_PASSWORD)?;

        assert_eq!(user.id, 1);
        assert_eq!(session.token(), Some(DEMO_TOKEN));
        assert_eq!(
            session.storage().get(TOKEN_KEY)?.as_deref(),
            Some(DEMO_TOKEN)
        );

        Ok(())
    }

    #[test]
    fn wrong_password_is_rejected() -> TestResult {
        let mut session = Session::restore(MemoryStorage::new(), clock())?;

        assert!(matches!(
            session.login(DEMO_EMAIL, "hunter2"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get(TOKEN_KEY)?, None);

        Ok(())
    }

    #[test]
    fn login_writes_the_token_last() -> TestResult {
        let mut storage = MockSessionStorage::new();
        let mut seq = Sequence::new();

        storage.expect_get().times(2).returning(|_| Ok(None));
        storage
            .expect_remove()
            .once()
            .in_sequence(&mut seq)
            .withf(|key: &str| key == TOKEN_KEY)
            .returning(|_| Ok(()));
        storage
            .expect_set()
            .once()
            .in_sequence(&mut seq)
            .withf(|key: &str, value: &str| key == USER_KEY && value.contains("\"firstName\""))
            .returning(|_, _| Ok(()));
        storage
            .expect_set()
            .once()
            .in_sequence(&mut seq)
            .withf(|key: &str, value: &str| key == TOKEN_KEY && value == DEMO_TOKEN)
            .returning(|_, _| Ok(()));

        let mut session = Session::restore(storage, clock())?;

        session.login(DEMO_EMAIL, DEMO_PASSWORD)?;

        assert!(session.is_authenticated());

        Ok(())
    }

    #[test]
    fn storage_failures_leave_the_session_signed_out() -> TestResult {
        let mut storage = MockSessionStorage::new();

        storage.expect_get().returning(|_| Ok(None));
        storage.expect_remove().returning(|_| Ok(()));
        storage.expect_set().returning(|key: &str, _| {
            Err(StorageError::InvalidKey(key.to_string()))
        });

        let mut session = Session::restore(storage, clock())?;

        assert!(matches!(
            session.login(DEMO_EMAIL, DEMO_PASSWORD),
            Err(AuthError::Storage(_))
        ));
        assert!(!session.is_authenticated());

        Ok(())
    }

    /// Memory storage whose writes to one key fail.
    #[derive(Debug, Clone, Default)]
    struct FailingKey {
        inner: MemoryStorage,
        failing: Option<&'static str>,
    }

    impl FailingKey {
        fn check(&self, key: &str) -> Result<(), StorageError> {
            if self.failing == Some(key) {
                return Err(StorageError::InvalidKey(key.to_string()));
            }

            Ok(())
        }
    }

    impl SessionStorage for FailingKey {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.remove(key)
        }
    }

    fn signed_in_with_failing(key: &'static str) -> Result<Session<FailingKey>, AuthError> {
        let mut session = Session::restore(FailingKey::default(), clock())?;
        session.login(DEMO_EMAIL, DEMO_PASSWORD)?;

        let mut storage = session.storage().clone();
        storage.failing = Some(key);

        Session::restore(storage, clock())
    }

    #[test]
    fn failed_user_write_does_not_pair_new_token_with_old_user() -> TestResult {
        let mut session = signed_in_with_failing(USER_KEY)?;

        assert!(matches!(
            session.register(new_user()),
            Err(AuthError::Storage(_))
        ));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);

        let restored = Session::restore(session.storage().clone(), clock())?;

        assert!(!restored.is_authenticated());
        assert_eq!(restored.token(), None);
        assert_eq!(restored.storage().get(TOKEN_KEY)?, None);

        Ok(())
    }

    #[test]
    fn failed_user_removal_still_signs_out() -> TestResult {
        let mut session = signed_in_with_failing(USER_KEY)?;

        assert!(session.is_authenticated());
        assert!(matches!(session.logout(), Err(AuthError::Storage(_))));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);

        let restored = Session::restore(session.storage().clone(), clock())?;

        assert!(!restored.is_authenticated());

        Ok(())
    }

    #[test]
    fn register_issues_time_based_identity() -> TestResult {
        let mut session = Session::restore(MemoryStorage::new(), clock())?;

        let user = session.register(new_user())?;

        assert_eq!(user.id, 1_734_516_000_000);
        assert_eq!(user.first_name, "Anna");
        assert_eq!(session.token(), Some("mock-jwt-token-1734516000000"));

        Ok(())
    }

    #[test]
    fn incomplete_registration_is_rejected() -> TestResult {
        let mut session = Session::restore(MemoryStorage::new(), clock())?;

        let result = session.register(NewUser {
            email: "not-an-email".to_string(),
            ..new_user()
        });

        assert!(matches!(
            result,
            Err(AuthError::InvalidRegistration(ValidationError::InvalidEmail))
        ));
        assert!(!session.is_authenticated());

        Ok(())
    }

    #[test]
    fn session_survives_restore() -> TestResult {
        let mut session = Session::restore(MemoryStorage::new(), clock())?;
        session.register(new_user())?;

        let storage = session.storage().clone();
        let restored = Session::restore(storage, clock())?;

        assert_eq!(
            restored.current_user().map(|user| user.email.as_str()),
            Some("anna@example.com")
        );
        assert_eq!(restored.token(), Some("mock-jwt-token-1734516000000"));

        Ok(())
    }

    #[test]
    fn token_without_user_is_signed_out() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, DEMO_TOKEN)?;

        let session = Session::restore(storage, clock())?;

        assert!(!session.is_authenticated());

        Ok(())
    }

    #[test]
    fn malformed_user_record_is_ignored() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, DEMO_TOKEN)?;
        storage.set(USER_KEY, "{not json")?;

        let session = Session::restore(storage, clock())?;

        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);

        Ok(())
    }

    #[test]
    fn logout_clears_storage() -> TestResult {
        let mut session = Session::restore(MemoryStorage::new(), clock())?;
        session.login(DEMO_EMAIL, DEMO_PASSWORD)?;

        session.logout()?;

        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.storage().get(TOKEN_KEY)?, None);
        assert_eq!(session.storage().get(USER_KEY)?, None);

        Ok(())
    }
}
