//! Session Gate
//!
//! Ephemeral login check in front of the dashboard. Credentials come from the
//! `[auth]` config section and the authenticated flag lives only as long as
//! the session value.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::config::AuthConfig;

/// Authentication errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Login state for one dashboard session
#[derive(Debug)]
pub struct Session {
    username: String,
    password: String,
    authenticated: AtomicBool,
}

impl Session {
    /// New, logged-out session accepting the configured credentials
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            authenticated: AtomicBool::new(false),
        }
    }

    /// Mark the session authenticated when both fields match
    pub fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.username && password == self.password {
            self.authenticated.store(true, Ordering::SeqCst);
            tracing::info!(username = %username, "Login succeeded");
            Ok(())
        } else {
            tracing::warn!(username = %username, "Login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }

    pub fn logout(&self) {
        if self.authenticated.swap(false, Ordering::SeqCst) {
            tracing::info!("Logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&AuthConfig {
            username: "analyst".into(),
            password: "secret".into(),
        })
    }

    #[test]
    fn test_login_logout() {
        let session = session();
        assert!(!session.is_authenticated());

        session.login("analyst", "secret").unwrap();
        assert!(session.is_authenticated());

        session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_rejects_wrong_credentials() {
        let session = session();

        assert_eq!(session.login("analyst", "nope"), Err(AuthError::InvalidCredentials));
        assert_eq!(session.login("Analyst", "secret"), Err(AuthError::InvalidCredentials));
        assert!(!session.is_authenticated());
    }
}
