//! Authentication seam and login form
//!
//! Credential checks are delegated to an `AuthService`; the core only drives
//! the text-entry flow and reports errors for display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::PlayerId;

/// Maximum characters accepted per form field
pub const MAX_FIELD_LEN: usize = 20;

/// Errors shown to the player on the login screen
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Username already taken")]
    UserExists,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Incorrect password")]
    BadPassword,

    /// The account backend could not be reached
    #[error("Account service unavailable: {0}")]
    Unavailable(String),
}

/// Log in to an existing account or create a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Credential verification
pub trait AuthService {
    /// Verify (or create) an account, returning its player id
    fn authenticate(
        &self,
        username: &str,
        password: &str,
        mode: AuthMode,
    ) -> Result<PlayerId, AuthError>;

    /// Whether an account with this name exists
    fn account_exists(&self, username: &str) -> Result<bool, AuthError>;
}

/// Which field the form is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStep {
    Username,
    Password,
}

/// Login/registration text-entry state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    mode: AuthMode,
    password_step: bool,
    username: String,
    password: String,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn step(&self) -> FormStep {
        if self.password_step {
            FormStep::Password
        } else {
            FormStep::Username
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password as displayed (one `*` per character)
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    /// Last error, for display
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch between login and registration (only before a username is submitted)
    pub fn choose_mode(&mut self, mode: AuthMode) {
        if self.password_step {
            return;
        }
        self.mode = mode;
        self.username.clear();
        self.password.clear();
        self.error = None;
    }

    fn field_mut(&mut self) -> &mut String {
        if self.password_step {
            &mut self.password
        } else {
            &mut self.username
        }
    }

    /// Append a typed character to the active field (control characters ignored)
    pub fn type_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        let field = self.field_mut();
        if field.chars().count() < MAX_FIELD_LEN {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    fn fail(&mut self, err: AuthError) {
        log::warn!("Login form: {}", err);
        self.error = Some(err.to_string());
    }

    /// Submit the active field. Returns the player id once authenticated.
    pub fn submit(&mut self, auth: &dyn AuthService) -> Option<PlayerId> {
        let username = self.username.trim().to_string();

        if !self.password_step {
            if username.is_empty() {
                self.fail(AuthError::EmptyUsername);
                return None;
            }
            match (auth.account_exists(&username), self.mode) {
                (Err(err), _) => self.fail(err),
                (Ok(false), AuthMode::Login) => self.fail(AuthError::UserNotFound),
                (Ok(true), AuthMode::Register) => {
                    self.username.clear();
                    self.fail(AuthError::UserExists);
                }
                (Ok(_), _) => {
                    self.password_step = true;
                    self.password.clear();
                    self.error = None;
                }
            }
            return None;
        }

        let password = self.password.trim().to_string();
        match auth.authenticate(&username, &password, self.mode) {
            Ok(id) => {
                log::info!("Player '{}' authenticated as {}", username, id);
                self.error = None;
                Some(id)
            }
            Err(err) => {
                // Back to the username step; registration starts over
                self.password_step = false;
                self.password.clear();
                if self.mode == AuthMode::Register {
                    self.username.clear();
                }
                self.fail(err);
                None
            }
        }
    }
}
