use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const USERNAME_MAX_LEN: usize = 150;

/// User entity - an author of posts and comments.
///
/// The username is the public lookup key for profile pages. Credentials are
/// owned by the external auth layer and never reach this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: email.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the display fields; the id and join date never change.
    pub fn apply(&mut self, fields: ProfileFields, now: DateTime<Utc>) {
        self.username = fields.username;
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.email = fields.email;
        self.updated_at = now;
    }
}

/// The user-editable part of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileFields {
    /// Usernames are 1-150 characters of letters, digits and `@.+-_`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.is_empty() || self.username.chars().count() > USERNAME_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "username must be between 1 and {USERNAME_MAX_LEN} characters"
            )));
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(DomainError::Validation(
                "username may only contain letters, digits and @/./+/-/_".to_string(),
            ));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }
}
