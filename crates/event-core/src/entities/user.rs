//! User entity - an account that can own events and hold reservations

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    /// Address used for event reminders
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password hash travels separately
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub email: String,
}

impl NewUser {
    pub fn new(login: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            email: email.into(),
        }
    }
}
