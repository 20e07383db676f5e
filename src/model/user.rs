use super::UserId;
use serde::{Deserialize, Serialize};

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub gold: i64,
    pub food: i64,
    #[serde(default)]
    pub allies: Vec<UserId>,
}

/// Registration input. The password is hashed before it reaches an actor.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}
