//! User accounts
//!
//! Only the directory side of an account lives here: who the person is and
//! how to reach them. Credentials are handled elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DomainError, Result};
use crate::ids::UserId;
use crate::validation::{RequiredFields, is_valid_email, normalize_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Client,
    Provider,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Provider => "provider",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(UserRole::Client),
            "provider" => Ok(UserRole::Provider),
            "admin" => Ok(UserRole::Admin),
            other => Err(DomainError::Validation(format!("invalid role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl NewUser {
    pub fn into_account(self) -> Result<UserAccount> {
        let mut required = RequiredFields::default();
        let name = required.take("name", self.name);
        let email = required.take("email", self.email);
        required.finish()?;

        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(DomainError::Validation(format!("invalid email '{email}'")));
        }

        Ok(UserAccount {
            id: UserId::new(),
            name,
            email,
            role: self.role.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }
}
