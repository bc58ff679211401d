//! User model, typed metadata blob and JWT claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Campus actor roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Prof,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Prof => "PROF",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One pending password reset code. Only the SHA-256 digest is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpEntry {
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

/// Typed view of the `metadata` JSONB column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Card keys authorized for admin kiosk access
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub otp: Vec<OtpEntry>,
}

impl UserMetadata {
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns false when the key is already present
    pub fn add_key(&mut self, key: &str) -> bool {
        if self.has_key(key) {
            return false;
        }
        self.keys.push(key.to_string());
        true
    }

    /// Record a new reset code, dropping expired ones
    pub fn push_otp(&mut self, code: &str, ttl: Duration, now: DateTime<Utc>) {
        self.otp.retain(|entry| entry.expires_at > now);
        self.otp.push(OtpEntry {
            digest: otp_digest(code),
            expires_at: now + ttl,
        });
    }

    /// Consume a matching, unexpired code. Expired entries are pruned either way.
    pub fn take_otp(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        self.otp.retain(|entry| entry.expires_at > now);
        let digest = otp_digest(code);
        match self.otp.iter().position(|entry| entry.digest == digest) {
            Some(idx) => {
                self.otp.remove(idx);
                true
            }
            None => false,
        }
    }
}

fn otp_digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub uuid: Uuid,
    pub email: String,
    /// Student or employee number, optional for admins
    pub id_number: Option<String>,
    pub name: String,
    pub year_section: Option<String>,
    pub role: Role,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub card_key: Option<String>,
    #[serde(skip_serializing, default)]
    #[sqlx(json)]
    #[schema(value_type = Object)]
    pub metadata: UserMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Register user request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub role: Role,
    pub year_section: Option<String>,
    pub id_number: Option<String>,
    pub card_key: Option<String>,
}

/// Update user request (admin)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub id_number: Option<String>,
    pub name: Option<String>,
    pub year_section: Option<String>,
    pub role: Option<Role>,
    pub card_key: Option<String>,
}

/// Change own year/section request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeSection {
    #[validate(length(min = 1, message = "Section must not be empty"))]
    pub section: String,
}

/// User list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
    pub role: Option<Role>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    /// User id
    pub sub: i32,
    pub name: String,
    pub uuid: Uuid,
    pub year_section: String,
    pub id_number: String,
    pub email: String,
    pub role: Role,
    pub card_key: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn for_user(user: &User, ttl_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.id,
            name: user.name.clone(),
            uuid: user.uuid,
            year_section: user.year_section.clone().unwrap_or_default(),
            id_number: user.id_number.clone().unwrap_or_default(),
            email: user.email.clone(),
            role: user.role,
            card_key: user.card_key.clone(),
            exp: now + (ttl_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn into_context(self) -> AuthContext {
        AuthContext {
            user_id: self.sub,
            uuid: self.uuid,
            name: self.name,
            email: self.email,
            role: self.role,
        }
    }
}

/// Verified caller identity handed to services
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    /// ADMIN or SUPER_ADMIN
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only available to ADMIN accounts".to_string(),
            ))
        }
    }

    pub fn require_super_admin(&self) -> Result<(), AppError> {
        if self.role == Role::SuperAdmin {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only available to SUPER_ADMIN accounts".to_string(),
            ))
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(id: i32, name: &str, role: Role) -> User {
        User {
            id,
            uuid: Uuid::new_v4(),
            email: format!("{}@campus.edu", name.to_lowercase()),
            id_number: Some(format!("2024-{:05}", id)),
            name: name.to_string(),
            year_section: Some("BSCS-3A".to_string()),
            role,
            password: String::new(),
            card_key: None,
            metadata: UserMetadata::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
