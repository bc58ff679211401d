//! Authentication: credential and card logins, admin card keys, password reset

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::Rng;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{AuthContext, Role, User, UserClaims},
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Student and professor login; admin accounts must use the admin logins
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self.validate_credentials(email, password).await?;
        if user.role.is_admin() {
            return Err(AppError::Authentication("Account unauthorized.".to_string()));
        }
        self.issue_token(&user)
    }

    /// Admin kiosk login. Without an email the configured admin account is used.
    pub async fn login_admin(
        &self,
        email: Option<&str>,
        password: &str,
        card_key: Option<&str>,
    ) -> AppResult<String> {
        let email = email
            .or(self.config.admin_email.as_deref())
            .ok_or_else(|| AppError::BadRequest("Admin email is not configured".to_string()))?;

        let user = self.validate_credentials(email, password).await?;
        if !user.role.is_admin() {
            return Err(AppError::Authentication("Account unauthorized.".to_string()));
        }
        check_card_key(&user, card_key)?;
        self.issue_token(&user)
    }

    pub async fn login_super_admin(
        &self,
        email: &str,
        password: &str,
        card_key: Option<&str>,
    ) -> AppResult<String> {
        let user = self.validate_credentials(email, password).await?;
        if user.role != Role::SuperAdmin {
            return Err(AppError::Authentication("Account unauthorized.".to_string()));
        }
        check_card_key(&user, card_key)?;
        self.issue_token(&user)
    }

    /// Tap-in with a card key alone
    pub async fn login_card(&self, card_key: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_card_key(card_key)
            .await?
            .ok_or_else(|| AppError::Authentication("Unknown card.".to_string()))?;
        self.issue_token(&user)
    }

    /// Authorize a new admin card key on the configured admin account
    pub async fn add_admin_key(&self, ctx: &AuthContext, key: &str) -> AppResult<()> {
        ctx.require_super_admin()?;

        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::BadRequest("ID must not be empty.".to_string()));
        }

        let mut admin = self.admin_account().await?;
        if !admin.metadata.add_key(key) {
            return Err(AppError::BadRequest("This key is already added.".to_string()));
        }
        self.repository
            .users
            .update_metadata(admin.id, &admin.metadata)
            .await?;

        tracing::info!("Admin key added by user {}", ctx.user_id);
        Ok(())
    }

    /// Whether the card key is authorized for admin access
    pub async fn check_admin_key(&self, key: &str) -> AppResult<bool> {
        let admin = self.admin_account().await?;
        Ok(admin.metadata.has_key(key.trim()))
    }

    /// Generate a reset code, keep its digest and mail it to the user
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let mut user = self.find_by_email(email).await?;

        let code = generate_otp();
        let ttl = self.config.otp_ttl_minutes;
        user.metadata.push_otp(&code, Duration::minutes(ttl), Utc::now());
        self.repository
            .users
            .update_metadata(user.id, &user.metadata)
            .await?;

        self.email
            .send_reset_code(&user.email, &user.name, &code, ttl)
            .await?;
        tracing::info!("Password reset requested for user {}", user.id);
        Ok(())
    }

    /// Consume a reset code and set the new password
    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> AppResult<()> {
        let mut user = self.find_by_email(email).await?;

        let accepted = user.metadata.take_otp(code.trim(), Utc::now());
        self.repository
            .users
            .update_metadata(user.id, &user.metadata)
            .await?;
        if !accepted {
            return Err(AppError::Authentication("Invalid or expired code.".to_string()));
        }

        let hash = hash_password(new_password)?;
        self.repository.users.update_password(user.id, &hash).await?;
        tracing::info!("Password reset for user {}", user.id);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        self.repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email not found : {}", email)))
    }

    async fn validate_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.find_by_email(email).await?;
        if !verify_password(&user, password)? {
            return Err(AppError::Authentication("Wrong password.".to_string()));
        }
        Ok(user)
    }

    async fn admin_account(&self) -> AppResult<User> {
        let email = self
            .config
            .admin_email
            .as_deref()
            .ok_or_else(|| AppError::Internal("Admin email is not configured".to_string()))?;
        self.repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin user not found.".to_string()))
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

/// Accounts with a registered card key must present it
fn check_card_key(user: &User, presented: Option<&str>) -> AppResult<()> {
    match (user.card_key.as_deref(), presented) {
        (None, _) => Ok(()),
        (Some(expected), Some(given)) if expected == given => Ok(()),
        (Some(_), _) => Err(AppError::Authentication(
            "Card key does not match this account.".to_string(),
        )),
    }
}

/// Six-digit numeric code
fn generate_otp() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user;

    #[test]
    fn test_password_hash_round_trip() {
        let mut account = user(1, "Ada", Role::Student);
        account.password = hash_password("s3cret").unwrap();

        assert!(account.password.starts_with("$argon2"));
        assert!(verify_password(&account, "s3cret").unwrap());
        assert!(!verify_password(&account, "wrong").unwrap());
    }

    #[test]
    fn test_card_key_only_checked_when_registered() {
        let mut admin = user(2, "Grace", Role::Admin);
        assert!(check_card_key(&admin, None).is_ok());
        assert!(check_card_key(&admin, Some("anything")).is_ok());

        admin.card_key = Some("04A1B2".to_string());
        assert!(check_card_key(&admin, Some("04A1B2")).is_ok());
        assert!(matches!(
            check_card_key(&admin, Some("FFFFFF")),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            check_card_key(&admin, None),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_otp_shape() {
        for _ in 0..50 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
