//! Authentication endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::AppResult;

use super::{ApiResponse, AuthenticatedUser};

/// Credential login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Admin login request; the configured admin account is used without an email
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub card_key: Option<String>,
}

/// Super admin login request
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuperAdminLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub card_key: Option<String>,
}

/// Card tap login request
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardLoginRequest {
    #[validate(length(min = 1, message = "Card key must not be empty"))]
    pub card_key: String,
}

/// Admin card key
#[derive(Deserialize, ToSchema)]
pub struct AddAdminRequest {
    pub id: String,
}

#[derive(Deserialize, IntoParams)]
pub struct CheckAdminQuery {
    /// Card key to check
    pub id: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub otp: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub new_password: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    pub token: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAdminResponse {
    pub is_valid: bool,
}

/// Student and professor login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successfully logged in", body = TokenResponse),
        (status = 401, description = "Wrong password or admin account", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown email", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    request.validate()?;
    let token = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;
    Ok(ApiResponse::ok("Successfully logged in", TokenResponse { token }))
}

/// Admin login
#[utoipa::path(
    post,
    path = "/auth/loginAdmin",
    tag = "auth",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Successfully logged in", body = TokenResponse),
        (status = 401, description = "Wrong password, card key or role", body = crate::error::ErrorResponse)
    )
)]
pub async fn login_admin(
    State(state): State<crate::AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    request.validate()?;
    let token = state
        .services
        .auth
        .login_admin(
            request.email.as_deref(),
            &request.password,
            request.card_key.as_deref(),
        )
        .await?;
    Ok(ApiResponse::ok("Successfully logged in", TokenResponse { token }))
}

/// Super admin login
#[utoipa::path(
    post,
    path = "/auth/loginSuperAdmin",
    tag = "auth",
    request_body = SuperAdminLoginRequest,
    responses(
        (status = 200, description = "Successfully logged in", body = TokenResponse),
        (status = 401, description = "Wrong password, card key or role", body = crate::error::ErrorResponse)
    )
)]
pub async fn login_super_admin(
    State(state): State<crate::AppState>,
    Json(request): Json<SuperAdminLoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    request.validate()?;
    let token = state
        .services
        .auth
        .login_super_admin(&request.email, &request.password, request.card_key.as_deref())
        .await?;
    Ok(ApiResponse::ok("Successfully logged in", TokenResponse { token }))
}

/// Card tap login
#[utoipa::path(
    post,
    path = "/auth/loginCard",
    tag = "auth",
    request_body = CardLoginRequest,
    responses(
        (status = 200, description = "Successfully logged in", body = TokenResponse),
        (status = 401, description = "Unknown card", body = crate::error::ErrorResponse)
    )
)]
pub async fn login_card(
    State(state): State<crate::AppState>,
    Json(request): Json<CardLoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    request.validate()?;
    let token = state.services.auth.login_card(&request.card_key).await?;
    Ok(ApiResponse::ok("Successfully logged in", TokenResponse { token }))
}

/// Authorize a new admin card key
#[utoipa::path(
    post,
    path = "/auth/addAdmin",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = AddAdminRequest,
    responses(
        (status = 200, description = "Successfully added new admin"),
        (status = 400, description = "Empty or duplicate key", body = crate::error::ErrorResponse),
        (status = 403, description = "Not a super admin", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_admin(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<AddAdminRequest>,
) -> AppResult<ApiResponse<Option<()>>> {
    state.services.auth.add_admin_key(&ctx, &request.id).await?;
    Ok(ApiResponse::ok("Successfully added new admin", None))
}

/// Check whether a card key is an authorized admin key
#[utoipa::path(
    get,
    path = "/auth/checkAdmin",
    tag = "auth",
    params(CheckAdminQuery),
    responses(
        (status = 200, description = "Successfully checked if card is valid.", body = CheckAdminResponse)
    )
)]
pub async fn check_admin(
    State(state): State<crate::AppState>,
    Query(query): Query<CheckAdminQuery>,
) -> AppResult<ApiResponse<CheckAdminResponse>> {
    let is_valid = state.services.auth.check_admin_key(&query.id).await?;
    Ok(ApiResponse::ok(
        "Successfully checked if card is valid.",
        CheckAdminResponse { is_valid },
    ))
}

/// Email a one-time password reset code
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code sent"),
        (status = 404, description = "Unknown email", body = crate::error::ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<crate::AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<Option<()>>> {
    request.validate()?;
    state.services.auth.forgot_password(&request.email).await?;
    Ok(ApiResponse::ok("Password reset code sent", None))
}

/// Set a new password using a reset code
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 401, description = "Invalid or expired code", body = crate::error::ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<crate::AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<ApiResponse<Option<()>>> {
    request.validate()?;
    state
        .services
        .auth
        .reset_password(&request.email, &request.otp, &request.new_password)
        .await?;
    Ok(ApiResponse::ok("Password successfully reset", None))
}
