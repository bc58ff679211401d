//! API handlers for the campus asset REST endpoints

pub mod auth;
pub mod categories;
pub mod computer_logs;
pub mod computers;
pub mod health;
pub mod items;
pub mod locations;
pub mod maintenance;
pub mod openapi;
pub mod reports;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::{
    error::AppError,
    models::{user::UserClaims, AuthContext, PageRequest},
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Authentication("Missing or invalid authorization header".to_string())
                })?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims.into_context()))
    }
}

/// Uniform `{statusCode, message, data}` success envelope
pub struct ApiResponse<T> {
    status: StatusCode,
    message: String,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, T> {
    status_code: u16,
    message: &'a str,
    data: &'a T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Json(Envelope {
            status_code: self.status.as_u16(),
            message: &self.message,
            data: &self.data,
        });
        (self.status, body).into_response()
    }
}

/// `page` / `itemsPerPage` query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page, query.items_per_page)
    }
}
