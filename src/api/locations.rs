//! Room and lab endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::location::{CreateLocation, Location},
};

use super::{ApiResponse, AuthenticatedUser};

/// Create a location (admin only)
#[utoipa::path(
    post,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 409, description = "Location exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateLocation>,
) -> AppResult<ApiResponse<Location>> {
    request.validate()?;
    let location = state.services.items.create_location(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully created location", location))
}

#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All locations", body = Vec<Location>)
    )
)]
pub async fn list_locations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<Location>>> {
    let locations = state.services.items.list_locations().await?;
    Ok(ApiResponse::ok("Successfully fetched locations", locations))
}

#[utoipa::path(
    get,
    path = "/locations/{name}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Location name, e.g. 2CL3B")),
    responses(
        (status = 200, description = "Location found", body = Location),
        (status = 404, description = "Location does not exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<Location>> {
    let location = state.services.items.get_location(&name).await?;
    Ok(ApiResponse::ok("Successfully fetched location", location))
}
