use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use user_service_core::{
    CreateUserOutcome, NewUser, ProfileUpdate, UpdateUserOutcome, UserProfile,
};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserProfile>,
}

/// Body of `DELETE /api/v1/users`
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub username: String,
    pub deleted: bool,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(ListUsersResponse { users }))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.users.get_user(&username).await?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<CreateUserOutcome>), ApiError> {
    let outcome = state.users.create_user(req).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<UpdateUserOutcome>, ApiError> {
    let outcome = state.users.update_user(req).await?;
    Ok(Json(outcome))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteUserRequest>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    remove(&state, req.username).await
}

pub async fn delete_user_by_name(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    remove(&state, username).await
}

async fn remove(state: &AppState, username: String) -> Result<Json<DeleteUserResponse>, ApiError> {
    state.users.delete_user(&username).await?;
    Ok(Json(DeleteUserResponse {
        username,
        deleted: true,
    }))
}
