use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::handlers::is_valid_email,
    auth::jwt::{AdminUser, AuthUser},
    auth::password::hash_password,
    error::{Error, Result},
    state::AppState,
    users::dto::{UpdateUserRequest, UserResponse},
    users::repo::{self, Role},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_identity): AdminUser,
) -> Result<Json<Vec<UserResponse>>> {
    let users = repo::list(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    if identity.user_id != id && !identity.is_admin() {
        return Err(Error::Forbidden("cannot view another user's profile".into()));
    }
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(Error::NotFound("user"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    if identity.user_id != id && !identity.is_admin() {
        return Err(Error::Forbidden("cannot edit another user's profile".into()));
    }
    if payload.is_empty() {
        return Err(Error::Validation("no fields to update".into()));
    }

    let email = match payload.email.as_deref() {
        Some(raw) => {
            let normalized = raw.trim().to_lowercase();
            if !is_valid_email(&normalized) {
                warn!(email = %normalized, "invalid email");
                return Err(Error::Validation("invalid email".into()));
            }
            Some(normalized)
        }
        None => None,
    };

    let role = match payload.role.as_deref() {
        Some(raw) => {
            if !identity.is_admin() {
                return Err(Error::Forbidden("only admins may change roles".into()));
            }
            let role = Role::parse(raw)
                .ok_or_else(|| Error::Validation("role must be client or admin".into()))?;
            Some(role)
        }
        None => None,
    };

    let password_hash = match payload.password.as_deref() {
        Some(plain) => {
            if plain.len() < 8 {
                return Err(Error::Validation("password too short".into()));
            }
            Some(hash_password(plain)?)
        }
        None => None,
    };

    let user = repo::update(
        &state.db,
        id,
        payload.name.as_deref().map(str::trim),
        email.as_deref(),
        password_hash.as_deref(),
        role,
    )
    .await?
    .ok_or(Error::NotFound("user"))?;

    info!(user_id = %id, actor = %identity.user_id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    repo::delete_with_history(&state.db, id).await?;
    info!(user_id = %id, admin = %identity.user_id, "user deleted");
    Ok(Json(serde_json::json!({ "message": "user deleted" })))
}
