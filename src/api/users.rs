use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::db::models::User;
use crate::db::repo;

/// Request body shared by create, replace and update; each endpoint decides
/// which fields it requires.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub idade: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub idade: Option<String>,
}

/// An `idade` query value: `"<n>"` for an exact match or `"<low>-<high>"`
/// for an inclusive range.
#[derive(Debug, PartialEq)]
enum AgeFilter {
    Exact(i64),
    Range(i64, i64),
}

fn parse_age_filter(raw: &str) -> Result<AgeFilter, ApiError> {
    let invalid = || ApiError::Validation(format!("invalid idade filter: {raw}"));

    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [age] => Ok(AgeFilter::Exact(age.parse().map_err(|_| invalid())?)),
        [low, high] => Ok(AgeFilter::Range(
            low.parse().map_err(|_| invalid())?,
            high.parse().map_err(|_| invalid())?,
        )),
        _ => Err(invalid()),
    }
}

/// POST /users/
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    let name = payload.name.as_deref().filter(|s| !s.is_empty());
    let email = payload.email.as_deref().filter(|s| !s.is_empty());

    let (Some(name), Some(email)) = (name, email) else {
        return Err(ApiError::Validation("name and email are required".to_string()));
    };

    if repo::get_user_by_email(&state.db, email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    // A racing insert with the same email slips past the check above and
    // fails on the UNIQUE constraint instead.
    let user = repo::insert_user(&state.db, name, email, payload.idade.unwrap_or(0)).await?;

    Ok(Json(user))
}

/// GET /users/ with an optional `idade` filter.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = match params.idade.as_deref() {
        None => repo::list_users(&state.db).await?,
        Some(raw) => match parse_age_filter(raw)? {
            AgeFilter::Exact(age) => repo::list_users_by_age(&state.db, age).await?,
            AgeFilter::Range(low, high) => {
                repo::list_users_by_age_range(&state.db, low, high).await?
            }
        },
    };

    Ok(Json(users))
}

/// GET /users/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = repo::get_user(&state.db, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// PUT /users/{id} — full replacement, all three fields required.
pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    let name = payload.name.as_deref().filter(|s| !s.is_empty());
    let email = payload.email.as_deref().filter(|s| !s.is_empty());

    let (Some(name), Some(email), Some(idade)) = (name, email, payload.idade) else {
        return Err(ApiError::Validation(
            "name, email and idade are required".to_string(),
        ));
    };

    // Keeping the same email is not a conflict
    if let Some(existing) = repo::get_user_by_email(&state.db, email).await? {
        if existing.id != id {
            return Err(ApiError::DuplicateEmail);
        }
    }

    let user = repo::update_user(&state.db, id, name, email, idade)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}

/// PATCH /users/{id} — applies only the supplied fields; an empty string or
/// a zero means "leave unchanged".
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    // Unlike replace, this check does not exclude the target row: patching
    // a user to its own current email reports a conflict.
    if let Some(email) = payload.email.as_deref() {
        if repo::get_user_by_email(&state.db, email).await?.is_some() {
            return Err(ApiError::DuplicateEmail);
        }
    }

    let current = repo::get_user(&state.db, id).await?.ok_or(ApiError::NotFound)?;

    let name = payload.name.filter(|s| !s.is_empty()).unwrap_or(current.name);
    let email = payload.email.filter(|s| !s.is_empty()).unwrap_or(current.email);
    let idade = payload.idade.filter(|n| *n != 0).unwrap_or(current.idade);

    let user = repo::update_user(&state.db, id, &name, &email, idade)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}

/// DELETE /users/{id} — returns the deleted row, or `null` when the id was
/// absent (a missing id is not an error).
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Option<User>>, ApiError> {
    let deleted = repo::delete_user(&state.db, id).await?;
    Ok(Json(deleted))
}
