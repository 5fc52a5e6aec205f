use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AdminUser,
    cars::dto::{validate_car_fields, CreateCarRequest, PatchCarRequest, UpdateCarRequest},
    cars::repo::{self, Car},
    error::{Error, Result},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars))
        .route("/cars/:id", get(get_car))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/cars", post(create_car))
        .route(
            "/cars/:id",
            put(update_car).patch(patch_car).delete(delete_car),
        )
}

#[instrument(skip(state))]
pub async fn list_cars(State(state): State<AppState>) -> Result<Json<Vec<Car>>> {
    let cars = repo::list(&state.db).await?;
    Ok(Json(cars))
}

#[instrument(skip(state))]
pub async fn get_car(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Car>> {
    let car = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(Error::NotFound("car"))?;
    Ok(Json(car))
}

#[instrument(skip(state, payload))]
pub async fn create_car(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Json(payload): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<Car>)> {
    validate_car_fields(
        &payload.brand,
        &payload.model,
        &payload.fuel_type,
        payload.price,
    )?;

    let car = repo::create(
        &state.db,
        payload.brand.trim(),
        payload.model.trim(),
        payload.year,
        payload.fuel_type.trim(),
        payload.price,
        payload.img_url.as_deref(),
    )
    .await?;

    info!(car_id = %car.id, admin = %identity.user_id, "car added");
    Ok((StatusCode::CREATED, Json(car)))
}

#[instrument(skip(state, payload))]
pub async fn update_car(
    State(state): State<AppState>,
    AdminUser(_identity): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCarRequest>,
) -> Result<Json<Car>> {
    validate_car_fields(
        &payload.brand,
        &payload.model,
        &payload.fuel_type,
        payload.price,
    )?;

    let car = repo::update(
        &state.db,
        id,
        payload.brand.trim(),
        payload.model.trim(),
        payload.year,
        payload.fuel_type.trim(),
        payload.price,
        payload.img_url.as_deref(),
    )
    .await?
    .ok_or(Error::NotFound("car"))?;

    Ok(Json(car))
}

#[instrument(skip(state, payload))]
pub async fn patch_car(
    State(state): State<AppState>,
    AdminUser(_identity): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PatchCarRequest>,
) -> Result<Json<Car>> {
    if payload.is_empty() {
        return Err(Error::Validation("no fields to update".into()));
    }
    if let Some(price) = payload.price {
        if price <= 0.0 {
            return Err(Error::Validation("price must be positive".into()));
        }
    }

    let car = repo::patch(
        &state.db,
        id,
        payload.brand.as_deref(),
        payload.model.as_deref(),
        payload.year,
        payload.fuel_type.as_deref(),
        payload.price,
        payload.img_url.as_deref(),
    )
    .await?
    .ok_or(Error::NotFound("car"))?;

    Ok(Json(car))
}

#[instrument(skip(state))]
pub async fn delete_car(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    repo::delete_with_history(&state.db, id).await?;
    info!(car_id = %id, admin = %identity.user_id, "car deleted");
    Ok(Json(serde_json::json!({ "message": "car deleted" })))
}
