use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{Error, Result},
    reservations::dto::{
        CreateReservationRequest, ReservationResponse, StatusChangeResponse,
        UpdateReservationRequest,
    },
    reservations::repo::{self, ReservationListItem},
    reservations::services,
    reservations::status::ReservationStatus,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list_reservations))
        .route("/reservations/:id", get(get_reservation))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation))
        .route(
            "/reservations/:id",
            put(update_status).delete(delete_reservation),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>)> {
    let reservation = services::create(
        &state.db,
        &identity,
        payload.user_id,
        payload.car_id,
        payload.start_date,
        payload.end_date,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(reservation.into())))
}

#[instrument(skip(state))]
pub async fn list_reservations(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<ReservationListItem>>> {
    let rows = if identity.is_admin() {
        repo::list_all(&state.db).await?
    } else {
        repo::list_for_user(&state.db, identity.user_id).await?
    };
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn get_reservation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>> {
    let reservation = repo::find(&state.db, id)
        .await?
        .ok_or(Error::NotFound("reservation"))?;
    if reservation.user_id != identity.user_id && !identity.is_admin() {
        return Err(Error::Forbidden(
            "cannot view another user's reservation".into(),
        ));
    }
    Ok(Json(reservation.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> Result<Json<StatusChangeResponse>> {
    let new_status = ReservationStatus::parse(&payload.status)
        .ok_or_else(|| Error::Validation("invalid status value".into()))?;

    let reservation = services::set_status(&state.db, &identity, id, new_status).await?;
    Ok(Json(StatusChangeResponse {
        id: reservation.id,
        status: reservation.status,
    }))
}

#[instrument(skip(state))]
pub async fn delete_reservation(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    services::delete(&state.db, &identity, id).await?;
    Ok(Json(serde_json::json!({ "message": "reservation deleted" })))
}
