use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::Result;
use crate::reservations::status::ReservationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ReservationStatus,
    pub created_at: OffsetDateTime,
}

/// Listing row joined with the owning user's name and the car's label,
/// the shape the admin dashboard consumes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReservationListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub car_id: Uuid,
    pub brand: String,
    pub model: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ReservationStatus,
    pub created_at: OffsetDateTime,
}

pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    car_id: Uuid,
    start_date: Date,
    end_date: Date,
) -> Result<Reservation> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (user_id, car_id, start_date, end_date, status)
        VALUES ($1, $2, $3, $4, 'pending')
        RETURNING id, user_id, car_id, start_date, end_date, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(car_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(conn)
    .await?;
    Ok(reservation)
}

pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, user_id, car_id, start_date, end_date, status, created_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(reservation)
}

/// Row-locked lookup. Serializes concurrent transitions on one reservation
/// for the rest of the caller's transaction.
pub async fn find_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<Reservation>> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, user_id, car_id, start_date, end_date, status, created_at
        FROM reservations
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(reservation)
}

pub async fn set_status(
    conn: &mut PgConnection,
    id: Uuid,
    status: ReservationStatus,
) -> Result<()> {
    sqlx::query(r#"UPDATE reservations SET status = $2 WHERE id = $1"#)
        .bind(id)
        .bind(status)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<()> {
    sqlx::query(r#"DELETE FROM reservations WHERE id = $1"#)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list_all(db: &PgPool) -> Result<Vec<ReservationListItem>> {
    let rows = sqlx::query_as::<_, ReservationListItem>(
        r#"
        SELECT r.id, r.user_id, u.name AS user_name, r.car_id, c.brand, c.model,
               r.start_date, r.end_date, r.status, r.created_at
        FROM reservations r
        JOIN users u ON r.user_id = u.id
        JOIN cars c ON r.car_id = c.id
        ORDER BY r.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<ReservationListItem>> {
    let rows = sqlx::query_as::<_, ReservationListItem>(
        r#"
        SELECT r.id, r.user_id, u.name AS user_name, r.car_id, c.brand, c.model,
               r.start_date, r.end_date, r.status, r.created_at
        FROM reservations r
        JOIN users u ON r.user_id = u.id
        JOIN cars c ON r.car_id = c.id
        WHERE r.user_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
