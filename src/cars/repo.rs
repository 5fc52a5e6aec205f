use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{Error, Result};

/// The availability flag. Only the availability guard
/// (`reservations::availability`) ever writes this column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub price: f64,
    pub status: CarStatus,
    pub img_url: Option<String>,
    pub created_at: OffsetDateTime,
}

pub async fn list(db: &PgPool) -> Result<Vec<Car>> {
    let cars = sqlx::query_as::<_, Car>(
        r#"
        SELECT id, brand, model, year, fuel_type, price, status, img_url, created_at
        FROM cars
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(cars)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Car>> {
    let car = sqlx::query_as::<_, Car>(
        r#"
        SELECT id, brand, model, year, fuel_type, price, status, img_url, created_at
        FROM cars
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(car)
}

/// New cars always start out available.
pub async fn create(
    db: &PgPool,
    brand: &str,
    model: &str,
    year: i32,
    fuel_type: &str,
    price: f64,
    img_url: Option<&str>,
) -> Result<Car> {
    let car = sqlx::query_as::<_, Car>(
        r#"
        INSERT INTO cars (brand, model, year, fuel_type, price, status, img_url)
        VALUES ($1, $2, $3, $4, $5, 'available', $6)
        RETURNING id, brand, model, year, fuel_type, price, status, img_url, created_at
        "#,
    )
    .bind(brand)
    .bind(model)
    .bind(year)
    .bind(fuel_type)
    .bind(price)
    .bind(img_url)
    .fetch_one(db)
    .await?;
    Ok(car)
}

/// Full update of the descriptive fields. The status column is not touched.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    brand: &str,
    model: &str,
    year: i32,
    fuel_type: &str,
    price: f64,
    img_url: Option<&str>,
) -> Result<Option<Car>> {
    let car = sqlx::query_as::<_, Car>(
        r#"
        UPDATE cars
        SET brand = $2, model = $3, year = $4, fuel_type = $5, price = $6, img_url = $7
        WHERE id = $1
        RETURNING id, brand, model, year, fuel_type, price, status, img_url, created_at
        "#,
    )
    .bind(id)
    .bind(brand)
    .bind(model)
    .bind(year)
    .bind(fuel_type)
    .bind(price)
    .bind(img_url)
    .fetch_optional(db)
    .await?;
    Ok(car)
}

/// Partial update; `None` leaves a column untouched. The status column is
/// deliberately not part of the allow-list.
pub async fn patch(
    db: &PgPool,
    id: Uuid,
    brand: Option<&str>,
    model: Option<&str>,
    year: Option<i32>,
    fuel_type: Option<&str>,
    price: Option<f64>,
    img_url: Option<&str>,
) -> Result<Option<Car>> {
    let car = sqlx::query_as::<_, Car>(
        r#"
        UPDATE cars
        SET brand = COALESCE($2, brand),
            model = COALESCE($3, model),
            year = COALESCE($4, year),
            fuel_type = COALESCE($5, fuel_type),
            price = COALESCE($6, price),
            img_url = COALESCE($7, img_url)
        WHERE id = $1
        RETURNING id, brand, model, year, fuel_type, price, status, img_url, created_at
        "#,
    )
    .bind(id)
    .bind(brand)
    .bind(model)
    .bind(year)
    .bind(fuel_type)
    .bind(price)
    .bind(img_url)
    .fetch_optional(db)
    .await?;
    Ok(car)
}

/// Removes the car and its terminal reservation history in one transaction.
/// Refused while a pending or approved reservation references the car.
pub async fn delete_with_history(db: &PgPool, id: Uuid) -> Result<()> {
    let mut tx = db.begin().await?;

    let exists =
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS (SELECT 1 FROM cars WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    if !exists {
        return Err(Error::NotFound("car"));
    }

    let active = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM reservations
        WHERE car_id = $1 AND status IN ('pending', 'approved')
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    if active > 0 {
        return Err(Error::Conflict("car has active reservations".into()));
    }

    sqlx::query(r#"DELETE FROM reservations WHERE car_id = $1"#)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(r#"DELETE FROM cars WHERE id = $1"#)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CarStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(
            serde_json::to_string(&CarStatus::Unavailable).unwrap(),
            "\"unavailable\""
        );
    }
}
