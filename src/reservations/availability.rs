//! The availability guard: the only code that writes `cars.status`.
//!
//! Both operations run inside a transaction owned by the caller, so a
//! failure later in the same unit of work rolls the flag back.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Claims the car for a new reservation.
///
/// The claim is a single conditional write decided by the affected-row
/// count, so two concurrent callers racing for the same available car get
/// exactly one success; there is no separate read-then-write window.
pub async fn try_reserve(conn: &mut PgConnection, car_id: Uuid) -> Result<()> {
    let claimed = sqlx::query(
        r#"
        UPDATE cars
        SET status = 'unavailable'
        WHERE id = $1 AND status = 'available'
        "#,
    )
    .bind(car_id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if claimed == 1 {
        debug!(car_id = %car_id, "car claimed");
        return Ok(());
    }

    // Zero rows: the car is missing or already claimed. The probe only runs
    // on the failure path, after the conditional write has already decided.
    let exists = sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS (SELECT 1 FROM cars WHERE id = $1)"#)
        .bind(car_id)
        .fetch_one(&mut *conn)
        .await?;

    if exists {
        Err(Error::CarUnavailable)
    } else {
        Err(Error::NotFound("car"))
    }
}

/// Hands the car back to the pool. Idempotent: releasing a car that is
/// already available changes nothing.
pub async fn release(conn: &mut PgConnection, car_id: Uuid) -> Result<()> {
    let released = sqlx::query(
        r#"
        UPDATE cars
        SET status = 'available'
        WHERE id = $1 AND status = 'unavailable'
        "#,
    )
    .bind(car_id)
    .execute(conn)
    .await?
    .rows_affected();

    if released == 1 {
        debug!(car_id = %car_id, "car released");
    }
    Ok(())
}
