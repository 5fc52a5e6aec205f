//! Reservation lifecycle orchestration. Each operation owns exactly one
//! transaction; an error at any step rolls the whole unit back, so the
//! availability flag and the reservation rows can never drift apart.

use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::jwt::Identity,
    error::{Error, Result},
    reservations::availability,
    reservations::repo::{self, Reservation},
    reservations::status::ReservationStatus,
};

pub fn validate_range(start: Date, end: Date, today: Date) -> Result<()> {
    if end <= start {
        return Err(Error::InvalidRange(
            "end_date must be after start_date".into(),
        ));
    }
    if start < today {
        return Err(Error::InvalidRange(
            "start_date must not be in the past".into(),
        ));
    }
    Ok(())
}

/// Creates a pending reservation for `user_id`. The caller may only book
/// for themself; validation runs before anything touches the store.
pub async fn create(
    db: &PgPool,
    identity: &Identity,
    user_id: Uuid,
    car_id: Uuid,
    start_date: Date,
    end_date: Date,
) -> Result<Reservation> {
    if identity.user_id != user_id {
        return Err(Error::Forbidden(
            "reservations can only be created for yourself".into(),
        ));
    }
    validate_range(start_date, end_date, OffsetDateTime::now_utc().date())?;

    let mut tx = db.begin().await?;
    availability::try_reserve(&mut tx, car_id).await?;
    let reservation = repo::insert(&mut tx, user_id, car_id, start_date, end_date).await?;
    tx.commit().await?;

    info!(
        reservation_id = %reservation.id,
        user_id = %user_id,
        car_id = %car_id,
        "reservation created"
    );
    Ok(reservation)
}

/// Applies a status transition. The row is locked before the transition is
/// computed; the status write and the car-side release commit together.
pub async fn set_status(
    db: &PgPool,
    identity: &Identity,
    reservation_id: Uuid,
    new_status: ReservationStatus,
) -> Result<Reservation> {
    let mut tx = db.begin().await?;

    let reservation = repo::find_for_update(&mut tx, reservation_id)
        .await?
        .ok_or(Error::NotFound("reservation"))?;

    if !reservation.status.can_transition(new_status) {
        return Err(Error::InvalidTransition {
            from: reservation.status.as_str(),
            to: new_status.as_str(),
        });
    }

    let is_owner = reservation.user_id == identity.user_id;
    if !ReservationStatus::permitted(new_status, identity.role, is_owner) {
        return Err(Error::Forbidden(format!(
            "role {} may not set a reservation to {}",
            identity.role, new_status
        )));
    }

    repo::set_status(&mut tx, reservation_id, new_status).await?;
    if new_status.releases_car() {
        availability::release(&mut tx, reservation.car_id).await?;
    }
    tx.commit().await?;

    info!(
        reservation_id = %reservation_id,
        from = %reservation.status,
        to = %new_status,
        actor = %identity.user_id,
        "reservation status changed"
    );
    Ok(Reservation {
        status: new_status,
        ..reservation
    })
}

/// Removes a reservation. Admin-only; a non-terminal reservation hands its
/// car back in the same transaction.
pub async fn delete(db: &PgPool, identity: &Identity, reservation_id: Uuid) -> Result<()> {
    if !identity.is_admin() {
        return Err(Error::Forbidden("admin role required".into()));
    }

    let mut tx = db.begin().await?;

    let reservation = repo::find_for_update(&mut tx, reservation_id)
        .await?
        .ok_or(Error::NotFound("reservation"))?;

    if !reservation.status.is_terminal() {
        availability::release(&mut tx, reservation.car_id).await?;
    }
    repo::delete(&mut tx, reservation_id).await?;
    tx.commit().await?;

    info!(
        reservation_id = %reservation_id,
        admin = %identity.user_id,
        "reservation deleted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn range_must_end_after_it_starts() {
        let today = date!(2025 - 06 - 01);
        assert!(validate_range(date!(2025 - 06 - 01), date!(2025 - 06 - 05), today).is_ok());
        assert!(matches!(
            validate_range(date!(2025 - 06 - 05), date!(2025 - 06 - 05), today),
            Err(Error::InvalidRange(_))
        ));
        assert!(matches!(
            validate_range(date!(2025 - 06 - 05), date!(2025 - 06 - 01), today),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn range_must_not_start_in_the_past() {
        let today = date!(2025 - 06 - 10);
        assert!(matches!(
            validate_range(date!(2025 - 06 - 09), date!(2025 - 06 - 12), today),
            Err(Error::InvalidRange(_))
        ));
        // starting today is fine
        assert!(validate_range(date!(2025 - 06 - 10), date!(2025 - 06 - 12), today).is_ok());
    }
}
