use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::reservations::repo::Reservation;
use crate::reservations::status::ReservationStatus;

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
}

/// The status value arrives as a string and is parsed explicitly, so an
/// unknown value maps to a validation error rather than a decode rejection.
#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ReservationStatus,
    pub created_at: OffsetDateTime,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            car_id: r.car_id,
            start_date: r.start_date,
            end_date: r.end_date,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub id: Uuid,
    pub status: ReservationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn create_request_parses_iso_dates() {
        let req: CreateReservationRequest = serde_json::from_str(
            r#"{
                "user_id": "6f2f3a1a-0c8b-4f21-9c0e-0d6d2f5d9a11",
                "car_id": "9e107d9d-3721-4b68-a5a3-66d9a804d5b0",
                "start_date": "2025-06-01",
                "end_date": "2025-06-05"
            }"#,
        )
        .unwrap();
        assert_eq!(req.start_date, date!(2025 - 06 - 01));
        assert_eq!(req.end_date, date!(2025 - 06 - 05));
    }

    #[test]
    fn response_reports_status_lowercase() {
        let res = StatusChangeResponse {
            id: Uuid::new_v4(),
            status: ReservationStatus::Pending,
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("\"pending\""));
    }
}
