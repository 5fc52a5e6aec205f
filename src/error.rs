use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Application error taxonomy. Every failure that crosses the API boundary
/// is one of these variants; the HTTP mapping lives in `IntoResponse`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("car is not available for reservation")]
    CarUnavailable,

    #[error("{0}")]
    InvalidRange(String),

    #[error("cannot change reservation status from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable code, part of the response contract.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::CarUnavailable => "CAR_UNAVAILABLE",
            Error::InvalidRange(_) => "INVALID_RANGE",
            Error::InvalidTransition { .. } => "INVALID_TRANSITION",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Conflict(_) => "CONFLICT",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Internal(_) | Error::Sqlx(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::CarUnavailable | Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InvalidRange(_) | Error::InvalidTransition { .. } | Error::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Internal(_) | Error::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::Sqlx(e) => {
                tracing::error!(error = %e, "storage failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = serde_json::json!({ "error": message, "code": self.code() });
        (status, Json(body)).into_response()
    }
}

/// Postgres unique-constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_contract() {
        assert_eq!(Error::NotFound("car").status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::CarUnavailable.status(), StatusCode::CONFLICT);
        assert_eq!(
            Error::InvalidRange("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidTransition {
                from: "completed",
                to: "approved"
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Unauthorized("no".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            Error::Validation("missing".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Sqlx(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_carries_stable_code() {
        let res = Error::CarUnavailable.into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(Error::CarUnavailable.code(), "CAR_UNAVAILABLE");
        assert_eq!(Error::NotFound("reservation").code(), "NOT_FOUND");
    }

    #[test]
    fn messages_name_the_missing_entity() {
        assert_eq!(Error::NotFound("car").to_string(), "car not found");
        assert_eq!(
            Error::InvalidTransition {
                from: "pending",
                to: "completed"
            }
            .to_string(),
            "cannot change reservation status from pending to completed"
        );
    }
}
