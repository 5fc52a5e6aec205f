use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::{Role, User};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// Partial profile update. `role` is parsed and admin-gated in the handler.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none() && self.role.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_detects_empty_bodies() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert!(!req.is_empty());
    }

    #[test]
    fn user_response_never_contains_a_hash_field() {
        let res = UserResponse {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Client,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }
}
