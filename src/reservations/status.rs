use serde::{Deserialize, Serialize};

use crate::users::repo::Role;

/// Reservation lifecycle states. `Pending` is the only entry point;
/// `Rejected`, `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<ReservationStatus> {
        match s {
            "pending" => Some(ReservationStatus::Pending),
            "approved" => Some(ReservationStatus::Approved),
            "rejected" => Some(ReservationStatus::Rejected),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Rejected | ReservationStatus::Cancelled | ReservationStatus::Completed
        )
    }

    /// The transition table. Pending can be decided or withdrawn; an
    /// approved reservation can finish or be withdrawn. Nothing leaves a
    /// terminal state, and nothing returns to pending.
    pub fn can_transition(self, to: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, to),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Approved, Completed)
                | (Approved, Cancelled)
        )
    }

    /// Whether entering this state hands the car back to the pool.
    pub fn releases_car(&self) -> bool {
        self.is_terminal()
    }

    /// Who may request a transition *into* `to`: decisions are admin-only,
    /// cancellation is open to the owning user as well.
    pub fn permitted(to: ReservationStatus, role: Role, is_owner: bool) -> bool {
        match to {
            ReservationStatus::Approved
            | ReservationStatus::Rejected
            | ReservationStatus::Completed => role == Role::Admin,
            ReservationStatus::Cancelled => role == Role::Admin || is_owner,
            ReservationStatus::Pending => false,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    const ALL: [ReservationStatus; 5] = [Pending, Approved, Rejected, Cancelled, Completed];

    #[test]
    fn only_the_five_tabled_transitions_are_valid() {
        let valid = [
            (Pending, Approved),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Approved, Completed),
            (Approved, Cancelled),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition(to),
                    valid.contains(&(from, to)),
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_admit_no_transition() {
        for from in [Rejected, Cancelled, Completed] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(!from.can_transition(to), "{from} -> {to} must be invalid");
            }
        }
    }

    #[test]
    fn nothing_returns_to_pending() {
        for from in ALL {
            assert!(!from.can_transition(Pending));
        }
    }

    #[test]
    fn exactly_the_terminal_states_release_the_car() {
        assert!(!Pending.releases_car());
        assert!(!Approved.releases_car());
        assert!(Rejected.releases_car());
        assert!(Cancelled.releases_car());
        assert!(Completed.releases_car());
    }

    #[test]
    fn decisions_are_admin_only() {
        for to in [Approved, Rejected, Completed] {
            assert!(ReservationStatus::permitted(to, Role::Admin, false));
            assert!(!ReservationStatus::permitted(to, Role::Client, true));
            assert!(!ReservationStatus::permitted(to, Role::Client, false));
        }
    }

    #[test]
    fn cancellation_is_open_to_the_owner() {
        assert!(ReservationStatus::permitted(Cancelled, Role::Client, true));
        assert!(ReservationStatus::permitted(Cancelled, Role::Admin, false));
        assert!(!ReservationStatus::permitted(Cancelled, Role::Client, false));
    }

    #[test]
    fn status_strings_round_trip() {
        for status in ALL {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("confirmed"), None);
        assert_eq!(ReservationStatus::parse("PENDING"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&Cancelled).unwrap(), "\"cancelled\"");
    }
}
