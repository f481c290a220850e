//! Identity collaborator.

use mockall::automock;
use serde::{Deserialize, Serialize};

/// Member id used when nobody is signed in.
pub const GUEST_MEMBER_ID: &str = "guest";

/// The member the core is acting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,
    pub display_name: String,
}

impl Member {
    #[must_use]
    pub fn new(member_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            display_name: display_name.into(),
        }
    }

    /// The anonymous member used when no identity is present.
    ///
    /// Guests get local-only persistence; remote ledger and order writes are
    /// keyed by this fixed id.
    #[must_use]
    pub fn guest() -> Self {
        Self::new(GUEST_MEMBER_ID, "Guest")
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.member_id == GUEST_MEMBER_ID
    }
}

/// Supplies the current member, or a guest when nobody is signed in.
#[automock]
pub trait IdentityProvider: Send + Sync {
    fn current_member(&self) -> Member;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_member_uses_fixed_id() {
        let member = Member::guest();

        assert_eq!(member.member_id, GUEST_MEMBER_ID);
        assert!(member.is_guest());
    }

    #[test]
    fn named_member_is_not_a_guest() {
        let member = Member::new("mbr-001", "Ada");

        assert!(!member.is_guest());
    }
}
