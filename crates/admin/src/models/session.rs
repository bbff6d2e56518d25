//! Session-related types for back-office authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use luxe_core::BusinessId;

/// Session-stored back-office identity.
///
/// There is one shared password per business, so the identity is the
/// business itself plus when the session signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Business the session manages.
    pub business_id: BusinessId,
    /// When the password was accepted.
    pub signed_in_at: DateTime<Utc>,
}

impl CurrentAdmin {
    #[must_use]
    pub fn now(business_id: BusinessId) -> Self {
        Self {
            business_id,
            signed_in_at: Utc::now(),
        }
    }
}

/// Session keys for back-office authentication data.
pub mod keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
