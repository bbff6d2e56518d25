//! Customer profile domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use luxe_core::{Email, ProfileId};

/// A customer account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: ProfileId,
    pub email: Email,
    /// `"first last"` as entered at signup.
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// Join first and last name the way signup stores them.
#[must_use]
pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Ana", "Mora"), "Ana Mora");
        assert_eq!(full_name(" Ana ", ""), "Ana");
        assert_eq!(full_name("", "Mora"), "Mora");
    }
}
