//! Session-related types.
//!
//! The session stands in for the visitor's local storage: besides the
//! signed-in user it holds the cart, the wishlist and the theme choice.

use serde::{Deserialize, Serialize};

use luxe_core::{Email, ProfileId};

use super::Profile;

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Profile's database ID.
    pub id: ProfileId,
    /// Profile's email address.
    pub email: Email,
    /// Full name as stored on the profile.
    pub full_name: String,
}

impl From<&Profile> for CurrentUser {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            full_name: profile.full_name.clone(),
        }
    }
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor's cart.
    pub const CART: &str = "cart";

    /// Key for the visitor's wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the colour theme preference.
    pub const THEME: &str = "theme";
}
