//! Authentication middleware and extractors for the back office.
//!
//! Every `/api` route except sign-in and password reset sits behind
//! [`require_admin`]. Handlers that need the identity itself use the
//! [`RequireAdminAuth`] extractor.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in back-office session.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> impl IntoResponse {
///     Json(admin)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Rejection when a back-office session is required.
#[derive(Debug)]
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Please sign in to continue" })),
        )
            .into_response()
    }
}

async fn current_admin(parts: &Parts) -> Option<CurrentAdmin> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_admin(parts).await.map(Self).ok_or(AdminAuthRejection)
    }
}

/// Route layer rejecting requests without a session for this business.
///
/// Sessions signed in for another business id (after a configuration
/// change) are treated as signed out.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let admin = current_admin(&parts).await;
    match admin {
        Some(admin) if admin.business_id == state.business_id() => {
            next.run(Request::from_parts(parts, body)).await
        }
        _ => AdminAuthRejection.into_response(),
    }
}

/// Store the signed-in admin, cycling the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Sign out by discarding the whole session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use luxe_core::settings::DEFAULT_BUSINESS_ID;

    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let admin = CurrentAdmin::now(DEFAULT_BUSINESS_ID);

        set_current_admin(&session, &admin).await.unwrap();
        let stored: Option<CurrentAdmin> =
            session.get(session_keys::CURRENT_ADMIN).await.unwrap();
        assert_eq!(stored, Some(admin));

        clear_current_admin(&session).await.unwrap();
        let stored: Option<CurrentAdmin> =
            session.get(session_keys::CURRENT_ADMIN).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_extractor_rejects_without_session() {
        let (mut parts, ()) = axum::http::Request::builder()
            .uri("/api/auth/me")
            .body(())
            .unwrap()
            .into_parts();
        assert!(
            RequireAdminAuth::from_request_parts(&mut parts, &())
                .await
                .is_err()
        );
        assert_eq!(
            AdminAuthRejection.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
