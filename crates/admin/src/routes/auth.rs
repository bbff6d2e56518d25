//! Back-office sign-in, sign-out and password reset.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Check the shared password and start a session.
///
/// POST /api/auth/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<CurrentAdmin>> {
    AdminAuthService::new(state.pool(), state.business_id())
        .login(&form.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Back-office sign-in rejected"))?;

    let admin = CurrentAdmin::now(state.business_id());
    set_current_admin(&session, &admin).await?;
    tracing::info!(business_id = %admin.business_id, "Back-office sign-in");
    Ok(Json(admin))
}

/// Email a temporary password to the business address.
///
/// The response is the same whether or not a password was already set.
///
/// POST /api/auth/forgot-password
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let mailer = state
        .email()
        .ok_or(AppError::Auth(AdminAuthError::EmailNotConfigured))?;
    let business = state.settings().await?;

    AdminAuthService::new(state.pool(), state.business_id())
        .reset_password(mailer, &business)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "A temporary password has been sent to the business email",
        }),
    ))
}

/// End the session.
///
/// POST /api/auth/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in identity.
///
/// GET /api/auth/me
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
