//! Customer authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::cart::CartResponse;
use crate::services::auth::{AuthService, SignUp};
use crate::services::cart::CartService;
use crate::state::AppState;

/// Signup request.
#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login request.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signed-in user plus the cart after reconciliation.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: CurrentUser,
    pub cart: CartResponse,
}

/// Create an account and sign in.
///
/// POST /api/auth/signup
#[instrument(skip_all, fields(email = %body.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    if body.password != body.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".to_owned()));
    }

    let profile = AuthService::new(state.pool())
        .sign_up(&SignUp {
            email: &body.email,
            password: &body.password,
            first_name: &body.first_name,
            last_name: &body.last_name,
        })
        .await?;
    let user = CurrentUser::from(&profile);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Customer signed up");

    let cart = CartService::new(state.pool(), &session, state.business_id(), Some(user.id))
        .load()
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user,
            cart: cart.into(),
        }),
    ))
}

/// Sign in. A non-empty server cart replaces the session cart.
///
/// POST /api/auth/login
#[instrument(skip_all, fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let profile = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;
    let user = CurrentUser::from(&profile);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    let cart = CartService::new(state.pool(), &session, state.business_id(), Some(user.id))
        .reconcile_on_login(user.id)
        .await?;
    tracing::info!(user_id = %user.id, "Customer signed in");

    Ok(Json(SessionResponse {
        user,
        cart: cart.into(),
    }))
}

/// Sign out. Cart and wishlist stay in the session.
///
/// POST /api/auth/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in customer, or `null`.
///
/// GET /api/auth/me
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<CurrentUser>> {
    Json(user)
}
