//! Display preferences kept in the session.

use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use luxe_core::Theme;

use crate::error::Result;
use crate::models::session_keys;

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemePreference {
    pub theme: Theme,
}

/// GET /api/preferences/theme
#[instrument(skip(session))]
pub async fn theme(session: Session) -> Result<Json<ThemePreference>> {
    let theme = session
        .get::<Theme>(session_keys::THEME)
        .await?
        .unwrap_or_default();
    Ok(Json(ThemePreference { theme }))
}

/// PUT /api/preferences/theme
#[instrument(skip(session))]
pub async fn set_theme(
    session: Session,
    Json(body): Json<ThemePreference>,
) -> Result<Json<ThemePreference>> {
    session.insert(session_keys::THEME, body.theme).await?;
    Ok(Json(body))
}

/// Flip between light and dark.
///
/// POST /api/preferences/theme/toggle
#[instrument(skip(session))]
pub async fn toggle_theme(session: Session) -> Result<Json<ThemePreference>> {
    let theme = session
        .get::<Theme>(session_keys::THEME)
        .await?
        .unwrap_or_default()
        .toggled();
    session.insert(session_keys::THEME, theme).await?;
    Ok(Json(ThemePreference { theme }))
}
