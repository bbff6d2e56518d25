//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;

use luxe_core::BusinessId;
use luxe_core::settings::BusinessSettings;

use crate::config::AdminConfig;
use crate::db::{self, RepositoryError};
use crate::services::email::EmailService;
use crate::services::media::MediaStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    email: Option<EmailService>,
    media: MediaStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Mail is disabled when SMTP is not configured or the relay cannot be
    /// set up; both cases are logged.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let email = match config.email.as_ref() {
            Some(email_config) => match EmailService::new(email_config) {
                Ok(service) => Some(service),
                Err(e) => {
                    warn!(error = %e, "SMTP relay setup failed, password reset disabled");
                    None
                }
            },
            None => {
                warn!("SMTP_HOST not set, password reset disabled");
                None
            }
        };
        let media = MediaStore::new(config.media_root.clone(), &config.media_base_url);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                media,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The mailer, when SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    #[must_use]
    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }

    /// The managed business.
    #[must_use]
    pub fn business_id(&self) -> BusinessId {
        self.inner.config.business_id
    }

    /// Current business settings with defaults applied. Always read fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn settings(&self) -> Result<BusinessSettings, RepositoryError> {
        let row = db::settings::get_settings(self.pool(), self.business_id()).await?;
        Ok(row.map(BusinessSettings::from).unwrap_or_default())
    }
}
