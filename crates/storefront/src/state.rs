//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, warn};

use luxe_core::BusinessId;
use luxe_core::settings::BusinessSettings;

use crate::config::StorefrontConfig;
use crate::db;
use crate::services::email::EmailService;

/// How long business settings are served from memory.
const SETTINGS_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    email: Option<EmailService>,
    settings: Cache<BusinessId, BusinessSettings>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Mail is disabled when SMTP is not configured or the relay cannot be
    /// set up; both cases are logged.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let email = match config.email.as_ref() {
            Some(email_config) => match EmailService::new(email_config) {
                Ok(service) => Some(service),
                Err(e) => {
                    warn!(error = %e, "SMTP relay setup failed, email disabled");
                    None
                }
            },
            None => {
                warn!("SMTP_HOST not set, email disabled");
                None
            }
        };

        let settings = Cache::builder()
            .max_capacity(16)
            .time_to_live(SETTINGS_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                email,
                settings,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
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

    /// The configured business.
    #[must_use]
    pub fn business_id(&self) -> BusinessId {
        self.inner.config.business_id
    }

    /// Business settings with defaults applied.
    ///
    /// Served from a short-lived cache. A database failure yields the
    /// defaults, which are not cached.
    pub async fn settings(&self) -> BusinessSettings {
        let business_id = self.business_id();
        if let Some(settings) = self.inner.settings.get(&business_id).await {
            debug!("Cache hit for settings");
            return settings;
        }

        match db::settings::get_settings(self.pool(), business_id).await {
            Ok(row) => {
                let settings = row.map(BusinessSettings::from).unwrap_or_default();
                self.inner
                    .settings
                    .insert(business_id, settings.clone())
                    .await;
                settings
            }
            Err(e) => {
                warn!(error = %e, "Failed to load settings, using defaults");
                BusinessSettings::default()
            }
        }
    }
}
