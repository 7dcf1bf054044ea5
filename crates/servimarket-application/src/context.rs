//! Application wiring.
//!
//! Assembles the session store and catalog from configuration, the way the
//! app does once at startup.

use crate::profile::ProfileSummary;
use crate::session::SessionStore;
use servimarket_core::catalog::Catalog;
use servimarket_core::config::AppConfig;
use servimarket_infrastructure::{FileKeyValueStore, MockCatalog, StaticUserDirectory};
use std::path::PathBuf;
use std::sync::Arc;

/// Handles shared by every view for the lifetime of the app.
#[derive(Clone)]
pub struct AppContext {
    pub store: SessionStore,
    pub catalog: Arc<dyn Catalog>,
}

impl AppContext {
    /// Builds the file-backed store at `storage_file` and bootstraps it.
    pub async fn start(config: &AppConfig, storage_file: PathBuf) -> Self {
        tracing::info!(
            "[Bootstrap] Using storage file: {}",
            storage_file.display()
        );

        let storage = Arc::new(FileKeyValueStore::new(storage_file));
        let directory =
            Arc::new(StaticUserDirectory::with_fixtures().with_accepted_secret(&config.accepted_secret));

        let store = SessionStore::builder(storage, directory)
            .login_delay(config.login_delay())
            .start()
            .await;

        Self {
            store,
            catalog: Arc::new(MockCatalog::with_fixtures()),
        }
    }

    /// Profile overview for the signed-in user, if any.
    pub fn profile(&self) -> Option<ProfileSummary> {
        let session = self.store.current_session()?;
        Some(ProfileSummary::build(session, self.catalog.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servimarket_core::session::Role;
    use tempfile::TempDir;

    fn fast_config() -> AppConfig {
        AppConfig {
            login_delay_ms: 0,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_start_and_restore() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("storage.json");

        let context = AppContext::start(&fast_config(), file.clone()).await;
        assert!(context.profile().is_none());
        assert!(context.store.login("juan@example.com", "123456", Role::Client).await);

        let restarted = AppContext::start(&fast_config(), file).await;
        let profile = restarted.profile().unwrap();
        assert_eq!(profile.session.id, "1");
        assert_eq!(profile.hired_services.len(), 2);
    }

    #[tokio::test]
    async fn test_configured_secret_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            accepted_secret: "letmein".to_string(),
            ..fast_config()
        };
        let context = AppContext::start(&config, temp_dir.path().join("storage.json")).await;

        assert!(!context.store.login("juan@example.com", "123456", Role::Client).await);
        assert!(context.store.login("juan@example.com", "letmein", Role::Client).await);
    }
}
