//! uplog Host - Device identity adapter
//!
//! Implements the [`IIdentityProvider`] port from host facts: the platform
//! from compile-time OS constants, the environment from the build profile,
//! and the user id from the key-value store. Never reads the hostname or
//! the OS username; the user id is only what the application previously
//! stored.

use std::sync::Arc;

use uplog_core::ports::{IIdentityProvider, IKeyValueStore};

/// Store key under which the application records the signed-in user id.
pub const USER_ID_KEY: &str = "uplog.user_id";

/// Environment variable overriding the reported environment name.
pub const ENVIRONMENT_VAR: &str = "UPLOG_ENVIRONMENT";

/// Identity provider backed by the host and the key-value store.
pub struct HostIdentity {
    store: Arc<dyn IKeyValueStore>,
    user_id_key: String,
}

impl HostIdentity {
    /// Creates a provider reading the user id from [`USER_ID_KEY`].
    pub fn new(store: Arc<dyn IKeyValueStore>) -> Self {
        Self {
            store,
            user_id_key: USER_ID_KEY.to_string(),
        }
    }

    /// Creates a provider reading the user id from a custom key.
    pub fn with_user_id_key(store: Arc<dyn IKeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            user_id_key: key.into(),
        }
    }
}

#[async_trait::async_trait]
impl IIdentityProvider for HostIdentity {
    async fn read_user_id(&self) -> anyhow::Result<Option<String>> {
        let stored = self.store.get_string(&self.user_id_key).await?;
        Ok(stored.filter(|id| !id.trim().is_empty()))
    }

    async fn read_platform(&self) -> anyhow::Result<String> {
        Ok(std::env::consts::OS.to_string())
    }

    async fn read_environment(&self) -> anyhow::Result<String> {
        if let Ok(env) = std::env::var(ENVIRONMENT_VAR) {
            if !env.is_empty() {
                return Ok(env);
            }
        }
        Ok(if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "release".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl IKeyValueStore for MemoryStore {
        async fn get_string(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> anyhow::Result<()> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_user_id_absent_when_not_stored() {
        let identity = HostIdentity::new(Arc::new(MemoryStore::default()));
        assert!(identity.read_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_id_read_from_store() {
        let store = Arc::new(MemoryStore::default());
        store.set_string(USER_ID_KEY, "u-99").await.unwrap();

        let identity = HostIdentity::new(store);
        assert_eq!(identity.read_user_id().await.unwrap().as_deref(), Some("u-99"));
    }

    #[tokio::test]
    async fn test_blank_user_id_treated_as_absent() {
        let store = Arc::new(MemoryStore::default());
        store.set_string(USER_ID_KEY, "   ").await.unwrap();

        let identity = HostIdentity::new(store);
        assert!(identity.read_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_platform_matches_compile_target() {
        let identity = HostIdentity::new(Arc::new(MemoryStore::default()));
        assert_eq!(
            identity.read_platform().await.unwrap(),
            std::env::consts::OS
        );
    }

    #[tokio::test]
    async fn test_environment_defaults_to_build_profile() {
        // Only meaningful when the override variable is unset.
        if std::env::var(ENVIRONMENT_VAR).is_ok() {
            return;
        }
        let identity = HostIdentity::new(Arc::new(MemoryStore::default()));
        let env = identity.read_environment().await.unwrap();
        assert!(env == "debug" || env == "release");
    }
}
