//! Identity provider port (driven/secondary port)
//!
//! Supplies the identity attributes attached to the remote sink at buffer
//! initialization: who (user id), where (platform), and which build
//! (environment). Values are read once; the buffer never re-queries them.

/// Port trait for device/user identity lookup
#[async_trait::async_trait]
pub trait IIdentityProvider: Send + Sync {
    /// Returns the stored user id, or `None` when the device has no
    /// signed-in user. The buffer substitutes a fixed anonymous literal.
    async fn read_user_id(&self) -> anyhow::Result<Option<String>>;

    /// Returns the platform name (operating system).
    async fn read_platform(&self) -> anyhow::Result<String>;

    /// Returns the build environment name (e.g. `debug`, `release`).
    async fn read_environment(&self) -> anyhow::Result<String>;
}
