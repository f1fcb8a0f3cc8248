use async_trait::async_trait;

/// Storage abstraction over the approved-phone allowlist.
///
/// The master rule reads through this trait on every verification; the
/// approval service writes through it after an approval. Reads may suspend,
/// so a cancelled request drops the future and aborts the lookup promptly.
/// Read failures are recovered inside the engine (no bypass), never retried.
#[async_trait]
pub trait ApprovedPhoneStore: Send + Sync {
    async fn contains(&self, phone_number: &str) -> Result<bool, AllowlistError>;
    async fn record_approval(&self, phone_number: &str) -> Result<(), AllowlistError>;
}

/// Error enumeration for allowlist store failures.
#[derive(Debug, thiserror::Error)]
pub enum AllowlistError {
    #[error("allowlist unavailable: {0}")]
    Unavailable(String),
    #[error("allowlist data malformed: {0}")]
    Malformed(String),
}
