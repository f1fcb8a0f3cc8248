use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use card_rules::approval::{AllowlistError, ApprovedPhoneStore};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Volatile allowlist used by the offline decide command and tests.
#[derive(Default)]
pub(crate) struct InMemoryApprovedPhoneStore {
    phones: Mutex<HashMap<String, bool>>,
}

#[async_trait]
impl ApprovedPhoneStore for InMemoryApprovedPhoneStore {
    async fn contains(&self, phone_number: &str) -> Result<bool, AllowlistError> {
        let guard = self.phones.lock().expect("allowlist mutex poisoned");
        Ok(guard.contains_key(phone_number))
    }

    async fn record_approval(&self, phone_number: &str) -> Result<(), AllowlistError> {
        self.phones
            .lock()
            .expect("allowlist mutex poisoned")
            .insert(phone_number.to_string(), true);
        Ok(())
    }
}

/// Allowlist persisted as a phone-number-to-flag JSON object on disk, the
/// same shape the legacy deployment used.
pub(crate) struct JsonFileApprovedPhoneStore {
    path: PathBuf,
    // Serializes read-modify-write cycles; reads stay lock-free.
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileApprovedPhoneStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_phones(&self) -> Result<HashMap<String, bool>, AllowlistError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(err) => return Err(AllowlistError::Unavailable(err.to_string())),
        };
        serde_json::from_slice(&raw).map_err(|err| AllowlistError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl ApprovedPhoneStore for JsonFileApprovedPhoneStore {
    async fn contains(&self, phone_number: &str) -> Result<bool, AllowlistError> {
        let phones = self.read_phones().await?;
        Ok(phones.contains_key(phone_number))
    }

    async fn record_approval(&self, phone_number: &str) -> Result<(), AllowlistError> {
        let _guard = self.write_lock.lock().await;
        let mut phones = self.read_phones().await?;
        phones.insert(phone_number.to_string(), true);

        let raw = serde_json::to_vec_pretty(&phones)
            .map_err(|err| AllowlistError::Malformed(err.to_string()))?;
        // Write-then-rename so a concurrent read never sees a partial file.
        let scratch = self.path.with_extension("tmp");
        tokio::fs::write(&scratch, raw)
            .await
            .map_err(|err| AllowlistError::Unavailable(err.to_string()))?;
        tokio::fs::rename(&scratch, &self.path)
            .await
            .map_err(|err| AllowlistError::Unavailable(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("card-rules-{name}-{}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn in_memory_store_round_trips() {
        let store = InMemoryApprovedPhoneStore::default();
        assert!(!store.contains("268-741-8863").await.expect("read works"));

        store
            .record_approval("268-741-8863")
            .await
            .expect("write works");
        assert!(store.contains("268-741-8863").await.expect("read works"));
    }

    #[tokio::test]
    async fn json_file_store_treats_missing_file_as_empty() {
        let store = JsonFileApprovedPhoneStore::new(scratch_path("missing"));
        assert!(!store.contains("268-741-8863").await.expect("read works"));
    }

    #[tokio::test]
    async fn json_file_store_persists_approvals() {
        let path = scratch_path("persist");
        let store = JsonFileApprovedPhoneStore::new(path.clone());

        store
            .record_approval("268-741-8863")
            .await
            .expect("write works");
        assert!(store.contains("268-741-8863").await.expect("read works"));

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn json_file_store_swaps_files_without_leaving_scratch() {
        let path = scratch_path("swap");
        let store = JsonFileApprovedPhoneStore::new(path.clone());

        store
            .record_approval("268-741-8863")
            .await
            .expect("write works");
        store
            .record_approval("518-555-0143")
            .await
            .expect("write works");

        assert!(store.contains("268-741-8863").await.expect("read works"));
        assert!(store.contains("518-555-0143").await.expect("read works"));
        assert!(!tokio::fs::try_exists(path.with_extension("tmp"))
            .await
            .expect("scratch check works"));

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn json_file_store_reports_malformed_data() {
        let path = scratch_path("malformed");
        tokio::fs::write(&path, b"not json")
            .await
            .expect("fixture written");

        let store = JsonFileApprovedPhoneStore::new(path.clone());
        let result = store.contains("268-741-8863").await;
        assert!(matches!(result, Err(AllowlistError::Malformed(_))));

        let _ = tokio::fs::remove_file(path).await;
    }
}
