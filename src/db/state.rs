// Parking state persistence (load with fallback, strict save)
use std::path::{Path, PathBuf};

use crate::db::{
    local, Backend, BackendMode, FailurePolicy, ParkingDocument, RemoteBackend, Source,
    StoreResult,
};

const RESOURCE: &str = "parking_state";

#[derive(Clone)]
pub struct StateStore {
    backend: Backend,
    state_file: PathBuf,
}

impl StateStore {
    pub const READ_POLICY: FailurePolicy = FailurePolicy::Degrade;
    pub const WRITE_POLICY: FailurePolicy = FailurePolicy::Surface;

    pub fn new(backend: Backend, state_file: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            state_file: state_file.into(),
        }
    }

    pub fn mode(&self) -> BackendMode {
        self.backend.mode()
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Returns the current document. Never fails.
    ///
    /// Sources are tried in the backend's read order. A missing remote row is
    /// seeded with [`ParkingDocument::initial`]. When every source misses or
    /// fails, the initial document is returned without being persisted.
    pub async fn load(&self) -> ParkingDocument {
        for &source in self.backend.read_chain() {
            match self.read_from(source).await {
                Ok(Some(document)) => return document,
                Ok(None) => {}
                Err(e) => Self::READ_POLICY.report(RESOURCE, source, &e),
            }
        }

        tracing::debug!("No stored parking state, serving defaults");
        ParkingDocument::initial()
    }

    /// Replaces the stored document wholesale. Any `tokens` key is dropped
    /// first. Last write wins; concurrent saves are not serialized.
    pub async fn save(&self, document: ParkingDocument) -> StoreResult<()> {
        let document = document.without_tokens();

        let result = match &self.backend {
            Backend::Remote(remote) => remote.update_state(&document).await,
            Backend::LocalFile => local::write_json(&self.state_file, &document).await,
        };

        result.map_err(|e| {
            Self::WRITE_POLICY.report(RESOURCE, self.backend.write_target(), &e);
            e
        })
    }

    async fn read_from(&self, source: Source) -> StoreResult<Option<ParkingDocument>> {
        match source {
            Source::Remote => match self.backend.remote() {
                Some(remote) => read_remote(remote).await.map(Some),
                None => Ok(None),
            },
            Source::LocalFile => local::read_json(&self.state_file).await,
        }
    }
}

async fn read_remote(remote: &dyn RemoteBackend) -> StoreResult<ParkingDocument> {
    if let Some(document) = remote.fetch_state().await? {
        return Ok(document);
    }

    let document = ParkingDocument::initial();
    remote.insert_state(&document).await?;
    tracing::info!("Seeded parking state row with defaults");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::remote::MockRemoteBackend;
    use crate::db::StoreError;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn document(value: Value) -> ParkingDocument {
        ParkingDocument::from_value(value).unwrap()
    }

    fn unavailable() -> StoreError {
        StoreError::RemoteStatus {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }

    fn remote_store(mock: MockRemoteBackend, dir: &TempDir) -> StateStore {
        StateStore::new(Backend::Remote(Arc::new(mock)), dir.path().join("db.json"))
    }

    fn local_store(dir: &TempDir) -> StateStore {
        StateStore::new(Backend::LocalFile, dir.path().join("db.json"))
    }

    #[tokio::test]
    async fn remote_row_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let stored = document(json!({"reservations": {"9": {"odd": true}}, "custom": 1}));
        let expected = stored.clone();

        let mut mock = MockRemoteBackend::new();
        mock.expect_fetch_state()
            .times(1)
            .returning(move || Ok(Some(stored.clone())));
        mock.expect_insert_state().never();

        assert_eq!(remote_store(mock, &dir).load().await, expected);
    }

    #[tokio::test]
    async fn missing_remote_row_is_seeded_with_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let mut mock = MockRemoteBackend::new();
        mock.expect_fetch_state().times(1).returning(|| Ok(None));
        mock.expect_insert_state()
            .withf(|doc| *doc == ParkingDocument::initial())
            .times(1)
            .returning(|_| Ok(()));

        assert_eq!(
            remote_store(mock, &dir).load().await,
            ParkingDocument::initial()
        );
    }

    #[tokio::test]
    async fn remote_read_failure_falls_back_to_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = json!({"reservations": {"1": {"name": "Martin"}}, "logs": ["x"]});
        std::fs::write(dir.path().join("db.json"), on_disk.to_string()).unwrap();

        let mut mock = MockRemoteBackend::new();
        mock.expect_fetch_state()
            .times(1)
            .returning(|| Err(unavailable()));

        assert_eq!(
            Value::from(remote_store(mock, &dir).load().await),
            on_disk
        );
    }

    #[tokio::test]
    async fn remote_read_failure_without_file_serves_unpersisted_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let mut mock = MockRemoteBackend::new();
        mock.expect_fetch_state()
            .times(1)
            .returning(|| Err(StoreError::MalformedRow("data is null".to_string())));
        mock.expect_insert_state().never();
        mock.expect_update_state().never();

        assert_eq!(
            remote_store(mock, &dir).load().await,
            ParkingDocument::initial()
        );
        assert!(!dir.path().join("db.json").exists());
    }

    #[tokio::test]
    async fn failed_seed_insert_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("db.json"), r#"{"logs":["from disk"]}"#).unwrap();

        let mut mock = MockRemoteBackend::new();
        mock.expect_fetch_state().times(1).returning(|| Ok(None));
        mock.expect_insert_state()
            .times(1)
            .returning(|_| Err(unavailable()));

        assert_eq!(
            Value::from(remote_store(mock, &dir).load().await),
            json!({"logs": ["from disk"]})
        );
    }

    #[tokio::test]
    async fn remote_save_strips_tokens() {
        let dir = tempfile::tempdir().unwrap();

        let mut mock = MockRemoteBackend::new();
        mock.expect_update_state()
            .withf(|doc| {
                !doc.contains_key("tokens") && doc.get("reservations") == Some(&json!({"1": {}}))
            })
            .times(1)
            .returning(|_| Ok(()));

        remote_store(mock, &dir)
            .save(document(json!({"reservations": {"1": {}}, "tokens": {"X": "A1"}})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn remote_save_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();

        let mut mock = MockRemoteBackend::new();
        mock.expect_update_state()
            .times(1)
            .returning(|_| Err(unavailable()));

        let err = remote_store(mock, &dir)
            .save(ParkingDocument::initial())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RemoteStatus { status: 503, .. }));
        assert!(!dir.path().join("db.json").exists());
    }

    #[tokio::test]
    async fn fresh_local_store_serves_defaults_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir);

        assert_eq!(store.mode(), BackendMode::LocalFile);
        assert_eq!(store.load().await, ParkingDocument::initial());
        assert!(!store.state_file().exists());
    }

    #[tokio::test]
    async fn local_save_then_load_round_trips_without_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir);

        store
            .save(document(json!({
                "reservations": {"1": {"name": "Dupont"}},
                "penalties": {"A2": 1},
                "logs": [{"at": "08:00"}, {"at": "09:00"}],
                "tokens": {"X": "A1"}
            })))
            .await
            .unwrap();

        assert_eq!(
            Value::from(store.load().await),
            json!({
                "reservations": {"1": {"name": "Dupont"}},
                "penalties": {"A2": 1},
                "logs": [{"at": "08:00"}, {"at": "09:00"}]
            })
        );
    }

    #[tokio::test]
    async fn malformed_state_file_serves_defaults_and_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir);
        std::fs::write(store.state_file(), "[1, 2, 3]").unwrap();

        assert_eq!(store.load().await, ParkingDocument::initial());
        assert_eq!(
            std::fs::read_to_string(store.state_file()).unwrap(),
            "[1, 2, 3]"
        );
    }

    #[tokio::test]
    async fn local_save_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        let store = StateStore::new(Backend::LocalFile, path);

        assert!(store.save(ParkingDocument::initial()).await.is_err());
    }
}
