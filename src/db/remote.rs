use async_trait::async_trait;

use crate::db::{ParkingDocument, StoreResult, TokenMap};

/// Remote database holding the state row and the token relation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// The stored document, or `None` when the state row does not exist yet.
    async fn fetch_state(&self) -> StoreResult<Option<ParkingDocument>>;

    /// Creates the state row.
    async fn insert_state(&self, document: &ParkingDocument) -> StoreResult<()>;

    /// Replaces the document held by the state row.
    async fn update_state(&self, document: &ParkingDocument) -> StoreResult<()>;

    async fn fetch_tokens(&self) -> StoreResult<TokenMap>;
}
