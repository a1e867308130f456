// Token to apartment lookup, read-only
use std::path::PathBuf;

use crate::db::{local, Apartment, Backend, FailurePolicy, Source, StoreResult, TokenMap};

const RESOURCE: &str = "parking_tokens";

/// Outcome of a token check. An unknown token is an expected answer, not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenLookup {
    Valid(Apartment),
    NotFound,
}

#[derive(Clone)]
pub struct TokenTable {
    backend: Backend,
    tokens_file: PathBuf,
}

impl TokenTable {
    pub const READ_POLICY: FailurePolicy = FailurePolicy::Degrade;

    pub fn new(backend: Backend, tokens_file: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            tokens_file: tokens_file.into(),
        }
    }

    /// Fetches the whole table. Falls back like the state store and ends with
    /// an empty table.
    pub async fn load(&self) -> TokenMap {
        for &source in self.backend.read_chain() {
            match self.read_from(source).await {
                Ok(Some(tokens)) => return tokens,
                Ok(None) => {}
                Err(e) => Self::READ_POLICY.report(RESOURCE, source, &e),
            }
        }
        TokenMap::new()
    }

    /// Checks `token` against a fresh read of the table, so tokens provisioned
    /// out of band are visible immediately.
    pub async fn validate(&self, token: &str) -> TokenLookup {
        if token.is_empty() {
            return TokenLookup::NotFound;
        }

        match self.load().await.remove(token) {
            Some(apartment) => TokenLookup::Valid(apartment),
            None => TokenLookup::NotFound,
        }
    }

    async fn read_from(&self, source: Source) -> StoreResult<Option<TokenMap>> {
        match source {
            Source::Remote => match self.backend.remote() {
                Some(remote) => remote.fetch_tokens().await.map(Some),
                None => Ok(None),
            },
            Source::LocalFile => local::read_json(&self.tokens_file).await,
        }
    }
}
