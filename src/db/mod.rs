//! Dual-mode persistence for the parking state and the token table.
//!
//! The backend is chosen once at startup ([`select_backend`]) and injected into
//! [`StateStore`] and [`TokenTable`]. Reads walk an ordered chain of sources
//! (remote, then local file, then built-in defaults) and never fail; writes go
//! to the selected backend only and report failures to the caller.

pub mod local;
pub mod models;
pub mod remote;
pub mod selector;
pub mod state;
pub mod supabase;
pub mod tokens;

pub use models::*;
pub use remote::RemoteBackend;
pub use selector::select_backend;
pub use state::StateStore;
pub use supabase::SupabaseClient;
pub use tokens::{TokenLookup, TokenTable};

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("remote client configuration error: {0}")]
    ClientConfig(String),
    #[error("remote request failed: {0}")]
    Remote(#[from] reqwest::Error),
    #[error("remote returned status {status}: {body}")]
    RemoteStatus { status: u16, body: String },
    #[error("unexpected remote row shape: {0}")]
    MalformedRow(String),
    #[error("remote row not found: {0}")]
    MissingRow(String),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", .path.display())]
    MalformedFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// True when the source answered but its contents could not be used.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            StoreError::MalformedRow(_) | StoreError::MalformedFile { .. }
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    Remote,
    LocalFile,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Remote => f.write_str("remote"),
            BackendMode::LocalFile => f.write_str("local_file"),
        }
    }
}

/// The backend selected at startup. Cloning shares the remote client.
#[derive(Clone)]
pub enum Backend {
    Remote(Arc<dyn RemoteBackend>),
    LocalFile,
}

impl Backend {
    pub fn mode(&self) -> BackendMode {
        match self {
            Backend::Remote(_) => BackendMode::Remote,
            Backend::LocalFile => BackendMode::LocalFile,
        }
    }

    /// Sources tried in order on the read path. Built-in defaults follow the
    /// last entry.
    pub fn read_chain(&self) -> &'static [Source] {
        match self {
            Backend::Remote(_) => &[Source::Remote, Source::LocalFile],
            Backend::LocalFile => &[Source::LocalFile],
        }
    }

    /// The only source the write path touches.
    pub fn write_target(&self) -> Source {
        match self {
            Backend::Remote(_) => Source::Remote,
            Backend::LocalFile => Source::LocalFile,
        }
    }

    pub(crate) fn remote(&self) -> Option<&dyn RemoteBackend> {
        match self {
            Backend::Remote(remote) => Some(remote.as_ref()),
            Backend::LocalFile => None,
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Backend").field(&self.mode()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    LocalFile,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote => f.write_str("remote"),
            Source::LocalFile => f.write_str("local_file"),
        }
    }
}

/// How a store treats a failed backend call.
///
/// Reads degrade so the UI always receives a usable document. Writes surface
/// so a dropped update is never silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and continue with the next source in the read chain.
    Degrade,
    /// Log and hand the error back to the caller.
    Surface,
}

impl FailurePolicy {
    pub fn report(self, resource: &str, source: Source, error: &StoreError) {
        match self {
            FailurePolicy::Degrade if error.is_malformed() => tracing::error!(
                resource,
                %source,
                error = %error,
                "Stored data is malformed, falling back to next source"
            ),
            FailurePolicy::Degrade => tracing::warn!(
                resource,
                %source,
                error = %error,
                "Backend unavailable, falling back to next source"
            ),
            FailurePolicy::Surface => tracing::error!(
                resource,
                %source,
                error = %error,
                "Backend write failed"
            ),
        }
    }
}
