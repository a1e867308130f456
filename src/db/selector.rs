use std::sync::Arc;

use crate::config::RemoteCredentials;
use crate::db::{Backend, SupabaseClient};

/// Picks the storage backend for the lifetime of the process.
///
/// Remote mode needs credentials and a client that builds; anything else ends
/// in local-file mode. There are no retries: transient remote failures later on
/// are absorbed per call by the stores.
pub fn select_backend(credentials: Option<&RemoteCredentials>) -> Backend {
    let Some(credentials) = credentials else {
        tracing::info!("Supabase credentials not found, using local file storage");
        return Backend::LocalFile;
    };

    match SupabaseClient::new(&credentials.url, &credentials.key) {
        Ok(client) => {
            tracing::info!(url = %credentials.url, "Supabase client initialized");
            Backend::Remote(Arc::new(client))
        }
        Err(e) => {
            tracing::error!(
                url = %credentials.url,
                error = %e,
                "Failed to initialize Supabase client, using local file storage"
            );
            Backend::LocalFile
        }
    }
}
