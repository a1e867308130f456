// Library entry point for the server binary and tests
pub mod api;
pub mod config;
pub mod db;

pub use config::Config;
pub use db::{Backend, StateStore, TokenTable};

pub struct AppState {
    pub state_store: StateStore,
    pub token_table: TokenTable,
    pub config: Config,
}

impl AppState {
    /// Wires both stores to the same backend. The backend is decided once at
    /// startup and never changes afterwards.
    pub fn new(config: Config, backend: Backend) -> Self {
        Self {
            state_store: StateStore::new(backend.clone(), config.state_file.clone()),
            token_table: TokenTable::new(backend, config.tokens_file.clone()),
            config,
        }
    }
}
