use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATE_FILE: &str = "db.json";
const DEFAULT_TOKENS_FILE: &str = "tokens.json";
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_MANAGER_USER: &str = "admin";
const DEFAULT_MANAGER_PASSWORD: &str = "parking26";

/// Supabase endpoint and access key. Only built when both are non-empty.
#[derive(Clone)]
pub struct RemoteCredentials {
    pub url: String,
    pub key: String,
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Basic-auth credentials guarding the manager page.
#[derive(Clone)]
pub struct ManagerCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ManagerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub remote: Option<RemoteCredentials>,
    pub state_file: PathBuf,
    pub tokens_file: PathBuf,
    pub static_dir: PathBuf,
    pub bind_address: String,
    pub manager: ManagerCredentials,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let remote = match (var("SUPABASE_URL"), var("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(RemoteCredentials {
                url: url.trim().to_string(),
                key: key.trim().to_string(),
            }),
            _ => None,
        };

        let port: u16 = var("PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            remote,
            state_file: var("PARKING_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            tokens_file: var("PARKING_TOKENS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKENS_FILE)),
            static_dir: var("PARKING_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            bind_address: var("PARKING_BIND_ADDRESS")
                .unwrap_or_else(|| format!("0.0.0.0:{}", port)),
            manager: ManagerCredentials {
                username: var("PARKING_MANAGER_USER")
                    .unwrap_or_else(|| DEFAULT_MANAGER_USER.to_string()),
                password: var("PARKING_MANAGER_PASSWORD")
                    .unwrap_or_else(|| DEFAULT_MANAGER_PASSWORD.to_string()),
            },
        }
    }

    /// File-backed configuration with every path rooted in `dir`.
    pub fn local(dir: &Path) -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.state_file = dir.join(DEFAULT_STATE_FILE);
        config.tokens_file = dir.join(DEFAULT_TOKENS_FILE);
        config.static_dir = dir.join(DEFAULT_STATIC_DIR);
        config
    }
}
