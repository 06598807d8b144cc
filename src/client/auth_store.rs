use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::api::ClientError;

/// File name of the persisted session
pub const STORAGE_KEY: &str = "auth-storage";

/// `INNEXAR_CLI_CONFIG_DIR`, else `$HOME/.config/innexar`
pub fn default_config_dir() -> Result<PathBuf, ClientError> {
    if let Ok(custom_dir) = std::env::var("INNEXAR_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }
    let home = std::env::var("HOME").map_err(|_| ClientError::NoConfigDir)?;
    Ok(PathBuf::from(home).join(".config").join("innexar"))
}

/// Token and user returned by a successful login
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Value,
}

/// Server operations the store depends on
#[async_trait]
pub trait AuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    /// Profile for `token`; any error means the token is no longer good
    async fn me(&self, token: &str) -> Result<Value, ClientError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<Value>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Persisted {
    state: AuthState,
    version: u32,
}

/// Session state persisted between CLI invocations
#[derive(Debug, Clone)]
pub struct AuthStore {
    path: PathBuf,
    state: AuthState,
}

impl AuthStore {
    /// Store under the default config directory
    pub fn open_default() -> Result<Self, ClientError> {
        Self::load(default_config_dir()?.join(STORAGE_KEY))
    }

    /// Read `path`; a missing file is an empty session
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<Persisted>(&content)?.state
        } else {
            AuthState::default()
        };
        Ok(Self { path, state })
    }

    pub fn save(&self) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let persisted = Persisted {
            state: self.state.clone(),
            version: 0,
        };
        fs::write(&self.path, serde_json::to_string_pretty(&persisted)?)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn user(&self) -> Option<&Value> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some()
    }

    /// Exchange credentials for a session and persist it
    pub async fn login(&mut self, api: &(impl AuthApi + Sync), email: &str, password: &str) -> Result<(), ClientError> {
        let session = api.login(email, password).await?;
        self.state = AuthState {
            user: Some(session.user),
            token: Some(session.token),
        };
        self.save()
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.state = AuthState::default();
        self.save()
    }

    /// Refresh the stored user from the server; clear the session when the
    /// server no longer accepts the token. Returns whether a session remains.
    pub async fn check_auth(&mut self, api: &(impl AuthApi + Sync)) -> Result<bool, ClientError> {
        let Some(token) = self.state.token.clone() else {
            return Ok(false);
        };

        match api.me(&token).await {
            Ok(user) => {
                self.state.user = Some(user);
                self.save()?;
                Ok(true)
            }
            Err(e) => {
                debug!("Stored session rejected: {}", e);
                self.logout()?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_is_an_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = AuthStore::load(dir.path().join(STORAGE_KEY)).unwrap();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn save_round_trips_through_the_state_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STORAGE_KEY);

        let mut store = AuthStore::load(&path).unwrap();
        store.state = AuthState {
            user: Some(json!({ "name": "Ana" })),
            token: Some("tok".into()),
        };
        store.save().unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["state"]["token"], "tok");
        assert_eq!(raw["version"], 0);

        let reloaded = AuthStore::load(&path).unwrap();
        assert_eq!(reloaded.token(), Some("tok"));
    }
}
