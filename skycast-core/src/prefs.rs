//! Durable key-value persistence for the two screen preferences.
//!
//! Values are tiny scalar strings kept in one TOML document under the
//! platform data directory. Reads are change-notifying: `subscribe` hands out
//! a watch receiver whose first borrow is the current value, so the screen
//! can treat a preference as a stream.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::watch;

/// Names of the persisted preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    /// City name from the last submitted search.
    LastCity,
    /// Icon URL derived from the last successful fetch.
    LastIconUrl,
}

impl PrefKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKey::LastCity => "last_city",
            PrefKey::LastIconUrl => "last_icon_url",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to read preferences file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write preferences file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("preferences file {} is not valid TOML: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine platform data directory")]
    NoDataDir,
}

/// On-disk document. An absent key means "never written".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PrefData {
    last_city: Option<String>,
    last_icon_url: Option<String>,
}

/// Store for the persisted preferences.
///
/// The current values live in watch channels; an unset preference reads as
/// the empty string. Every `set` rewrites the whole document, which is two
/// short strings at most.
pub struct PrefStore {
    path: PathBuf,
    city_tx: watch::Sender<String>,
    icon_tx: watch::Sender<String>,
}

impl PrefStore {
    /// Open a store backed by `path`, loading any previously persisted
    /// values. A missing file yields empty values.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();

        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| PrefsError::Read {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&contents).map_err(|source| PrefsError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            PrefData::default()
        };

        let (city_tx, _) = watch::channel(data.last_city.unwrap_or_default());
        let (icon_tx, _) = watch::channel(data.last_icon_url.unwrap_or_default());

        Ok(Self {
            path,
            city_tx,
            icon_tx,
        })
    }

    /// Open the store at its platform-default location.
    pub fn open_default() -> Result<Self, PrefsError> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast").ok_or(PrefsError::NoDataDir)?;

        let dir = dirs.data_dir();
        std::fs::create_dir_all(dir).map_err(|source| PrefsError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        Self::open(dir.join("prefs.toml"))
    }

    /// Current value for `key`; empty string when never written.
    pub fn get(&self, key: PrefKey) -> String {
        self.channel(key).borrow().clone()
    }

    /// Stream of values for `key`. The first borrow yields the current
    /// value; every subsequent `set` notifies the receiver.
    pub fn subscribe(&self, key: PrefKey) -> watch::Receiver<String> {
        self.channel(key).subscribe()
    }

    /// Replace the value for `key`, notify subscribers, and persist the
    /// document. The file is created on the first write.
    pub async fn set(&self, key: PrefKey, value: &str) -> Result<(), PrefsError> {
        self.channel(key).send_replace(value.to_string());
        self.persist().await
    }

    fn channel(&self, key: PrefKey) -> &watch::Sender<String> {
        match key {
            PrefKey::LastCity => &self.city_tx,
            PrefKey::LastIconUrl => &self.icon_tx,
        }
    }

    async fn persist(&self) -> Result<(), PrefsError> {
        let data = PrefData {
            last_city: non_empty(self.city_tx.borrow().clone()),
            last_icon_url: non_empty(self.icon_tx.borrow().clone()),
        };

        let toml = toml::to_string_pretty(&data)?;

        tokio::fs::write(&self.path, toml)
            .await
            .map_err(|source| PrefsError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
