use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Who is using the app right now. Built once at startup and read-only after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    wallet_address: Option<String>,
}

impl SessionContext {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            wallet_address: Some(address.into()),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn wallet_connected(&self) -> bool {
        self.wallet_address.is_some()
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    email: Option<String>,
    /// Token returned by `connect-wallet`, redeemed with the emailed code.
    #[serde(default)]
    activation_token: Option<Zeroizing<String>>,
}

/// Persisted session state stored as unencrypted JSON.
///
/// Path: `data_dir()/session.json`
pub struct SessionStore {
    path: PathBuf,
    session: StoredSession,
}

impl SessionStore {
    /// Open (or create) the session store at the default data directory.
    pub fn open() -> Result<Self> {
        let path = crate::data_dir()?.join("session.json");
        Self::open_at(path)
    }

    /// Open (or create) the session store at a specific path.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let session = if path.exists() {
            let data = std::fs::read_to_string(&path).context("Failed to read session.json")?;
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            StoredSession::default()
        };
        Ok(Self { path, session })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.session.wallet_address.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.session.email.as_deref()
    }

    pub fn activation_token(&self) -> Option<&str> {
        self.session.activation_token.as_ref().map(|t| t.as_str())
    }

    /// Remember the connected wallet. Switching wallets drops any pending
    /// email verification for the previous one.
    pub fn set_wallet_address(&mut self, address: &str) -> Result<()> {
        if self.session.wallet_address.as_deref() == Some(address) {
            return Ok(());
        }
        self.session = StoredSession {
            wallet_address: Some(address.to_string()),
            ..StoredSession::default()
        };
        self.save()
    }

    pub fn set_pending_verification(&mut self, email: &str, token: &str) -> Result<()> {
        self.session.email = Some(email.to_string());
        self.session.activation_token = Some(Zeroizing::new(token.to_string()));
        self.save()
    }

    pub fn clear_activation_token(&mut self) -> Result<()> {
        self.session.activation_token = None;
        self.save()
    }

    /// Forget everything, i.e. disconnect.
    pub fn clear(&mut self) -> Result<()> {
        self.session = StoredSession::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session.json")?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let json =
            serde_json::to_string_pretty(&self.session).context("Failed to serialize session")?;
        std::fs::write(&self.path, json).context("Failed to write session.json")?;
        Ok(())
    }
}
