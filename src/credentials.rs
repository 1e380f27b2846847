//! Stored disposable account: metadata as TOML, secrets in the OS keyring
//! with a private file as fallback.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const SERVICE: &str = "burnmail";
const ENV_TOKEN: &str = "BURNMAIL_TOKEN";
const ACCOUNT_FILE: &str = "account.toml";

/// Non-secret account metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Secrets {
    password: String,
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub info: AccountInfo,
    pub password: String,
    pub token: String,
}

pub struct AccountStore {
    dir: PathBuf,
    use_keyring: bool,
}

impl AccountStore {
    /// Store rooted at `dir`, backed by the OS keyring
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            use_keyring: true,
        }
    }

    /// Store in the per-user config directory
    pub fn open() -> Result<Self> {
        Ok(Self::new(crate::config::Config::config_dir()?))
    }

    #[cfg(test)]
    fn file_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            use_keyring: false,
        }
    }

    fn account_path(&self) -> PathBuf {
        self.dir.join(ACCOUNT_FILE)
    }

    fn secrets_path(&self, address: &str) -> PathBuf {
        let safe = address.replace(['@', '.', '/', '\\', ':'], "_");
        self.dir.join(format!(".secrets_{}", safe))
    }

    fn keyring_key(address: &str) -> String {
        format!("account:{}", address)
    }

    pub fn exists(&self) -> bool {
        self.account_path().exists()
    }

    pub fn load(&self) -> Result<Account> {
        let path = self.account_path();
        if !path.exists() {
            anyhow::bail!("No account found. Run 'burnmail generate' to create one.");
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read account file: {}", path.display()))?;
        let info: AccountInfo = toml::from_str(&content)
            .with_context(|| format!("Failed to parse account file: {}", path.display()))?;

        let secrets = self
            .keyring_get(&info.address)
            .or_else(|| file_get(&self.secrets_path(&info.address)))
            .with_context(|| format!("Credentials for {} not found", info.address))?;

        let account = Account {
            info,
            password: secrets.password,
            token: secrets.token,
        };
        Ok(with_token_override(account, env::var(ENV_TOKEN).ok()))
    }

    pub fn save(&self, account: &Account) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let content =
            toml::to_string_pretty(&account.info).context("Failed to serialize account")?;
        fs::write(self.account_path(), content).context("Failed to write account file")?;

        let secrets = Secrets {
            password: account.password.clone(),
            token: account.token.clone(),
        };
        if self.keyring_set(&account.info.address, &secrets) {
            return Ok(());
        }

        tracing::warn!("Keyring unavailable, storing credentials in a private file");
        file_set(&self.secrets_path(&account.info.address), &secrets)
    }

    /// Remove metadata and secrets. Missing pieces are not an error.
    pub fn delete(&self) -> Result<()> {
        let path = self.account_path();
        let address = fs::read_to_string(&path)
            .ok()
            .and_then(|content| toml::from_str::<AccountInfo>(&content).ok())
            .map(|info| info.address);

        if let Some(address) = address {
            if self.use_keyring
                && let Ok(entry) = keyring::Entry::new(SERVICE, &Self::keyring_key(&address))
            {
                let _ = entry.delete_credential();
            }
            remove_if_exists(&self.secrets_path(&address))?;
        }

        remove_if_exists(&path)
    }

    fn keyring_get(&self, address: &str) -> Option<Secrets> {
        if !self.use_keyring {
            return None;
        }
        let entry = keyring::Entry::new(SERVICE, &Self::keyring_key(address)).ok()?;
        let raw = entry.get_password().ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn keyring_set(&self, address: &str, secrets: &Secrets) -> bool {
        if !self.use_keyring {
            return false;
        }
        let Ok(raw) = serde_json::to_string(secrets) else {
            return false;
        };
        let Ok(entry) = keyring::Entry::new(SERVICE, &Self::keyring_key(address)) else {
            return false;
        };
        // Verify it actually worked; some backends accept writes they drop
        entry.set_password(&raw).is_ok() && self.keyring_get(address).as_ref() == Some(secrets)
    }
}

fn with_token_override(mut account: Account, token: Option<String>) -> Account {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        tracing::debug!("Using bearer token from {}", ENV_TOKEN);
        account.token = token;
    }
    account
}

fn file_get(path: &Path) -> Option<Secrets> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn file_set(path: &Path, secrets: &Secrets) -> Result<()> {
    let raw = serde_json::to_vec(secrets).context("Failed to serialize credentials")?;
    write_private(path, &raw)
}

/// Write `contents` to a file only the owner can read
pub fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    // Create with restricted permissions atomically to avoid TOCTOU
    #[cfg(unix)]
    {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(contents)?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
