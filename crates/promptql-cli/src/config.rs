// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use promptql_app::Credentials;
use promptql_sdk::ClientOptions;
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "promptql-tui";
const CONFIG_FILE: &str = "config.json";

/// Reads and writes the credential file. The location is `None` only when
/// no home directory can be resolved and no override is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: Option<PathBuf>,
}

impl CredentialStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `PROMPTQL_CONFIG_PATH` when set, else `~/.config/promptql-tui/config.json`.
    pub fn default_location() -> Self {
        if let Some(path) = env::var_os("PROMPTQL_CONFIG_PATH").filter(|path| !path.is_empty()) {
            return Self::at(path);
        }
        Self {
            path: dirs::home_dir().map(|home| home.join(".config").join(APP_DIR).join(CONFIG_FILE)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Missing files and an unresolvable home both yield empty credentials.
    pub fn load(&self) -> Result<Credentials> {
        let Some(path) = &self.path else {
            return Ok(Credentials::default());
        };
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(Credentials::default());
            }
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("read credentials {}", path.display()));
            }
        };
        serde_json::from_str(&raw).with_context(|| {
            format!(
                "parse credentials {}; fix or delete the file to re-run setup",
                path.display()
            )
        })
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            anyhow!("cannot resolve home directory; set PROMPTQL_CONFIG_PATH to the credential file")
        })?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_private_dir(dir)?;
        }
        let json = serde_json::to_string_pretty(credentials).context("encode credentials")?;
        let mut file = open_private_file(path)?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("write credentials {}", path.display()))?;
        Ok(())
    }
}

/// Replaces credential fields with non-empty values from the environment.
pub fn apply_env_overrides<F>(credentials: &mut Credentials, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let fields = [
        ("PROMPTQL_PAT", &mut credentials.pat),
        ("PROMPTQL_API_KEY", &mut credentials.api_key),
        ("PROMPTQL_DDN_URL", &mut credentials.ddn_url),
    ];
    for (name, field) in fields {
        if let Some(value) = lookup(name).filter(|value| !value.is_empty()) {
            *field = value;
        }
    }
}

/// Endpoint settings for the Service client. Credentials are
/// filled in later from the session.
pub fn endpoint_options<F>(lookup: F) -> ClientOptions
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = ClientOptions::default();
    let fields = [
        ("PROMPTQL_BASE_URL", &mut options.base_url),
        ("PROMPTQL_API_URL", &mut options.api_url),
        ("PROMPTQL_AUTH_URL", &mut options.auth_url),
        ("PROMPTQL_CONTROL_PLANE_URL", &mut options.control_plane_url),
    ];
    for (name, field) in fields {
        if let Some(value) = lookup(name).filter(|value| !value.trim().is_empty()) {
            *field = value;
        }
    }
    options
}

pub fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .with_context(|| format!("create config directory {}", dir.display()))?;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("restrict config directory {}", dir.display()))
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create config directory {}", dir.display()))
}

#[cfg(unix)]
fn open_private_file(path: &Path) -> Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("open credentials {}", path.display()))?;
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restrict credentials {}", path.display()))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private_file(path: &Path) -> Result<fs::File> {
    fs::File::create(path).with_context(|| format!("open credentials {}", path.display()))
}
