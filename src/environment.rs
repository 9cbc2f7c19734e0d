// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Environment facts driving zone synthesis.
//!
//! The environment describes the mail server itself: its public hostname and
//! IP, where user data lives, and where the generated daemon configuration
//! goes. It is loaded once per run from a YAML file and passed immutably
//! through the pipeline.
//!
//! Every path with a conventional location defaults to that location, so a
//! minimal config file only carries the three facts nsdy cannot guess:
//!
//! ```yaml
//! public_hostname: mail.example.com
//! public_ip: 203.0.113.5
//! storage_root: /home/user-data
//! ```

use crate::constants::{
    DKIM_KEY_FILE, DKIM_RECORD_FILE, NSD_CONF_PATH, NSD_ZONES_DIR, OPENDKIM_KEY_TABLE_PATH,
    OPENDKIM_SIGNING_TABLE_PATH,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Facts about the mail server needed to synthesize its DNS zones.
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    /// Public hostname of the mail server; always served as a zone and used
    /// as the primary nameserver domain in every SOA record
    pub public_hostname: String,

    /// Public IPv4 address all A records point at
    pub public_ip: String,

    /// Root of the mail server's persistent storage; DKIM key material is
    /// read from well-known paths beneath it
    pub storage_root: PathBuf,

    /// Directory for generated zone files
    #[serde(default = "default_zones_dir")]
    pub zones_dir: PathBuf,

    /// Path of the generated NSD master configuration
    #[serde(default = "default_nsd_conf")]
    pub nsd_conf: PathBuf,

    /// Path of the generated OpenDKIM key table
    #[serde(default = "default_key_table")]
    pub key_table: PathBuf,

    /// Path of the generated OpenDKIM signing table
    #[serde(default = "default_signing_table")]
    pub signing_table: PathBuf,

    /// Optional credentials for the external zone mirror; mirroring is
    /// disabled when absent
    #[serde(default)]
    pub mirror: Option<MirrorConfig>,
}

/// Access configuration for the external DNS mirror API.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Base URL of the mirror REST API, e.g. `https://api.dns4e.com/v7`
    pub endpoint: String,

    /// HTTP basic auth username
    pub username: String,

    /// HTTP basic auth password
    pub password: String,
}

fn default_zones_dir() -> PathBuf {
    PathBuf::from(NSD_ZONES_DIR)
}

fn default_nsd_conf() -> PathBuf {
    PathBuf::from(NSD_CONF_PATH)
}

fn default_key_table() -> PathBuf {
    PathBuf::from(OPENDKIM_KEY_TABLE_PATH)
}

fn default_signing_table() -> PathBuf {
    PathBuf::from(OPENDKIM_SIGNING_TABLE_PATH)
}

impl Environment {
    /// Load the environment from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not deserialize
    /// into a valid [`Environment`].
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read environment file {}", path.display()))?;
        let env: Environment = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse environment file {}", path.display()))?;
        Ok(env)
    }

    /// Path of the DKIM public record file produced by `opendkim-genkey`.
    #[must_use]
    pub fn dkim_record_file(&self) -> PathBuf {
        self.storage_root.join(DKIM_RECORD_FILE)
    }

    /// Path of the shared DKIM private key file.
    #[must_use]
    pub fn dkim_key_file(&self) -> PathBuf {
        self.storage_root.join(DKIM_KEY_FILE)
    }
}
