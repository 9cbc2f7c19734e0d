// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! On-disk zone file naming and storage.
//!
//! Zone files and the NSD configuration are the only state nsdy keeps between
//! runs, so reads and writes go through the [`ZoneStore`] trait. The renderer
//! and orchestrator take the store as a dependency, which keeps the serial
//! logic testable against plain strings instead of a live `/etc/nsd`.
//!
//! Zone filenames are the percent-encoded domain plus `.txt`. Encoding treats
//! no character as safe beyond ASCII alphanumerics (so `.` becomes `%2E`);
//! the same name is emitted into `nsd.conf`, and writer and reader must agree
//! byte for byte.

use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::constants::ZONE_FILE_EXTENSION;

/// A domain paired with its on-disk zone filename.
///
/// Cross-references one zone to its `nsd.conf` stanza and to the OpenDKIM
/// tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFileEntry {
    /// Fully qualified domain the zone is authoritative for
    pub domain: String,
    /// Filename of the zone within the zones directory
    pub filename: String,
}

impl ZoneFileEntry {
    /// Pair a domain with its derived zone filename.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        let filename = zone_file_name(&domain);
        Self { domain, filename }
    }
}

/// Derive the zone filename for a domain.
///
/// Percent-encodes every non-alphanumeric byte, e.g.
/// `example.com` → `example%2Ecom.txt`.
#[must_use]
pub fn zone_file_name(domain: &str) -> String {
    format!(
        "{}{}",
        utf8_percent_encode(domain, NON_ALPHANUMERIC),
        ZONE_FILE_EXTENSION
    )
}

/// Read/write access to generated configuration files.
///
/// Implementations must distinguish "file absent" (`Ok(None)` from
/// [`read_existing`](ZoneStore::read_existing)) from a read failure, which
/// callers surface.
pub trait ZoneStore {
    /// Read an existing file, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than the file being absent.
    fn read_existing(&self, path: &Path) -> Result<Option<String>>;

    /// Write `content` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the run aborts in that case.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Create a directory (and its parents) if absent.
    ///
    /// Called once for the zones directory before any per-domain writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn ensure_dir(&self, path: &Path) -> Result<()>;
}

/// [`ZoneStore`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsZoneStore;

impl ZoneStore for FsZoneStore {
    fn read_existing(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory {}", path.display()))
    }
}
