// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for zone synthesis, daemon reloads, and the mirror side channel.
//!
//! This module provides specialized error types for:
//! - Parsing semi-structured text (DKIM record files, zone serial lines)
//! - Daemon reload command failures
//! - Best-effort zone mirror uploads
//!
//! Filesystem write failures are not modeled here; they propagate as
//! `std::io::Error` through `anyhow` and abort the run, per the error
//! handling contract.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing semi-structured record text.
///
/// These never abort a whole run: a DKIM parse failure only suppresses the
/// DKIM/ADSP/DMARC records of the affected domains, and a missing serial line
/// in an existing zone file downgrades to a full overwrite with a fresh serial.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The DKIM public record file did not match `<selector> IN TXT (<value>);`
    ///
    /// Returned when `opendkim-genkey` output is present but malformed. The
    /// policy is to omit the DKIM records rather than guess at the content.
    #[error("DKIM record file {} does not match '<selector> IN TXT (<value>);'", path.display())]
    DkimRecordMismatch {
        /// Path of the offending record file
        path: PathBuf,
    },

    /// No `<digits> ; serial number` line was found in an existing zone file
    ///
    /// Treated as "no usable serial": the zone is rewritten from scratch with
    /// a fresh date-based serial.
    #[error("no serial number line found in existing zone for '{domain}'")]
    SerialNotFound {
        /// Domain whose on-disk zone lacked a recognizable serial line
        domain: String,
    },
}

/// Errors raised when reloading a daemon after configuration changed.
///
/// A failed reload is a real operational fault and propagates to the caller,
/// unlike mirror failures which are swallowed.
#[derive(Error, Debug)]
pub enum ReloadError {
    /// The service-manager command could not be spawned
    #[error("failed to invoke reload of '{service}': {source}")]
    Spawn {
        /// Service that was being reloaded
        service: String,
        /// Underlying process error
        #[source]
        source: std::io::Error,
    },

    /// The service-manager command ran but exited non-zero
    #[error("reload of '{service}' exited with status {status}")]
    CommandFailed {
        /// Service that was being reloaded
        service: String,
        /// Exit status reported by the service manager
        status: std::process::ExitStatus,
    },
}

/// Errors raised by the best-effort zone mirror upload.
///
/// These are logged and swallowed by the orchestrator; they exist as a type
/// so the mirror implementation can report what went wrong without deciding
/// policy.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The HTTP request to the mirror API failed
    #[error("mirror API request for '{name}/{rtype}' failed: {source}")]
    Request {
        /// Fully qualified record name being uploaded
        name: String,
        /// Record type being uploaded
        rtype: String,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// The mirror API answered with a body that was not the expected JSON
    #[error("mirror API returned an unexpected response for '{name}': {source}")]
    Response {
        /// Fully qualified record name being uploaded
        name: String,
        /// JSON decoding error
        #[source]
        source: reqwest::Error,
    },
}
