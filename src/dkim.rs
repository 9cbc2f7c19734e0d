// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DKIM record-file parsing and OpenDKIM table synthesis.
//!
//! `opendkim-genkey` leaves the public key half of the signing key as a
//! ready-made zone-file fragment, e.g.:
//!
//! ```text
//! mail._domainkey IN TXT ( "v=DKIM1; k=rsa; "
//!     "p=MIGfMA0GCSq..." ) ; ----- DKIM key mail
//! ```
//!
//! This module parses that fragment into a typed (selector, value) pair so
//! the record builder can publish it verbatim, and writes the two OpenDKIM
//! lookup tables that tell the signing daemon which key signs which domain.
//!
//! The KeyTable maps a key name to `<domain>:<selector>:<key file>`; the
//! SigningTable maps every sender address of a domain to that key name. ADSP
//! and DMARC only accept signatures whose domain matches the From address, so
//! each domain signs with its own name even though all domains share one key
//! file.

use crate::constants::DKIM_SELECTOR;
use crate::dns_errors::ParseError;
use crate::environment::Environment;
use crate::zone_store::ZoneFileEntry;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A DKIM public key record parsed from an `opendkim-genkey` output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimTxtRecord {
    /// Selector label, e.g. `mail._domainkey`
    pub selector: String,
    /// Parenthesized TXT value, kept verbatim for the zone renderer
    pub value: String,
}

/// Read and parse the DKIM public record file.
///
/// # Returns
///
/// * `Ok(Some(_))` - file exists and parsed
/// * `Ok(None)` - file does not exist (DKIM not provisioned yet)
/// * `Err(_)` - file exists but is unreadable or malformed
pub fn load_dkim_record(path: &Path) -> Result<Option<DkimTxtRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read DKIM record file {}", path.display()))?;
    let record = parse_dkim_record(&content).ok_or_else(|| ParseError::DkimRecordMismatch {
        path: path.to_path_buf(),
    })?;
    Ok(Some(record))
}

/// Parse `<selector> IN TXT (<value>) ;` from a record-file fragment.
///
/// The value may span multiple lines; everything from the opening parenthesis
/// through the last closing parenthesis that is followed by a semicolon is
/// kept verbatim, including the parentheses NSD requires around multi-part
/// TXT values.
#[must_use]
pub fn parse_dkim_record(content: &str) -> Option<DkimTxtRecord> {
    let rest = content.trim_start();

    let (selector, rest) = rest.split_once(char::is_whitespace)?;
    if selector.is_empty() || selector.starts_with('(') {
        return None;
    }

    let rest = rest.trim_start();
    let rest = rest.strip_prefix("IN")?;
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();
    let rest = rest.strip_prefix("TXT")?;
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();

    // The parenthesized value must start right after the whitespace; anything
    // else in between is a malformed file, not something to skip over.
    if !rest.starts_with('(') {
        return None;
    }
    // Take the last ")" that is followed by the terminating semicolon, so
    // parentheses inside the quoted key material do not cut the value short.
    let close = rest
        .rmatch_indices(')')
        .find(|(i, _)| rest[i + 1..].trim_start().starts_with(';'))
        .map(|(i, _)| i)?;

    Some(DkimTxtRecord {
        selector: selector.to_string(),
        value: rest[..=close].to_string(),
    })
}

/// Write the OpenDKIM KeyTable and SigningTable for the given domains.
///
/// Skips both files entirely when the shared private key does not exist:
/// signing tables are only meaningful once a DKIM key has been provisioned.
/// When the key exists the tables are rewritten unconditionally; there is no
/// change detection here, the signing daemon is reloaded every run anyway.
///
/// # Errors
///
/// Returns an error if either table cannot be written.
pub fn write_opendkim_tables(entries: &[ZoneFileEntry], env: &Environment) -> Result<()> {
    let key_file = env.dkim_key_file();
    if !key_file.exists() {
        debug!(
            key_file = %key_file.display(),
            "DKIM private key not provisioned, skipping OpenDKIM tables"
        );
        return Ok(());
    }
    let key_file = key_file.display().to_string();

    let key_table = entries
        .iter()
        .map(|entry| {
            format!(
                "{domain} {domain}:{selector}:{key_file}",
                domain = entry.domain,
                selector = DKIM_SELECTOR,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    write_table(&env.key_table, &key_table)?;

    let signing_table = entries
        .iter()
        .map(|entry| format!("*@{domain} {domain}", domain = entry.domain))
        .collect::<Vec<_>>()
        .join("\n");
    write_table(&env.signing_table, &signing_table)?;

    info!(domains = entries.len(), "wrote OpenDKIM tables");
    Ok(())
}

fn write_table(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
