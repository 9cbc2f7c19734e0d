// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Best-effort zone mirroring to an external DNS API.
//!
//! Domains under the designated test suffix are hosted with a third-party
//! provider whose API cannot delegate via NS records, so whenever one of
//! those zones is rewritten its TXT records are pushed to the provider
//! wholesale. This is a side channel: it runs only after the authoritative
//! zone file has been written, never influences change detection, and its
//! failures are reported to the caller as values to log and drop.
//!
//! Delegation-related records are skipped — NS records and the `www`, `ns1`
//! and `ns2` labels have no meaning on the mirror — and TXT values are
//! flattened: the provider rejects the parentheses and embedded line breaks
//! NSD requires around multi-part TXT values.

use crate::constants::MIRROR_DOMAIN_SUFFIX;
use crate::dns_errors::MirrorError;
use crate::environment::MirrorConfig;
use crate::records::{RecordType, ResourceRecord};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::{debug, info};

/// Push capability for the external zone mirror.
#[async_trait]
pub trait ZoneMirror {
    /// Mirror a domain's records after its zone file changed.
    ///
    /// Implementations decide which domains and records are eligible;
    /// ineligible input is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on upload failure. Callers log and swallow it.
    async fn publish_zone(&self, domain: &str, records: &[ResourceRecord])
        -> Result<(), MirrorError>;
}

/// [`ZoneMirror`] backed by the DNS4E REST API.
#[derive(Debug, Clone)]
pub struct Dns4eMirror {
    client: reqwest::Client,
    config: MirrorConfig,
}

impl Dns4eMirror {
    /// Create a mirror client from environment credentials.
    #[must_use]
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn put_record(&self, name: &str, rtype: RecordType, value: &str) -> Result<(), MirrorError> {
        let url = format!(
            "{}/{}/{}",
            self.config.endpoint,
            utf8_percent_encode(name, NON_ALPHANUMERIC),
            rtype.as_str().to_lowercase()
        );
        info!(name = %name, rtype = %rtype, "mirroring record");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .form(&[("record", value)])
            .send()
            .await
            .map_err(|source| MirrorError::Request {
                name: name.to_string(),
                rtype: rtype.as_str().to_string(),
                source,
            })?;

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|source| MirrorError::Response {
                    name: name.to_string(),
                    source,
                })?;
        debug!(
            name = %name,
            message = %body.get("message").and_then(|m| m.as_str()).unwrap_or("?"),
            "mirror API response"
        );
        Ok(())
    }
}

#[async_trait]
impl ZoneMirror for Dns4eMirror {
    async fn publish_zone(
        &self,
        domain: &str,
        records: &[ResourceRecord],
    ) -> Result<(), MirrorError> {
        if !domain.ends_with(MIRROR_DOMAIN_SUFFIX) {
            return Ok(());
        }

        for record in records {
            // The mirror only takes TXT payloads; delegation records and the
            // host labels already covered by the provider are skipped.
            if record.rtype != RecordType::Txt {
                continue;
            }
            if matches!(record.subdomain.as_deref(), Some("www" | "ns1" | "ns2")) {
                continue;
            }

            let name = match &record.subdomain {
                Some(subdomain) => format!("{subdomain}.{domain}"),
                None => domain.to_string(),
            };
            let value = flatten_txt(&record.value);
            self.put_record(&name, record.rtype, &value).await?;
        }

        Ok(())
    }
}

/// Flatten a zone-file TXT value for the mirror API.
///
/// Strips the outer parentheses around multi-part values and collapses all
/// interior whitespace (including line breaks) to single spaces.
#[must_use]
pub fn flatten_txt(value: &str) -> String {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);
    inner.split_whitespace().collect::<Vec<_>>().join(" ")
}
