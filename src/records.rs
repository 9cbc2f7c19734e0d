// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record building for hosted mail domains.
//!
//! This module derives the ordered resource record list for one domain from
//! the server environment. The order is load-bearing: it determines the byte
//! order of the rendered zone file, which in turn drives change detection and
//! serial bumping.
//!
//! Every domain gets the same base set:
//!
//! 1. `NS ns1.<hostname>.` and `NS ns2.<hostname>.`
//! 2. `A` for the zone root pointing at the public IP
//! 3. `MX 10 <hostname>.`
//! 4. SPF `TXT "v=spf1 mx -all"`
//! 5. `A` for `www`
//!
//! The public hostname's own zone additionally defines `ns1` and `ns2` A
//! records so the nameservers resolve under their own domain. When a DKIM
//! public record has been provisioned, the DKIM TXT record plus ADSP and
//! DMARC policy records are appended.

use crate::constants::{
    ADSP_LABEL, ADSP_RECORD, DMARC_LABEL, DMARC_RECORD, MX_PRIORITY, SPF_RECORD,
};
use crate::dkim;
use crate::environment::Environment;
use std::fmt;
use tracing::{debug, warn};

/// DNS record types emitted into zone files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// Nameserver delegation
    Ns,
    /// IPv4 address
    A,
    /// Mail exchanger
    Mx,
    /// Free-form text (SPF, DKIM, ADSP, DMARC)
    Txt,
}

impl RecordType {
    /// Zone-file representation of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Ns => "NS",
            RecordType::A => "A",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource record within a domain's zone.
///
/// `subdomain` is `None` for records on the zone root. `value` is
/// pre-formatted zone-file text and is rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Label under the zone root, or `None` for the root itself
    pub subdomain: Option<String>,
    /// Record type
    pub rtype: RecordType,
    /// Pre-formatted record value
    pub value: String,
}

impl ResourceRecord {
    /// Create a record on the zone root.
    #[must_use]
    pub fn root(rtype: RecordType, value: impl Into<String>) -> Self {
        Self {
            subdomain: None,
            rtype,
            value: value.into(),
        }
    }

    /// Create a record on a subdomain label.
    #[must_use]
    pub fn sub(subdomain: impl Into<String>, rtype: RecordType, value: impl Into<String>) -> Self {
        Self {
            subdomain: Some(subdomain.into()),
            rtype,
            value: value.into(),
        }
    }
}

/// Build the ordered record list for one domain.
///
/// The DKIM public record file is read (never written) on each call; if it is
/// absent the DKIM/ADSP/DMARC records are simply not emitted, and if it is
/// present but malformed a warning is logged and the same omission applies
/// rather than guessing at the content. Either way the remaining records for
/// the domain are still produced, so one bad DKIM file never blocks DNS
/// updates for the domain.
///
/// # Arguments
///
/// * `domain` - Fully qualified domain to build records for
/// * `env` - Server environment facts
///
/// # Returns
///
/// The record list in rendering order. Deterministic for identical inputs.
#[must_use]
pub fn build_zone(domain: &str, env: &Environment) -> Vec<ResourceRecord> {
    let mut records = vec![
        ResourceRecord::root(RecordType::Ns, format!("ns1.{}.", env.public_hostname)),
        ResourceRecord::root(RecordType::Ns, format!("ns2.{}.", env.public_hostname)),
        ResourceRecord::root(RecordType::A, env.public_ip.clone()),
        ResourceRecord::root(
            RecordType::Mx,
            format!("{} {}.", MX_PRIORITY, env.public_hostname),
        ),
        ResourceRecord::root(RecordType::Txt, SPF_RECORD),
        ResourceRecord::sub("www", RecordType::A, env.public_ip.clone()),
    ];

    // The nameservers live under the public hostname, so its own zone must
    // define ns1 and ns2.
    if domain == env.public_hostname {
        records.push(ResourceRecord::sub("ns1", RecordType::A, env.public_ip.clone()));
        records.push(ResourceRecord::sub("ns2", RecordType::A, env.public_ip.clone()));
    }

    match dkim::load_dkim_record(&env.dkim_record_file()) {
        Ok(Some(dkim_record)) => {
            debug!(
                domain = %domain,
                selector = %dkim_record.selector,
                "appending DKIM, ADSP and DMARC records"
            );
            records.push(ResourceRecord::sub(
                dkim_record.selector,
                RecordType::Txt,
                dkim_record.value,
            ));
            records.push(ResourceRecord::sub(ADSP_LABEL, RecordType::Txt, ADSP_RECORD));
            records.push(ResourceRecord::sub(DMARC_LABEL, RecordType::Txt, DMARC_RECORD));
        }
        Ok(None) => {
            debug!(domain = %domain, "no DKIM record file, skipping DKIM records");
        }
        Err(err) => {
            warn!(domain = %domain, error = %err, "unusable DKIM record file, omitting DKIM records");
        }
    }

    records
}
