// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for nsdy.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Filesystem Layout
// ============================================================================

/// Directory where per-domain NSD zone files are written
pub const NSD_ZONES_DIR: &str = "/etc/nsd/zones";

/// Path of the NSD master configuration file
pub const NSD_CONF_PATH: &str = "/etc/nsd/nsd.conf";

/// Path of the OpenDKIM key table
pub const OPENDKIM_KEY_TABLE_PATH: &str = "/etc/opendkim/KeyTable";

/// Path of the OpenDKIM signing table
pub const OPENDKIM_SIGNING_TABLE_PATH: &str = "/etc/opendkim/SigningTable";

/// DKIM public record file, relative to the storage root.
///
/// Written by `opendkim-genkey`; nsdy only reads it.
pub const DKIM_RECORD_FILE: &str = "mail/dkim/mail.txt";

/// DKIM private key file, relative to the storage root.
///
/// Its presence gates the OpenDKIM table synthesis.
pub const DKIM_KEY_FILE: &str = "mail/dkim/mail.private";

/// Extension appended to the percent-encoded domain to form a zone filename
pub const ZONE_FILE_EXTENSION: &str = ".txt";

// ============================================================================
// Zone Timers (SOA)
// ============================================================================

/// Default zone TTL in seconds
pub const ZONE_DEFAULT_TTL: u32 = 86400;

/// SOA refresh interval in seconds
pub const SOA_REFRESH: u32 = 28800;

/// SOA retry interval in seconds
pub const SOA_RETRY: u32 = 7200;

/// SOA expire interval in seconds
pub const SOA_EXPIRE: u32 = 864_000;

/// SOA negative-caching (minimum) TTL in seconds
pub const SOA_MIN_TTL: u32 = 86400;

/// Placeholder substituted for the serial number while comparing zone text
pub const SERIAL_PLACEHOLDER: &str = "__SERIAL__";

/// Comment marker that identifies the serial line in a rendered zone
pub const SERIAL_COMMENT: &str = "; serial number";

// ============================================================================
// Mail Policy Records
// ============================================================================

/// SPF policy published for every hosted domain
pub const SPF_RECORD: &str = "\"v=spf1 mx -all\"";

/// ADSP (RFC 5617) policy published alongside the DKIM key
pub const ADSP_RECORD: &str = "\"dkim=all\"";

/// Subdomain label carrying the ADSP policy
pub const ADSP_LABEL: &str = "_adsp._domainkey";

/// DMARC policy published alongside the DKIM key
pub const DMARC_RECORD: &str = "\"v=DMARC1; p=quarantine\"";

/// Subdomain label carrying the DMARC policy
pub const DMARC_LABEL: &str = "_dmarc";

/// DKIM selector used for every signing-table entry
pub const DKIM_SELECTOR: &str = "mail";

/// Preference value of the single MX record per domain
pub const MX_PRIORITY: u32 = 10;

// ============================================================================
// Daemon Reload
// ============================================================================

/// Service-manager name of the DNS daemon
pub const DNS_SERVICE: &str = "nsd";

/// Service-manager name of the DKIM signing daemon
pub const SIGNING_SERVICE: &str = "opendkim";

/// Sentinel entry recorded when only the NSD configuration changed,
/// so the reload logic still fires without any zone file having changed
pub const DNS_CONFIG_SENTINEL: &str = "DNS configuration";

// ============================================================================
// Zone Mirror
// ============================================================================

/// Domain suffix eligible for best-effort mirroring to the external DNS API
pub const MIRROR_DOMAIN_SUFFIX: &str = ".justtesting.email";
