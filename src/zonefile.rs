// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone file rendering and serial number management.
//!
//! A zone is rendered as a fixed SOA header followed by the domain's records
//! in builder order. The render is deterministic modulo the serial number, so
//! change detection works by neutralizing the serial line on both sides and
//! comparing bytes:
//!
//! - no existing file: write with today's date-based serial (`YYYYMMDD00`)
//! - existing file identical modulo serial: keep it untouched, report unchanged
//! - existing file differs: bump the serial past the existing one if needed,
//!   so replicas always see a strictly increasing serial
//!
//! Serial comparison is numeric, not lexical, which lets the two-digit daily
//! counter roll from `...99` to `...100` when a zone changes more than a
//! hundred times in one day.
//!
//! Rendering is pure: callers supply the existing on-disk text (if any) and
//! today's date, and get back text plus a changed flag. The [`ZoneStore`]
//! owns the actual file I/O.
//!
//! [`ZoneStore`]: crate::zone_store::ZoneStore

use crate::constants::{
    SERIAL_COMMENT, SERIAL_PLACEHOLDER, SOA_EXPIRE, SOA_MIN_TTL, SOA_REFRESH, SOA_RETRY,
    ZONE_DEFAULT_TTL,
};
use crate::dns_errors::ParseError;
use crate::environment::Environment;
use crate::records::ResourceRecord;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::ops::Range;
use tracing::debug;

/// Outcome of rendering a zone against its on-disk predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedZone {
    /// Full zone text; the existing text verbatim when `changed` is false
    pub text: String,
    /// Whether the zone must be (re)written
    pub changed: bool,
}

/// Render a zone and decide whether it needs writing.
///
/// # Arguments
///
/// * `domain` - domain the zone is authoritative for
/// * `records` - record list in publication order
/// * `env` - environment facts; the public hostname is the SOA primary
/// * `existing` - current on-disk zone text, if the file exists
/// * `today` - date used for the candidate serial (injected for testability)
///
/// # Returns
///
/// The zone text and a changed flag. When the existing zone matches the new
/// render modulo its serial line, the existing text is returned unchanged so
/// the serial is not bumped for no reason.
#[must_use]
pub fn render_zone(
    domain: &str,
    records: &[ResourceRecord],
    env: &Environment,
    existing: Option<&str>,
    today: NaiveDate,
) -> RenderedZone {
    let zone = render_template(domain, records, env);
    let candidate: u64 = format!("{}00", today.format("%Y%m%d"))
        .parse()
        .unwrap_or(0);

    let mut serial = candidate;
    if let Some(existing_text) = existing {
        match extract_serial(existing_text) {
            Some((existing_serial, span)) => {
                let mut neutralized = existing_text.to_string();
                neutralized.replace_range(span, &neutral_serial_line());

                // Same content modulo the serial: leave the file alone.
                if neutralized == zone {
                    return RenderedZone {
                        text: existing_text.to_string(),
                        changed: false,
                    };
                }

                // Content changed within the same day (or under clock skew):
                // step past the existing serial instead of reusing today's.
                if existing_serial >= candidate {
                    serial = existing_serial + 1;
                }
            }
            None => {
                // No usable serial; rewrite from scratch with a fresh one.
                let err = ParseError::SerialNotFound {
                    domain: domain.to_string(),
                };
                debug!(domain = %domain, error = %err, "treating existing zone as fresh");
            }
        }
    }

    RenderedZone {
        text: zone.replace(SERIAL_PLACEHOLDER, &serial.to_string()),
        changed: true,
    }
}

/// Render the serial-neutral zone text: SOA header plus records.
fn render_template(domain: &str, records: &[ResourceRecord], env: &Environment) -> String {
    let primary = &env.public_hostname;
    let mut zone = format!(
        r#"
$ORIGIN {domain}.    ; default zone domain
$TTL {ZONE_DEFAULT_TTL}           ; default time to live

@ IN SOA ns1.{primary}. hostmaster.{primary}. (
           {SERIAL_PLACEHOLDER}     {SERIAL_COMMENT}
           {SOA_REFRESH}       ; Refresh
           {SOA_RETRY}        ; Retry
           {SOA_EXPIRE}      ; Expire
           {SOA_MIN_TTL}       ; Min TTL
           )
"#
    );

    for record in records {
        if let Some(subdomain) = &record.subdomain {
            zone.push_str(subdomain);
        }
        let _ = writeln!(zone, "\tIN\t{}\t{}", record.rtype, record.value);
    }

    zone
}

/// The serial line fragment used on both sides of the comparison.
fn neutral_serial_line() -> String {
    format!("{SERIAL_PLACEHOLDER}     {SERIAL_COMMENT}")
}

/// Extract the serial number from existing zone text.
///
/// Scans for the `; serial number` marker and takes the digit run preceding
/// it. Returns the numeric serial and the byte span of the whole
/// `<digits> ... ; serial number` fragment, so callers can substitute the
/// placeholder back in for serial-neutral comparison.
#[must_use]
pub fn extract_serial(text: &str) -> Option<(u64, Range<usize>)> {
    let bytes = text.as_bytes();
    for (pos, _) in text.match_indices(SERIAL_COMMENT) {
        let mut i = pos;
        while i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            i -= 1;
        }
        let digits_end = i;
        while i > 0 && bytes[i - 1].is_ascii_digit() {
            i -= 1;
        }
        if i == digits_end {
            continue;
        }
        if let Ok(serial) = text[i..digits_end].parse::<u64>() {
            return Some((serial, i..pos + SERIAL_COMMENT.len()));
        }
    }
    None
}
