// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! NSD master configuration synthesis.
//!
//! Renders `nsd.conf` with the global server options followed by one zone
//! stanza per hosted domain, and rewrites it only when the rendered text
//! differs from what is on disk. The changed flag feeds the orchestrator's
//! reload decision: a config-only change still restarts NSD even when no
//! zone file moved.

use crate::environment::Environment;
use crate::zone_store::{ZoneFileEntry, ZoneStore};
use anyhow::Result;
use std::fmt::Write as _;
use tracing::{debug, info};

/// Render the full `nsd.conf` text for the given zone entries.
///
/// Entry order is preserved; the orchestrator supplies entries sorted by
/// domain so consecutive runs produce identical config bytes.
#[must_use]
pub fn render_nsd_conf(entries: &[ZoneFileEntry], env: &Environment) -> String {
    let mut conf = format!(
        r#"
server:
  hide-version: yes

  # identify the server (CH TXT ID.SERVER entry).
  identity: ""

  # The directory for zonefile: files.
  zonesdir: "{zones_dir}"

# ZONES
"#,
        zones_dir = env.zones_dir.display()
    );

    for entry in entries {
        let _ = writeln!(
            conf,
            "\nzone:\n\tname: {}\n\tzonefile: {}",
            entry.domain, entry.filename
        );
    }

    conf
}

/// Synthesize `nsd.conf` and write it if it changed.
///
/// An absent config file counts as "differs", so the first-ever run writes
/// the config instead of failing; any other read error propagates.
///
/// # Returns
///
/// `true` if the file was written, `false` if the on-disk config already
/// matched.
///
/// # Errors
///
/// Returns an error if the existing config cannot be read (other than being
/// absent) or the new config cannot be written.
pub fn write_nsd_conf<S: ZoneStore>(
    entries: &[ZoneFileEntry],
    env: &Environment,
    store: &S,
) -> Result<bool> {
    let conf = render_nsd_conf(entries, env);

    if let Some(existing) = store.read_existing(&env.nsd_conf)? {
        if existing == conf {
            debug!(path = %env.nsd_conf.display(), "nsd.conf unchanged");
            return Ok(false);
        }
    }

    store.write(&env.nsd_conf, &conf)?;
    info!(path = %env.nsd_conf.display(), zones = entries.len(), "wrote nsd.conf");
    Ok(true)
}
