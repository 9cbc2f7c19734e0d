// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Update orchestration: domain set → zone files → daemon config → reloads.
//!
//! A run has three sequential phases with no branching back:
//!
//! 1. **Resolve** — the domain set is the public hostname plus every domain
//!    used by mail users and aliases. Domains are kept sorted so the
//!    `nsd.conf` stanza order is reproducible run to run.
//! 2. **Per-domain** — build records, render against the existing zone file,
//!    write only on change. Changed domains are collected and, for eligible
//!    domains, forwarded to the zone mirror best-effort.
//! 3. **Global** — rewrite `nsd.conf` if it changed (counting a config-only
//!    change as an update so the reload still fires), restart the DNS daemon
//!    if anything changed, then always rewrite the OpenDKIM tables and
//!    restart the signing daemon. An unnecessary signing reload is cheaper
//!    than tracking whether the tables changed.
//!
//! Runs are strictly sequential and assume sole ownership of the zones
//! directory and daemon config files; invoking two runs concurrently is
//! undefined behavior. Zone files for domains that disappear from the set
//! are left behind (known limitation).

use crate::constants::DNS_CONFIG_SENTINEL;
use crate::dkim;
use crate::environment::Environment;
use crate::nsd;
use crate::notifier::ZoneMirror;
use crate::records::{self, ResourceRecord};
use crate::reload::DaemonReloader;
use crate::zone_store::{ZoneFileEntry, ZoneStore};
use crate::zonefile;
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Drives a full DNS/DKIM regeneration run.
pub struct DnsUpdater<'a, S, R, M> {
    env: &'a Environment,
    store: S,
    reloader: R,
    mirror: Option<M>,
}

/// Result of regenerating one domain's zone file.
struct ZoneOutcome {
    changed: bool,
    records: Vec<ResourceRecord>,
}

impl<'a, S, R, M> DnsUpdater<'a, S, R, M>
where
    S: ZoneStore,
    R: DaemonReloader,
    M: ZoneMirror,
{
    /// Create an updater over the given environment and collaborators.
    ///
    /// `mirror` is optional; without it the mirror side channel is disabled.
    pub fn new(env: &'a Environment, store: S, reloader: R, mirror: Option<M>) -> Self {
        Self {
            env,
            store,
            reloader,
            mirror,
        }
    }

    /// Regenerate all zones and signing configuration, reloading daemons as
    /// needed.
    ///
    /// # Arguments
    ///
    /// * `mail_domains` - every domain appearing in mail users and aliases;
    ///   the public hostname is added automatically
    ///
    /// # Returns
    ///
    /// A human-readable summary: empty when nothing changed, otherwise
    /// `"updated: d1,d2,...\n"`.
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem write failures or a failed DNS/signing
    /// daemon reload. There is no rollback; zones written before the failure
    /// stay written.
    pub async fn do_update(&self, mail_domains: BTreeSet<String>) -> Result<String> {
        // Phase 1: resolve the domain set. The BTreeSet collapses duplicates
        // and keeps nsd.conf stanza order stable across runs.
        let mut domains = mail_domains;
        domains.insert(self.env.public_hostname.clone());
        let entries: Vec<ZoneFileEntry> = domains.iter().map(ZoneFileEntry::new).collect();
        info!(domains = entries.len(), "resolved domain set");

        // Phase 2: regenerate zone files.
        self.store
            .ensure_dir(&self.env.zones_dir)
            .context("failed to prepare zones directory")?;

        let mut updated_domains: Vec<String> = Vec::new();
        for entry in &entries {
            let outcome = self.update_zone(entry)?;
            if !outcome.changed {
                debug!(domain = %entry.domain, "zone unchanged");
                continue;
            }
            info!(domain = %entry.domain, zonefile = %entry.filename, "zone updated");
            updated_domains.push(entry.domain.clone());

            // The mirror runs only after the authoritative write succeeded,
            // and never affects the changed bookkeeping.
            if let Some(mirror) = &self.mirror {
                if let Err(err) = mirror.publish_zone(&entry.domain, &outcome.records).await {
                    warn!(domain = %entry.domain, error = %err, "zone mirror update failed");
                }
            }
        }

        // Phase 3: daemon config, signing tables, reloads.
        if nsd::write_nsd_conf(&entries, self.env, &self.store)? && updated_domains.is_empty() {
            // Nothing per-domain changed but the config did; record a
            // sentinel so the reload below still fires.
            updated_domains.push(DNS_CONFIG_SENTINEL.to_string());
        }

        if !updated_domains.is_empty() {
            self.reloader.reload_dns_daemon().await?;
        }

        dkim::write_opendkim_tables(&entries, self.env)?;
        self.reloader.reload_signing_daemon().await?;

        if updated_domains.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("updated: {}\n", updated_domains.join(",")))
        }
    }

    fn update_zone(&self, entry: &ZoneFileEntry) -> Result<ZoneOutcome> {
        let records = records::build_zone(&entry.domain, self.env);
        let path = self.env.zones_dir.join(&entry.filename);
        let existing = self.store.read_existing(&path)?;
        let rendered = zonefile::render_zone(
            &entry.domain,
            &records,
            self.env,
            existing.as_deref(),
            Utc::now().date_naive(),
        );
        if rendered.changed {
            self.store.write(&path, &rendered.text)?;
        }
        Ok(ZoneOutcome {
            changed: rendered.changed,
            records,
        })
    }
}
