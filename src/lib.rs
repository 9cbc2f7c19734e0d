// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # nsdy - NSD zone generator for mail servers
//!
//! nsdy regenerates the authoritative DNS zone files for every domain a mail
//! server hosts, rewrites the NSD master configuration and the OpenDKIM
//! signing tables, and restarts the affected daemons — but only when the
//! generated content actually changed.
//!
//! ## Overview
//!
//! The filesystem is the only state between runs. Each run derives the
//! domain set, renders every zone deterministically, and compares the result
//! (modulo the SOA serial) against what is on disk. Unchanged files are left
//! untouched; changed files get a monotonically increasing `YYYYMMDDnn`
//! serial so secondary nameservers re-fetch.
//!
//! ## Modules
//!
//! - [`records`] - Ordered per-domain record building (NS/A/MX/SPF/DKIM/DMARC)
//! - [`zonefile`] - Zone rendering, change detection, serial management
//! - [`zone_store`] - Filenames and the injectable file store
//! - [`nsd`] - NSD master configuration synthesis
//! - [`dkim`] - DKIM record-file parsing and OpenDKIM table synthesis
//! - [`update`] - The three-phase orchestrator
//! - [`reload`] - Daemon restart capability
//! - [`notifier`] - Best-effort external zone mirror
//! - [`environment`] - Server facts and generated-file locations
//! - [`dns_errors`] - Parse, reload, and mirror error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use nsdy::environment::Environment;
//! use nsdy::notifier::Dns4eMirror;
//! use nsdy::reload::ServiceReloader;
//! use nsdy::update::DnsUpdater;
//! use nsdy::zone_store::FsZoneStore;
//! use std::collections::BTreeSet;
//!
//! # async fn example(env: Environment) -> anyhow::Result<()> {
//! let mut mail_domains = BTreeSet::new();
//! mail_domains.insert("example.org".to_string());
//!
//! let updater = DnsUpdater::new(&env, FsZoneStore, ServiceReloader, None::<Dns4eMirror>);
//! let summary = updater.do_update(mail_domains).await?;
//! print!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod dkim;
pub mod dns_errors;
pub mod environment;
pub mod notifier;
pub mod nsd;
pub mod records;
pub mod reload;
pub mod update;
pub mod zone_store;
pub mod zonefile;

#[cfg(test)]
mod dkim_tests;
#[cfg(test)]
mod notifier_tests;
#[cfg(test)]
mod records_tests;
#[cfg(test)]
mod zone_store_tests;
